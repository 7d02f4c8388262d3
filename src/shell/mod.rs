//! Interactive shell on top of the navigation context.
//!
//! Lines are split into words, parsed into a [`Command`] and executed
//! against the shared [`NavigationContext`]. Errors are printed by the caller
//! and never end the session.

mod command;
mod format;
mod repl;

pub use command::{lookup, split_line, Command, CommandSpec, COMMANDS};
pub use format::{format_interface, format_listing, format_value, pretty_json, HELP_TYPES};
pub use repl::{run_repl, run_script, ShellHelper};

use std::cell::RefCell;
use std::io::{self, IsTerminal, Write};
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::bus::{BusKind, Connector};
use crate::error::NavError;
use crate::invoke::{self, ExternalInvoker, InvokeError};
use crate::navigation::{NavigationContext, Selection};

#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Nav(#[from] NavError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),

    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown bus {0:?}, expected session|e, system|y or an address")]
    UnknownBus(String),

    #[error("unterminated quote")]
    UnterminatedQuote,
}

/// What the caller should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Shell settings taken from the configuration file.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    /// Pager command line; empty disables paging.
    pub pager: String,
    /// Program used for `call`.
    pub invoker: String,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            pager: String::new(),
            invoker: "gdbus".to_string(),
        }
    }
}

pub struct Shell {
    ctx: Rc<RefCell<NavigationContext>>,
    connector: Box<dyn Connector>,
    invoker: Box<dyn ExternalInvoker>,
    options: ShellOptions,
}

impl Shell {
    pub fn new(
        connector: Box<dyn Connector>,
        invoker: Box<dyn ExternalInvoker>,
        options: ShellOptions,
    ) -> Self {
        Self {
            ctx: Rc::new(RefCell::new(NavigationContext::new())),
            connector,
            invoker,
            options,
        }
    }

    /// Shared handle to the navigation state, for the completer.
    pub fn context(&self) -> Rc<RefCell<NavigationContext>> {
        Rc::clone(&self.ctx)
    }

    /// Split, parse and execute one input line.
    pub fn execute_line(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow, ShellError> {
        match Command::parse(&split_line(line)?)? {
            Some(command) => self.execute(command, out),
            None => Ok(Flow::Continue),
        }
    }

    pub fn execute(&mut self, command: Command, out: &mut dyn Write) -> Result<Flow, ShellError> {
        debug!("Executing {:?}", command);

        match command {
            Command::Connect(kind) => self.connect(kind, out)?,
            Command::ListServices => {
                let names = self.ctx.borrow().list_services()?;
                let mut text = names.join("\n");
                text.push('\n');
                self.page(&text, out)?;
            }
            Command::ChangeService(name) => {
                let mut ctx = self.ctx.borrow_mut();
                if let Some(name) = name {
                    ctx.select_service(&name)?;
                }
                writeln!(out, "service: {:?}", ctx.service())?;
            }
            Command::Ls => {
                let ctx = self.ctx.borrow();
                let desc = ctx.describe()?;
                write!(out, "{}", format_listing(&desc, ctx.interface()))?;
            }
            Command::Show => {
                let ifc = self.ctx.borrow().selected_interface()?;
                self.page(&format_interface(&ifc), out)?;
            }
            Command::Cd(args) => {
                let outcome = self.ctx.borrow_mut().change_directory(&args)?;
                writeln!(out, "cd to {}", outcome.path)?;
                if let Selection::Selected(name) = outcome.selection {
                    writeln!(out, "auto select interface: {}", name)?;
                }
            }
            Command::Get(name) => {
                let value = self.ctx.borrow().get_property(&name)?;
                writeln!(out, "{}", format_value(&value))?;
            }
            Command::GetAll => {
                let props = self.ctx.borrow().get_all_properties()?;
                for (name, value) in props {
                    writeln!(out, "{}: {}", name, format_value(&value))?;
                }
            }
            Command::Pwd => writeln!(out, "{}", self.ctx.borrow().path())?,
            Command::Info => {
                let ctx = self.ctx.borrow();
                writeln!(out, "bus: {}", ctx.kind())?;
                writeln!(out, "service: {}", ctx.service())?;
                writeln!(out, "path: {}", ctx.path())?;
                writeln!(out, "interface: {}", ctx.interface())?;
                writeln!(out, "pid: {}", std::process::id())?;
            }
            Command::Interface(name) => {
                let mut ctx = self.ctx.borrow_mut();
                match name {
                    Some(name) => {
                        ctx.select_interface(&name)?;
                        writeln!(out, "select interface: {}", name)?;
                    }
                    None => writeln!(out, "interface: {}", ctx.interface())?,
                }
            }
            Command::Call { method, args } => self.call(&method, &args)?,
            Command::TmuxBuffer => {
                let buffer = self.invoker.output("tmux", &["show-buffer".to_string()])?;
                writeln!(out, "{}", pretty_json(&String::from_utf8_lossy(&buffer)))?;
            }
            Command::HelpTypes => write!(out, "{}", HELP_TYPES)?,
            Command::Help => {
                for entry in COMMANDS {
                    writeln!(out, "  {:<40} {}", entry.usage, entry.help)?;
                }
            }
            Command::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    fn connect(&mut self, kind: Option<String>, out: &mut dyn Write) -> Result<(), ShellError> {
        let mut ctx = self.ctx.borrow_mut();

        if let Some(arg) = kind {
            let kind = BusKind::from_arg(&arg).ok_or(ShellError::UnknownBus(arg))?;
            ctx.connect(kind, self.connector.as_ref())?;
        }

        writeln!(out, "{}", ctx.kind())?;
        if let Some(name) = ctx.bus().and_then(|bus| bus.unique_name()) {
            writeln!(out, "unique name: {}", name)?;
        }
        Ok(())
    }

    fn call(&self, method: &str, args: &[String]) -> Result<(), ShellError> {
        let ctx = self.ctx.borrow();
        if !ctx.kind().is_connected() {
            return Err(NavError::NotConnected.into());
        }
        if ctx.interface().is_empty() {
            return Err(NavError::NoInterfaceSelected.into());
        }

        let call_args = invoke::call_args(
            ctx.kind(),
            ctx.service(),
            ctx.path(),
            ctx.interface(),
            method,
            args,
        )?;
        let program = &self.options.invoker;
        let status = self.invoker.run(program, &call_args)?;
        invoke::check_status(program, status)?;
        Ok(())
    }

    /// Show long output through the pager when attached to a terminal.
    fn page(&self, text: &str, out: &mut dyn Write) -> Result<(), ShellError> {
        if !self.options.pager.is_empty() && io::stdout().is_terminal() {
            let (program, args) = invoke::split_command(&self.options.pager)?;
            match self.invoker.pipe(&program, &args, text) {
                Ok(_) => return Ok(()),
                Err(e) => warn!("Pager unavailable, printing directly: {}", e),
            }
        }
        write!(out, "{}", text)?;
        Ok(())
    }
}
