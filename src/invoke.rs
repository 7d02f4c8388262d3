//! External programs the shell delegates to.
//!
//! Method calls are handed to `gdbus call`, long output goes through a pager
//! and `tmux-buffer` reads the multiplexer's paste buffer. The shell only
//! builds argument vectors and reports what the program did.

use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{debug, warn};

use crate::bus::BusKind;

#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("calling methods is not supported on {0}")]
    UnsupportedBus(String),

    #[error("empty command line")]
    EmptyCommand,
}

/// Runs external programs on behalf of the shell.
pub trait ExternalInvoker {
    /// Run with inherited stdio and wait for it.
    fn run(&self, program: &str, args: &[String]) -> Result<ExitStatus, InvokeError>;

    /// Run and capture stdout.
    fn output(&self, program: &str, args: &[String]) -> Result<Vec<u8>, InvokeError>;

    /// Run with `input` written to stdin, other streams inherited.
    fn pipe(&self, program: &str, args: &[String], input: &str) -> Result<ExitStatus, InvokeError>;
}

/// [`ExternalInvoker`] backed by `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInvoker;

fn spawn_error(program: &str) -> impl FnOnce(std::io::Error) -> InvokeError + '_ {
    move |source| InvokeError::Spawn {
        program: program.to_string(),
        source,
    }
}

impl ExternalInvoker for ProcessInvoker {
    fn run(&self, program: &str, args: &[String]) -> Result<ExitStatus, InvokeError> {
        debug!("Running {} {:?}", program, args);
        Command::new(program)
            .args(args)
            .status()
            .map_err(spawn_error(program))
    }

    fn output(&self, program: &str, args: &[String]) -> Result<Vec<u8>, InvokeError> {
        debug!("Capturing {} {:?}", program, args);
        let output = Command::new(program)
            .args(args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(spawn_error(program))?;

        if !output.status.success() {
            return Err(InvokeError::Failed {
                program: program.to_string(),
                status: output.status,
            });
        }
        Ok(output.stdout)
    }

    fn pipe(&self, program: &str, args: &[String], input: &str) -> Result<ExitStatus, InvokeError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(spawn_error(program))?;

        if let Some(mut stdin) = child.stdin.take() {
            // The pager may quit before reading everything.
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                warn!("Pager stdin closed early: {}", e);
            }
        }
        child.wait().map_err(spawn_error(program))
    }
}

/// Split a configured command line such as `less -R` into program and arguments.
pub fn split_command(command: &str) -> Result<(String, Vec<String>), InvokeError> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next().ok_or(InvokeError::EmptyCommand)?;
    Ok((program, parts.collect()))
}

/// Arguments for `gdbus call` targeting one method.
pub fn call_args(
    kind: &BusKind,
    service: &str,
    path: &str,
    interface: &str,
    method: &str,
    extra: &[String],
) -> Result<Vec<String>, InvokeError> {
    let bus_flag = match kind {
        BusKind::Session => "-e",
        BusKind::System => "-y",
        other => return Err(InvokeError::UnsupportedBus(other.to_string())),
    };

    let mut args: Vec<String> = vec![
        "call".into(),
        bus_flag.into(),
        "-d".into(),
        service.into(),
        "-o".into(),
        path.into(),
        "-m".into(),
        format!("{}.{}", interface, method),
    ];
    args.extend(extra.iter().cloned());
    Ok(args)
}

/// Check an exit status from [`ExternalInvoker::run`].
pub fn check_status(program: &str, status: ExitStatus) -> Result<(), InvokeError> {
    if status.success() {
        Ok(())
    } else {
        Err(InvokeError::Failed {
            program: program.to_string(),
            status,
        })
    }
}
