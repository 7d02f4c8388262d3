//! Line-editing front end.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::{debug, info, warn};

use super::command::{lookup, COMMANDS};
use super::{Flow, Shell};
use crate::completion::{complete_word, CompletionKind};
use crate::navigation::NavigationContext;

/// rustyline helper completing from the live navigation state.
pub struct ShellHelper {
    ctx: Rc<RefCell<NavigationContext>>,
}

impl ShellHelper {
    pub fn new(ctx: Rc<RefCell<NavigationContext>>) -> Self {
        Self { ctx }
    }

    fn pairs(items: Vec<String>) -> Vec<Pair> {
        items
            .into_iter()
            .map(|item| Pair {
                display: item.clone(),
                replacement: item,
            })
            .collect()
    }

    /// Candidates for the word ending at `pos`, and where that word starts.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let start = line[..pos]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let word = &line[start..pos];
        let tokens: Vec<&str> = line[..start].split_whitespace().collect();

        let Some((command, prior)) = tokens.split_first() else {
            let mut names: Vec<String> = COMMANDS
                .iter()
                .flat_map(|entry| std::iter::once(entry.name).chain(entry.aliases.iter().copied()))
                .filter(|name| name.starts_with(word))
                .map(str::to_string)
                .collect();
            names.sort();
            return (start, names);
        };

        let Some(kind) = lookup(command).and_then(|entry| entry.completion) else {
            return (start, Vec::new());
        };
        // Only `cd` takes several path arguments; the others complete their first one.
        if kind != CompletionKind::Children && !prior.is_empty() {
            return (start, Vec::new());
        }

        let Ok(ctx) = self.ctx.try_borrow() else {
            return (start, Vec::new());
        };
        (start, complete_word(&ctx, kind, prior, word))
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, items) = self.candidates(line, pos);
        debug!("Completing {:?}: {} candidates", &line[..pos], items.len());
        Ok((start, Self::pairs(items)))
    }
}

impl Helper for ShellHelper {}

impl Highlighter for ShellHelper {}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Validator for ShellHelper {}

/// Run commands non-interactively, printing errors and carrying on.
pub fn run_script(shell: &mut Shell, commands: &[String]) -> Result<()> {
    let stdout = io::stdout();
    for line in commands {
        info!("Script command: {}", line);
        match shell.execute_line(line, &mut stdout.lock()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => eprintln!("error: {}", e),
        }
    }
    Ok(())
}

/// Interactive loop until EOF or `exit`.
pub fn run_repl(shell: &mut Shell, prompt: &str, history: Option<PathBuf>) -> Result<()> {
    let mut rl: Editor<ShellHelper, DefaultHistory> =
        Editor::new().map_err(|e| anyhow!("failed to init line editor: {e}"))?;
    rl.set_helper(Some(ShellHelper::new(shell.context())));

    if let Some(path) = &history {
        if let Err(e) = rl.load_history(path) {
            debug!("No history loaded from {}: {}", path.display(), e);
        }
    }

    println!("busnav {}, type `help` for commands", env!("CARGO_PKG_VERSION"));

    let stdout = io::stdout();
    loop {
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line)
            .map_err(|e| anyhow!("failed to record history: {e}"))?;

        match shell.execute_line(line, &mut stdout.lock()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => eprintln!("error: {}", e),
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = rl.save_history(path) {
            warn!("Failed to save history to {}: {}", path.display(), e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::BusKind;
    use crate::testing::example_bus;

    fn helper() -> ShellHelper {
        let mut ctx = NavigationContext::new();
        ctx.attach(BusKind::Session, Box::new(example_bus()));
        ctx.select_service("com.example.Svc").unwrap();
        ShellHelper::new(Rc::new(RefCell::new(ctx)))
    }

    #[test]
    fn test_complete_command_names() {
        let (start, items) = helper().candidates("c", 1);
        assert_eq!(start, 0);
        assert_eq!(items, ["call", "cd", "change-service", "conn", "connect", "cs"]);
    }

    #[test]
    fn test_complete_cd_children() {
        let line = "cd f";
        let (start, items) = helper().candidates(line, line.len());
        assert_eq!(start, 3);
        assert_eq!(items, ["foo"]);
    }

    #[test]
    fn test_complete_services() {
        let line = "cs com.";
        let (start, items) = helper().candidates(line, line.len());
        assert_eq!(start, 3);
        assert_eq!(items, ["com.example.Gone", "com.example.Svc"]);
    }

    #[test]
    fn test_no_completion_for_extra_args() {
        let line = "cs com.example.Svc com";
        let (_, items) = helper().candidates(line, line.len());
        assert!(items.is_empty());

        let line = "pwd x";
        let (_, items) = helper().candidates(line, line.len());
        assert!(items.is_empty());
    }
}
