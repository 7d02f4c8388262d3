//! The fixed set of shell commands.

use crate::completion::CompletionKind;

use super::ShellError;

/// Static description of one command, used for help and completion.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
    pub completion: Option<CompletionKind>,
}

impl CommandSpec {
    pub fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.contains(&word)
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "connect",
        aliases: &["conn"],
        usage: "connect [session|e|system|y|<address>]",
        help: "Connect to a bus, or show the current connection",
        completion: None,
    },
    CommandSpec {
        name: "list-services",
        aliases: &["ls-services"],
        usage: "list-services",
        help: "List well-known names on the bus",
        completion: None,
    },
    CommandSpec {
        name: "change-service",
        aliases: &["cs"],
        usage: "change-service [name]",
        help: "Switch to a service and go to /",
        completion: Some(CompletionKind::Services),
    },
    CommandSpec {
        name: "ls",
        aliases: &[],
        usage: "ls",
        help: "List interfaces (* marks the selected one) and children",
        completion: None,
    },
    CommandSpec {
        name: "show",
        aliases: &[],
        usage: "show",
        help: "Show methods, properties and signals of the selected interface",
        completion: None,
    },
    CommandSpec {
        name: "cd",
        aliases: &[],
        usage: "cd [-|$|/abs/path|segment...]",
        help: "Change the current object path",
        completion: Some(CompletionKind::Children),
    },
    CommandSpec {
        name: "get",
        aliases: &[],
        usage: "get <property>",
        help: "Read a property of the selected interface",
        completion: Some(CompletionKind::Properties),
    },
    CommandSpec {
        name: "get-all",
        aliases: &[],
        usage: "get-all",
        help: "Read all properties of the selected interface",
        completion: None,
    },
    CommandSpec {
        name: "pwd",
        aliases: &[],
        usage: "pwd",
        help: "Print the current object path",
        completion: None,
    },
    CommandSpec {
        name: "info",
        aliases: &[],
        usage: "info",
        help: "Show bus, service, path and interface",
        completion: None,
    },
    CommandSpec {
        name: "interface",
        aliases: &["ifc"],
        usage: "interface [name]",
        help: "Select an interface, or show the selected one",
        completion: Some(CompletionKind::Interfaces),
    },
    CommandSpec {
        name: "call",
        aliases: &[],
        usage: "call <method> [args...]",
        help: "Call a method of the selected interface with gdbus",
        completion: Some(CompletionKind::Methods),
    },
    CommandSpec {
        name: "tmux-buffer",
        aliases: &[],
        usage: "tmux-buffer",
        help: "Print the tmux paste buffer, pretty-printed if it is JSON",
        completion: None,
    },
    CommandSpec {
        name: "help-types",
        aliases: &[],
        usage: "help-types",
        help: "Show D-Bus type signature codes",
        completion: None,
    },
    CommandSpec {
        name: "help",
        aliases: &[],
        usage: "help",
        help: "List commands",
        completion: None,
    },
    CommandSpec {
        name: "exit",
        aliases: &["quit"],
        usage: "exit",
        help: "Leave the shell",
        completion: None,
    },
];

/// Look up a command by name or alias.
pub fn lookup(word: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|entry| entry.matches(word))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect(Option<String>),
    ListServices,
    ChangeService(Option<String>),
    Ls,
    Show,
    Cd(Vec<String>),
    Get(String),
    GetAll,
    Pwd,
    Info,
    Interface(Option<String>),
    Call { method: String, args: Vec<String> },
    TmuxBuffer,
    HelpTypes,
    Help,
    Exit,
}

impl Command {
    /// Build a command from a tokenized line. `Ok(None)` for an empty line.
    pub fn parse(tokens: &[String]) -> Result<Option<Self>, ShellError> {
        let Some((first, args)) = tokens.split_first() else {
            return Ok(None);
        };
        let entry = lookup(first).ok_or_else(|| ShellError::UnknownCommand(first.clone()))?;
        let usage = || ShellError::Usage(entry.usage);

        let command = match (entry.name, args) {
            ("connect", []) => Self::Connect(None),
            ("connect", [kind]) => Self::Connect(Some(kind.clone())),
            ("change-service", []) => Self::ChangeService(None),
            ("change-service", [name]) => Self::ChangeService(Some(name.clone())),
            ("interface", []) => Self::Interface(None),
            ("interface", [name]) => Self::Interface(Some(name.clone())),
            ("cd", args) => Self::Cd(args.to_vec()),
            ("get", [name]) => Self::Get(name.clone()),
            ("call", [method, rest @ ..]) => Self::Call {
                method: method.clone(),
                args: rest.to_vec(),
            },
            ("list-services", []) => Self::ListServices,
            ("ls", []) => Self::Ls,
            ("show", []) => Self::Show,
            ("get-all", []) => Self::GetAll,
            ("pwd", []) => Self::Pwd,
            ("info", []) => Self::Info,
            ("tmux-buffer", []) => Self::TmuxBuffer,
            ("help-types", []) => Self::HelpTypes,
            ("help", _) => Self::Help,
            ("exit", _) => Self::Exit,
            _ => return Err(usage()),
        };
        Ok(Some(command))
    }
}

/// Split a line into words, honoring single and double quotes.
///
/// Quotes group words and are removed; `\` escapes the next character
/// outside single quotes.
pub fn split_line(line: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                let escaped = chars.next().ok_or(ShellError::UnterminatedQuote)?;
                current.push(escaped);
                in_token = true;
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ShellError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<Command>, ShellError> {
        Command::parse(&split_line(line).unwrap())
    }

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("cd  foo bar ").unwrap(), ["cd", "foo", "bar"]);
        assert_eq!(
            split_line(r#"call Notify "hello world" 'a "b"'"#).unwrap(),
            ["call", "Notify", "hello world", r#"a "b""#]
        );
        assert_eq!(split_line(r"a\ b").unwrap(), ["a b"]);
        assert_eq!(split_line("call M ''").unwrap(), ["call", "M", ""]);
        assert!(split_line("   ").unwrap().is_empty());
        assert!(matches!(
            split_line("call 'oops"),
            Err(ShellError::UnterminatedQuote)
        ));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("pwd").unwrap(), Some(Command::Pwd));
        assert_eq!(
            parse("cs com.example.Svc").unwrap(),
            Some(Command::ChangeService(Some("com.example.Svc".into())))
        );
        assert_eq!(
            parse("cd .. foo").unwrap(),
            Some(Command::Cd(vec!["..".into(), "foo".into()]))
        );
        assert_eq!(parse("cd").unwrap(), Some(Command::Cd(vec![])));
        assert_eq!(
            parse("ifc com.example.Foo").unwrap(),
            Some(Command::Interface(Some("com.example.Foo".into())))
        );
        assert_eq!(
            parse("call Frob 1 2").unwrap(),
            Some(Command::Call {
                method: "Frob".into(),
                args: vec!["1".into(), "2".into()]
            })
        );
        assert_eq!(parse("quit").unwrap(), Some(Command::Exit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("frobnicate"), Err(ShellError::UnknownCommand(_))));
        assert!(matches!(parse("get"), Err(ShellError::Usage(_))));
        assert!(matches!(parse("get a b"), Err(ShellError::Usage(_))));
        assert!(matches!(parse("call"), Err(ShellError::Usage(_))));
        assert!(matches!(parse("pwd extra"), Err(ShellError::Usage(_))));
    }

    #[test]
    fn test_every_command_has_unique_names() {
        let mut seen = std::collections::HashSet::new();
        for entry in COMMANDS {
            assert!(seen.insert(entry.name));
            for alias in entry.aliases {
                assert!(seen.insert(alias));
            }
        }
    }
}
