//! REPL command parsing

use crate::state::NoteId;
use anyhow::{bail, Context};
use serde_json::Value;

pub const HELP: &str = "\
Commands:
  new            create a note and open it
  sync           create a note, then again once the server answers
  open <id>      open a note
  edit <text>    replace the open note's content (\\n starts a new line)
  close          close the open note
  dispatch <json> dispatch a raw action, e.g. {\"type\": \"CLOSE_NOTE\"}
  log            show what the logging middleware recorded
  help           show this help
  quit           leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New,
    Sync,
    Open(NoteId),
    Edit(String),
    Close,
    Dispatch(Value),
    Log,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "new" => Command::New,
            "sync" => Command::Sync,
            "open" => {
                let id = rest
                    .parse()
                    .with_context(|| format!("open expects a note id, got {:?}", rest))?;
                Command::Open(id)
            }
            "edit" => Command::Edit(rest.replace("\\n", "\n")),
            "close" => Command::Close,
            "dispatch" => {
                if rest.is_empty() {
                    bail!("dispatch expects a JSON action");
                }
                Command::Dispatch(serde_json::from_str(rest).context("dispatch expects valid JSON")?)
            }
            "log" => Command::Log,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("unknown command {:?}, try `help`", other),
        };

        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("new"), Command::New);
        assert_eq!(parse("  sync  "), Command::Sync);
        assert_eq!(parse("close"), Command::Close);
        assert_eq!(parse("log"), Command::Log);
        assert_eq!(parse("?"), Command::Help);
        assert_eq!(parse("exit"), Command::Quit);
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_open_needs_number() {
        assert_eq!(parse("open 3"), Command::Open(3));
        assert!(Command::parse("open").is_err());
        assert!(Command::parse("open first").is_err());
    }

    #[test]
    fn test_edit_keeps_text_and_expands_newlines() {
        assert_eq!(parse("edit Shopping\\nmilk  eggs"), Command::Edit("Shopping\nmilk  eggs".to_string()));
        assert_eq!(parse("edit"), Command::Edit(String::new()));
    }

    #[test]
    fn test_dispatch_parses_json() {
        assert_eq!(
            parse(r#"dispatch {"type": "OPEN_NOTE", "id": 1}"#),
            Command::Dispatch(json!({"type": "OPEN_NOTE", "id": 1}))
        );
        assert_eq!(parse("dispatch 42"), Command::Dispatch(json!(42)));
        assert!(Command::parse("dispatch {oops").is_err());
        assert!(Command::parse("dispatch").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::parse("frobnicate now").unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }
}
