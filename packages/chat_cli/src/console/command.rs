/// One line typed at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `/join NAME`: open a session for NAME
    Join(String),
    /// `/leave NAME`: close NAME's session
    Leave(String),
    /// `/list`
    List,
    /// `/help`
    Help,
    /// `/quit` or `/exit`
    Quit,
    /// `NAME: TEXT`: send TEXT from NAME's session
    Say { identity: String, text: String },
    /// Blank line
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command /{0} (try /help)")]
    UnknownCommand(String),

    #[error("/{0} needs a name")]
    MissingName(&'static str),

    #[error("messages look like NAME: TEXT")]
    MissingSender,

    #[error("names cannot contain ':' (it separates NAME: TEXT)")]
    ColonInName,
}

pub const HELP: &str = "\
/join NAME     open a chat window for NAME (no ':' in NAME)
/leave NAME    close NAME's window
/list          show open windows
/quit          close everything and exit
NAME: TEXT     send TEXT as NAME";

pub fn parse(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(ConsoleCommand::Empty);
    }

    if let Some(rest) = line.trim_start().strip_prefix('/') {
        let (word, arg) = match rest.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (rest, ""),
        };
        return match word {
            "join" if arg.is_empty() => Err(ParseError::MissingName("join")),
            "join" if arg.contains(':') => Err(ParseError::ColonInName),
            "join" => Ok(ConsoleCommand::Join(arg.to_string())),
            "leave" if arg.is_empty() => Err(ParseError::MissingName("leave")),
            "leave" => Ok(ConsoleCommand::Leave(arg.to_string())),
            "list" => Ok(ConsoleCommand::List),
            "help" => Ok(ConsoleCommand::Help),
            "quit" | "exit" => Ok(ConsoleCommand::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        };
    }

    let (identity, text) = line.split_once(':').ok_or(ParseError::MissingSender)?;
    let identity = identity.trim();
    if identity.is_empty() {
        return Err(ParseError::MissingSender);
    }
    let text = text.strip_prefix(' ').unwrap_or(text);
    Ok(ConsoleCommand::Say {
        identity: identity.to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_takes_rest_of_line() {
        assert_eq!(
            parse("/join Ada Lovelace\n"),
            Ok(ConsoleCommand::Join("Ada Lovelace".into()))
        );
    }

    #[test]
    fn join_without_name() {
        assert_eq!(parse("/join   "), Err(ParseError::MissingName("join")));
    }

    #[test]
    fn join_rejects_names_that_could_never_send() {
        assert_eq!(parse("/join ops:oncall"), Err(ParseError::ColonInName));
    }

    #[test]
    fn leave_list_quit() {
        assert_eq!(parse("/leave bob"), Ok(ConsoleCommand::Leave("bob".into())));
        assert_eq!(parse("/list"), Ok(ConsoleCommand::List));
        assert_eq!(parse("/exit"), Ok(ConsoleCommand::Quit));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse("/nick x"),
            Err(ParseError::UnknownCommand("nick".into()))
        );
    }

    #[test]
    fn say_splits_on_first_colon() {
        assert_eq!(
            parse("alice: meet at 10:30"),
            Ok(ConsoleCommand::Say {
                identity: "alice".into(),
                text: "meet at 10:30".into()
            })
        );
    }

    #[test]
    fn say_keeps_empty_text() {
        assert_eq!(
            parse("alice:"),
            Ok(ConsoleCommand::Say {
                identity: "alice".into(),
                text: String::new()
            })
        );
    }

    #[test]
    fn bare_text_needs_a_sender() {
        assert_eq!(parse("hello"), Err(ParseError::MissingSender));
        assert_eq!(parse(" : hello"), Err(ParseError::MissingSender));
    }

    #[test]
    fn blank_line() {
        assert_eq!(parse("  \r\n"), Ok(ConsoleCommand::Empty));
    }
}
