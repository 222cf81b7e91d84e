use std::path::PathBuf;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line.
    Empty,
    /// A message for the chef.
    Chat(String),
    /// `/upload <pdf>...`
    Upload(Vec<PathBuf>),
    /// `/key`: enter the API key without echo.
    Key,
    /// `/new`: start a new conversation.
    New,
    /// `/history`: show the conversation so far.
    History,
    /// `/help`
    Help,
    /// `exit`, `quit`, `/exit`, `/quit`
    Quit,
    /// Any other `/word`.
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /upload <file.pdf>...  memorize PDF cookbooks for this conversation
  /key                   enter your Gemini API key (hidden)
  /new                   start a new conversation (clears history, re-reads the cookbooks)
  /history               show the conversation so far
  /help                  show this help
  exit | quit            leave the kitchen
Anything else is a message for the chef.";

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if matches!(trimmed, "exit" | "quit") {
        return Command::Quit;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Chat(trimmed.to_string());
    };

    let mut words = rest.split_whitespace();
    match words.next().unwrap_or("") {
        "upload" => Command::Upload(words.map(PathBuf::from).collect()),
        "key" => Command::Key,
        "new" => Command::New,
        "history" => Command::History,
        "help" | "?" => Command::Help,
        "exit" | "quit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(parse("  I'm homesick \n"), Command::Chat("I'm homesick".into()));
        assert_eq!(parse(""), Command::Empty);
        assert_eq!(parse("   "), Command::Empty);
    }

    #[test]
    fn quit_words() {
        for input in ["exit", "quit", "/exit", "/quit"] {
            assert_eq!(parse(input), Command::Quit, "{input}");
        }
        // Only the bare word quits; a sentence is a message.
        assert_eq!(parse("exit strategy?"), Command::Chat("exit strategy?".into()));
    }

    #[test]
    fn upload_takes_paths() {
        assert_eq!(
            parse("/upload aaji.pdf  konkan.pdf"),
            Command::Upload(vec![PathBuf::from("aaji.pdf"), PathBuf::from("konkan.pdf")])
        );
        assert_eq!(parse("/upload"), Command::Upload(vec![]));
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse("/key"), Command::Key);
        assert_eq!(parse("/new"), Command::New);
        assert_eq!(parse("/history"), Command::History);
        assert_eq!(parse("/help"), Command::Help);
        assert_eq!(parse("/recipes"), Command::Unknown("recipes".into()));
    }
}
