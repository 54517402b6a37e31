/// Commands the bot answers. Anything else in a channel is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Summarize,
    Explain,
    Translate,
}

impl Command {
    /// Match order: the first prefix that fits wins.
    pub const ALL: [Command; 3] = [Command::Summarize, Command::Explain, Command::Translate];

    pub fn prefix(self) -> &'static str {
        match self {
            Command::Summarize => "/summarize",
            Command::Explain => "/explain",
            Command::Translate => "/translate",
        }
    }

    /// Instruction placed on the line above the user's text.
    pub fn directive(self) -> &'static str {
        match self {
            Command::Summarize => "Summarize this:",
            Command::Explain => "Explain this:",
            Command::Translate => "Translate this to English:",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A recognized command and the text that followed its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRequest<'a> {
    pub command: Command,
    pub argument: &'a str,
}

impl<'a> CommandRequest<'a> {
    /// Returns `None` for ordinary conversation.
    ///
    /// The prefix and one following space are removed together. When no
    /// space follows the prefix the whole content becomes the argument.
    pub fn parse(content: &'a str) -> Option<Self> {
        Command::ALL.into_iter().find_map(|command| {
            let prefix = command.prefix();
            if !content.starts_with(prefix) {
                return None;
            }
            let argument = content
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(' '))
                .unwrap_or(content);
            Some(Self { command, argument })
        })
    }

    pub fn prompt(&self) -> String {
        format!("{}\n{}", self.command.directive(), self.argument)
    }
}
