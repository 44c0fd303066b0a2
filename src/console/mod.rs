//! Interactive console - the line-oriented front end
//!
//! A [`Session`] reads one command per line and runs the matching flow
//! against the store it was given. Nothing in here ends the process; errors
//! are printed and the loop carries on until `quit` or end of input.

pub mod session;

pub use session::Session;

use std::str::FromStr;

/// Commands understood at the main prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Lend an item to a friend
    Give,
    /// Get an item back from a friend
    TakeBack,
    /// Add a friend
    NewFriend,
    Quit,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Give => "give",
            Command::TakeBack => "takeback",
            Command::NewFriend => "newfriend",
            Command::Quit => "quit",
        }
    }
}

/// Input that is not one of the known commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "give" => Ok(Command::Give),
            "takeback" => Ok(Command::TakeBack),
            "newfriend" => Ok(Command::NewFriend),
            "quit" => Ok(Command::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("give".parse::<Command>(), Ok(Command::Give));
        assert_eq!("  takeback \n".parse::<Command>(), Ok(Command::TakeBack));
        assert_eq!("newfriend".parse::<Command>(), Ok(Command::NewFriend));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_commands_are_case_sensitive() {
        assert!("Give".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }
}
