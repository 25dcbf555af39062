//! Parsing of terminal input lines.
//!
//! Lines starting with `/` are client commands; everything else is sent to
//! the game as-is.

use std::fmt;

/// Which volume channel `/volume` adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChannel {
    Master,
    Effects,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Free text for the game backend
    Game(String),
    Inventory,
    Use(String),
    Equip(String),
    Drop(String),
    Settings,
    Speed(u32),
    Volume(VolumeChannel, u8),
    NewGame,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidNumber(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("Type a command."),
            ParseError::Unknown(cmd) => write!(f, "Unknown command /{cmd}. Try /help."),
            ParseError::MissingArgument(usage) => write!(f, "Usage: {usage}"),
            ParseError::InvalidNumber(raw) => write!(f, "'{raw}' is not a valid number."),
        }
    }
}

pub const HELP_TEXT: &str = "\
Type anything to act in the story. Client commands:
  /inventory               show or hide your inventory
  /use <item-id>           use an item
  /equip <item-id>         equip an item
  /drop <item-id>          drop an item (asks first)
  /settings                show or hide settings
  /speed <cps>             narration speed in characters per second, 0 = instant
  /volume <master|effects> <0-100>
  /new                     start a new adventure
  /refresh                 reload the game state from the server
  /quit                    leave the game";

impl ClientCommand {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(ClientCommand::Game(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        match name.as_str() {
            "inventory" | "inv" | "i" => Ok(ClientCommand::Inventory),
            "use" => item_argument(&args, "/use <item-id>").map(ClientCommand::Use),
            "equip" => item_argument(&args, "/equip <item-id>").map(ClientCommand::Equip),
            "drop" => item_argument(&args, "/drop <item-id>").map(ClientCommand::Drop),
            "settings" => Ok(ClientCommand::Settings),
            "speed" => {
                let raw = args
                    .first()
                    .ok_or(ParseError::MissingArgument("/speed <cps>"))?;
                let cps = raw
                    .parse::<u32>()
                    .map_err(|_| ParseError::InvalidNumber(raw.to_string()))?;
                Ok(ClientCommand::Speed(cps))
            }
            "volume" => {
                const USAGE: &str = "/volume <master|effects> <0-100>";
                let (Some(channel), Some(raw)) = (args.first(), args.get(1)) else {
                    return Err(ParseError::MissingArgument(USAGE));
                };
                let channel = match channel.to_ascii_lowercase().as_str() {
                    "master" => VolumeChannel::Master,
                    "effects" | "sfx" => VolumeChannel::Effects,
                    _ => return Err(ParseError::MissingArgument(USAGE)),
                };
                let level = raw
                    .parse::<u8>()
                    .map_err(|_| ParseError::InvalidNumber(raw.to_string()))?;
                Ok(ClientCommand::Volume(channel, level))
            }
            "new" => Ok(ClientCommand::NewGame),
            "refresh" => Ok(ClientCommand::Refresh),
            "help" | "?" => Ok(ClientCommand::Help),
            "quit" | "exit" => Ok(ClientCommand::Quit),
            "" => Err(ParseError::Empty),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn item_argument(args: &[&str], usage: &'static str) -> Result<String, ParseError> {
    if args.is_empty() {
        return Err(ParseError::MissingArgument(usage));
    }
    Ok(args.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_game_command() {
        assert_eq!(
            ClientCommand::parse("  pick lock "),
            Ok(ClientCommand::Game("pick lock".into()))
        );
    }

    #[test]
    fn slash_commands_parse_arguments() {
        assert_eq!(
            ClientCommand::parse("/use healing-potion"),
            Ok(ClientCommand::Use("healing-potion".into()))
        );
        assert_eq!(ClientCommand::parse("/speed 0"), Ok(ClientCommand::Speed(0)));
        assert_eq!(
            ClientCommand::parse("/volume effects 35"),
            Ok(ClientCommand::Volume(VolumeChannel::Effects, 35))
        );
        assert_eq!(ClientCommand::parse("/QUIT"), Ok(ClientCommand::Quit));
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(ClientCommand::parse("   "), Err(ParseError::Empty));
        assert_eq!(
            ClientCommand::parse("/dance"),
            Err(ParseError::Unknown("dance".into()))
        );
        assert_eq!(
            ClientCommand::parse("/drop"),
            Err(ParseError::MissingArgument("/drop <item-id>"))
        );
        assert_eq!(
            ClientCommand::parse("/volume master loud"),
            Err(ParseError::InvalidNumber("loud".into()))
        );
        assert_eq!(
            ClientCommand::parse("/volume master 300"),
            Err(ParseError::InvalidNumber("300".into()))
        );
    }
}
