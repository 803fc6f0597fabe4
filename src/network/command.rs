//! Command parsing for the line transport.
//!
//! Dispatch is plain prefix matching over `/`-commands. Outcome feedback for
//! valid commands arrives through the engine's info lines; only parse
//! failures are answered by the transport itself.

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Rooms,
    CreateRoom(String),
    Subscribe(usize),
    Unsubscribe(usize),
    Switch(usize),
    ActiveRoom,
    Quit,
}

/// Why a line failed to parse as a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Known command with a missing or malformed argument.
    MissingOptions,
    /// Not a command we know.
    Unknown,
}

impl Command {
    /// Parse a `/`-prefixed line. Commands taking an argument require exactly
    /// one.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        match line {
            "/help" => return Ok(Self::Help),
            "/rooms" => return Ok(Self::Rooms),
            "/activeroom" => return Ok(Self::ActiveRoom),
            "/quit" => return Ok(Self::Quit),
            "/createroom" | "/subscribe" | "/unsubscribe" | "/switch" => {
                return Err(ParseError::MissingOptions);
            }
            _ => {}
        }

        let Some((name, arg)) = line.split_once(' ') else {
            return Err(ParseError::Unknown);
        };
        if arg.is_empty() || arg.contains(' ') {
            return match name {
                "/createroom" | "/subscribe" | "/unsubscribe" | "/switch" => {
                    Err(ParseError::MissingOptions)
                }
                _ => Err(ParseError::Unknown),
            };
        }
        match name {
            "/createroom" => Ok(Self::CreateRoom(arg.to_string())),
            "/subscribe" => parse_room_id(arg).map(Self::Subscribe),
            "/unsubscribe" => parse_room_id(arg).map(Self::Unsubscribe),
            "/switch" => parse_room_id(arg).map(Self::Switch),
            _ => Err(ParseError::Unknown),
        }
    }
}

fn parse_room_id(arg: &str) -> Result<usize, ParseError> {
    arg.parse().map_err(|_| ParseError::MissingOptions)
}
