use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const INIT_KEYWORD: &str = "INITIATEMYNETWORK";
pub const ADD_DEFAULT_KEYWORD: &str = "ADDONELAYER";
pub const ADD_SPECIAL_KEYWORD: &str = "ADDSPECIALLAYER";
pub const RUN_KEYWORD: &str = "RUNMEPLEASE";

// ---------------------------------------------------------------------------
// NetworkKind
// ---------------------------------------------------------------------------

/// The simulated network category selected on the first line of a script.
///
/// Serialized as the exact D-Script token (`"IRISSCANNING"`, ...), which is
/// also the prefix of the metrics lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkKind {
    #[serde(rename = "IRISSCANNING")]
    IrisScanning,
    #[serde(rename = "IMAGERECOG")]
    ImageRecog,
    #[serde(rename = "CLIMATEPRED")]
    ClimatePred,
}

impl NetworkKind {
    pub const ALL: [NetworkKind; 3] = [
        NetworkKind::IrisScanning,
        NetworkKind::ImageRecog,
        NetworkKind::ClimatePred,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            NetworkKind::IrisScanning => "IRISSCANNING",
            NetworkKind::ImageRecog => "IMAGERECOG",
            NetworkKind::ClimatePred => "CLIMATEPRED",
        }
    }

    /// Exact, case-sensitive token match.
    pub fn from_token(token: &str) -> Option<NetworkKind> {
        NetworkKind::ALL.into_iter().find(|kind| kind.token() == token)
    }

    /// Human-readable label for UIs.
    pub fn label(&self) -> &'static str {
        match self {
            NetworkKind::IrisScanning => "Iris scanning",
            NetworkKind::ImageRecog => "Image recognition",
            NetworkKind::ClimatePred => "Climate prediction",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network type '{0}'")]
pub struct UnknownNetworkKind(pub String);

impl FromStr for NetworkKind {
    type Err = UnknownNetworkKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkKind::from_token(s).ok_or_else(|| UnknownNetworkKind(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Command / line grammar
// ---------------------------------------------------------------------------

/// Where a line sits in the script.  The grammar is positional: the first
/// line is always read as the init command, the last as the run command and
/// everything in between as a layer command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePosition {
    First,
    Middle,
    Last,
}

impl LinePosition {
    /// Position of the 0-based `index` in a script of `len` lines.
    ///
    /// `First` wins for index 0 even when the script has a single line.
    pub fn of(index: usize, len: usize) -> LinePosition {
        if index == 0 {
            LinePosition::First
        } else if index + 1 == len {
            LinePosition::Last
        } else {
            LinePosition::Middle
        }
    }
}

/// A well-formed D-Script statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init { network_type: NetworkKind },
    AddDefaultLayer,
    AddSpecialLayer,
    Run,
}

/// Why a line failed to parse as the command its position requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIssue {
    /// First token of line 1 is not `INITIATEMYNETWORK`.
    MissingInitKeyword,
    /// `INITIATEMYNETWORK` without a recognised network type.
    InvalidNetworkType,
    /// Last line is not exactly `RUNMEPLEASE`.
    NotRun,
    /// Middle line is neither layer command.
    UnknownLayerCommand,
}

impl Command {
    /// Parses `text` (already trimmed) as the command required at `position`.
    ///
    /// The init line is split on single spaces, so two spaces between the
    /// keyword and the type leave an empty type token.  Tokens after the
    /// network type are ignored.
    pub fn parse(position: LinePosition, text: &str) -> Result<Command, LineIssue> {
        match position {
            LinePosition::First => {
                let mut parts = text.split(' ');
                if parts.next() != Some(INIT_KEYWORD) {
                    return Err(LineIssue::MissingInitKeyword);
                }
                parts
                    .next()
                    .and_then(NetworkKind::from_token)
                    .map(|network_type| Command::Init { network_type })
                    .ok_or(LineIssue::InvalidNetworkType)
            }
            LinePosition::Last => {
                if text == RUN_KEYWORD {
                    Ok(Command::Run)
                } else {
                    Err(LineIssue::NotRun)
                }
            }
            LinePosition::Middle => match text {
                ADD_DEFAULT_KEYWORD => Ok(Command::AddDefaultLayer),
                ADD_SPECIAL_KEYWORD => Ok(Command::AddSpecialLayer),
                _ => Err(LineIssue::UnknownLayerCommand),
            },
        }
    }

    /// Renders the command back to its D-Script line.
    pub fn to_line(&self) -> String {
        match self {
            Command::Init { network_type } => format!("{} {}", INIT_KEYWORD, network_type),
            Command::AddDefaultLayer => ADD_DEFAULT_KEYWORD.to_owned(),
            Command::AddSpecialLayer => ADD_SPECIAL_KEYWORD.to_owned(),
            Command::Run => RUN_KEYWORD.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_kind_tokens_are_exact() {
        assert_eq!(NetworkKind::from_token("IMAGERECOG"), Some(NetworkKind::ImageRecog));
        assert_eq!(NetworkKind::from_token("imagerecog"), None);
        assert_eq!(NetworkKind::from_token(""), None);
        assert!("WEATHER".parse::<NetworkKind>().is_err());
        assert_eq!(NetworkKind::ClimatePred.to_string(), "CLIMATEPRED");
    }

    #[test]
    fn position_prefers_first_for_single_line() {
        assert_eq!(LinePosition::of(0, 1), LinePosition::First);
        assert_eq!(LinePosition::of(0, 2), LinePosition::First);
        assert_eq!(LinePosition::of(1, 2), LinePosition::Last);
        assert_eq!(LinePosition::of(1, 3), LinePosition::Middle);
    }

    #[test]
    fn init_line_parsing() {
        assert_eq!(
            Command::parse(LinePosition::First, "INITIATEMYNETWORK CLIMATEPRED extra"),
            Ok(Command::Init { network_type: NetworkKind::ClimatePred })
        );
        assert_eq!(
            Command::parse(LinePosition::First, "INITIATEMYNETWORK"),
            Err(LineIssue::InvalidNetworkType)
        );
        assert_eq!(
            Command::parse(LinePosition::First, "INITIATEMYNETWORK  IRISSCANNING"),
            Err(LineIssue::InvalidNetworkType)
        );
        assert_eq!(
            Command::parse(LinePosition::First, "ADDONELAYER"),
            Err(LineIssue::MissingInitKeyword)
        );
    }

    #[test]
    fn run_and_layer_lines() {
        assert_eq!(Command::parse(LinePosition::Last, "RUNMEPLEASE"), Ok(Command::Run));
        assert_eq!(Command::parse(LinePosition::Last, "RUNMEPLEASENOW"), Err(LineIssue::NotRun));
        assert_eq!(Command::parse(LinePosition::Middle, "ADDSPECIALLAYER"), Ok(Command::AddSpecialLayer));
        assert_eq!(Command::parse(LinePosition::Middle, "RUNMEPLEASE"), Err(LineIssue::UnknownLayerCommand));
    }

    #[test]
    fn to_line_round_trips_through_parse() {
        let init = Command::Init { network_type: NetworkKind::IrisScanning };
        assert_eq!(init.to_line(), "INITIATEMYNETWORK IRISSCANNING");
        assert_eq!(Command::parse(LinePosition::First, &init.to_line()), Ok(init));
    }
}
