pub mod command;
pub mod extract;
pub mod input;
pub mod line;
pub mod validator;

pub use command::{Command, LineIssue, LinePosition, NetworkKind, UnknownNetworkKind};
pub use extract::{extract_config, extract_from_lines, NetworkConfig};
pub use input::{filter_edit, is_allowed_input};
pub use line::{tokenize, ScriptLine};
pub use validator::{validate, validate_lines, ScriptError, ValidationResult};
