use colored::Colorize;
use std::fmt;
use std::process;

pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error from the hub service layer.
    Hub(hub_service::HubError),
    /// Error talking to the triple store directly.
    Store(hub_store::StoreError),
    /// Argument / usage errors.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Hub(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Store(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<hub_service::HubError> for CliError {
    fn from(e: hub_service::HubError) -> Self {
        CliError::Hub(e)
    }
}

impl From<hub_store::StoreError> for CliError {
    fn from(e: hub_store::StoreError) -> Self {
        CliError::Store(e)
    }
}

pub type CliResult<T> = Result<T, CliError>;

pub fn exit_with_error(e: CliError) -> ! {
    eprintln!("{e}");
    let code = match e {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}
