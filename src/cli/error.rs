use thiserror::Error;

/// Everything `Registry::parse` can reject.
///
/// `HelpRequested` is not a user mistake: callers print the command's usage
/// and exit successfully instead of showing an error banner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("help requested for {command}")]
    HelpRequested { command: String },

    #[error("must specify app name")]
    MissingAppName,

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("missing argument: {0}")]
    MissingArgument(String),
}
