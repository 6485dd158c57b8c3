use std::fmt;

/// A misuse of the declaration API.
///
/// These are raised as soon as the problem is observable, either at
/// registration or the first time an offending option is bound during parsing.
/// They are never collected: fix the call site.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("name `{name}` is already used by another option of command `{command}`")]
    DuplicateName { command: String, name: String },
    #[error("`{0}` is not a valid flag name, expected a `-`-prefixed non-numeric string")]
    InvalidFlagName(String),
    #[error("positional argument or subcommand name cannot be empty")]
    EmptyName,
    #[error("`{0}` is not a valid subcommand name, expected a word not starting with `-`")]
    InvalidSubcommandName(String),
    #[error("choice option `{0}` has no choices")]
    EmptyChoices(String),
    #[error("choice option `{option}` declares `{choice}` more than once")]
    DuplicateChoice { option: String, choice: String },
    #[error("command `{command}` already has a multi-positional argument `{existing}`")]
    MultiplePositionalSinks { command: String, existing: String },
    #[error("scope tag `{0}` is already used by another command")]
    DuplicateScope(&'static str),
    #[error("command `{parent}` already has a subcommand named `{name}`")]
    DuplicateSubcommand { parent: String, name: String },
    #[error("{kind} value of `{option}` fails its own validator: {message}")]
    InvalidDefault { option: String, kind: &'static str, message: String },
}

/// User-input errors of one command scope, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    command: String,
    messages: Vec<String>,
}

impl ParseError {
    pub(crate) fn new(command: impl Into<String>, messages: Vec<String>) -> Self {
        debug_assert!(!messages.is_empty());
        Self { command: command.into(), messages }
    }

    /// The space separated path of the command that failed, starting with the program name.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, msg) in self.messages.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            write!(f, "error: {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The failure of [`Cli::run`](crate::Cli::run).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Returns the collected user-input errors, if this is one.
    #[must_use]
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}
