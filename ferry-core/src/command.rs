use crate::{Parameter, Parameters};
use std::{fmt, time::Duration};

/// How the data source interprets the command text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    #[default]
    Text,
    StoredProcedure,
    TableDirect,
}

/// Per call settings forwarded to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// How long the driver waits for the data source, `Duration::ZERO` waits forever.
    pub timeout: Duration,
    pub kind: CommandKind,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            kind: CommandKind::Text,
        }
    }
}

impl CommandOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn kind(mut self, kind: CommandKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Settings of the calls returning rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub command: CommandOptions,
    /// Collect every row before returning, otherwise rows are mapped while
    /// they are read.
    pub buffered: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            command: Default::default(),
            buffered: true,
        }
    }
}

impl QueryOptions {
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.command.timeout = timeout;
        self
    }

    pub fn kind(mut self, kind: CommandKind) -> Self {
        self.command.kind = kind;
        self
    }
}

impl From<CommandOptions> for QueryOptions {
    fn from(command: CommandOptions) -> Self {
        Self {
            command,
            ..Default::default()
        }
    }
}

/// SQL text with its ordered parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Command {
    pub text: String,
    pub parameters: Parameters,
}

impl Command {
    pub fn new(text: impl Into<String>, parameters: impl Into<Parameters>) -> Self {
        Self {
            text: text.into(),
            parameters: parameters.into(),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        Self::new(value, Parameters::new())
    }
}

impl From<String> for Command {
    fn from(value: String) -> Self {
        Self::new(value, Parameters::new())
    }
}

impl<S: Into<String>, P: Into<Parameters>> From<(S, P)> for Command {
    fn from((text, parameters): (S, P)) -> Self {
        Self::new(text, parameters)
    }
}
