/*!
Command data model.

  Arg      one positional slot of a command's argument schema
  Command  named unit of work inside a topic (empty name = topic default)
  Topic    named, ordered collection of commands

All three are plain values built once at startup and handed to the
`RegistryBuilder`; nothing here mutates after registration.
*/

use std::fmt;

use anyhow::Result;

use super::parse::Context;

/// Function invoked with the resolved invocation once the executor has
/// filled in app and credentials.
pub type Handler = fn(&Context<'_>) -> Result<()>;

/// A positional argument declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub name: String,
    pub optional: bool,
}

impl Arg {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
        }
    }

    /// Usage form: `APP` for required, `[APP]` for optional.
    pub fn usage(&self) -> String {
        let upper = self.name.to_uppercase();
        if self.optional {
            format!("[{upper}]")
        } else {
            upper
        }
    }
}

#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub args: Vec<Arg>,
    pub needs_app: bool,
    pub needs_auth: bool,
    pub handler: Handler,
}

impl Command {
    /// New command with an empty schema and no capability flags.
    pub fn new(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            args: Vec::new(),
            needs_app: false,
            needs_auth: false,
            handler,
        }
    }

    /// The topic's default command (invoked as plain `topic`).
    pub fn default_for_topic(handler: Handler) -> Self {
        Self::new("", handler)
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn needs_app(mut self) -> Self {
        self.needs_app = true;
        self
    }

    pub fn needs_auth(mut self) -> Self {
        self.needs_auth = true;
        self
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("needs_app", &self.needs_app)
            .field("needs_auth", &self.needs_auth)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub name: String,
    pub description: String,
    pub commands: Vec<Command>,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            commands: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends without a uniqueness check; duplicates are resolved when
    /// topics are merged into a registry.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// First command whose name equals `name`. `""` looks up the default.
    pub fn get_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Invocation label for one of this topic's commands (`apps`, `apps:info`).
    pub fn label(&self, command: &Command) -> String {
        if command.is_default() {
            self.name.clone()
        } else {
            format!("{}:{}", self.name, command.name)
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
