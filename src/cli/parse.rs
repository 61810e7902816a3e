/*!
Argument vector -> resolved invocation.

Token 0 is resolved as `topic[:command]` against the registry; the rest are
bound to the command's argument schema strictly by position. Reserved tokens
(`help`, `--help`, `-h`, `--`, `-a`, `--app`) are never bound as values,
except that `--` turns off flag recognition for everything after it.
*/

use std::collections::BTreeMap;

use super::command::{Command, Topic};
use super::error::ParseError;
use super::registry::Registry;

/// Per-invocation parse result, later completed by the executor.
#[derive(Debug, Default)]
pub struct Context<'r> {
    pub topic: Option<&'r Topic>,
    pub command: Option<&'r Command>,
    /// Bound positional values keyed by schema name.
    pub args: BTreeMap<String, String>,
    /// Value of `--app`/`-a`, or the app resolved by the executor.
    pub app_name: String,
    /// Dash-prefixed tokens passed through under `UnknownFlagPolicy`.
    pub flags: Vec<String>,
    /// API key, set by the executor for commands that need auth.
    pub auth: Option<String>,
}

impl Context<'_> {
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    /// `topic:command` label of the resolved command, if any.
    pub fn label(&self) -> Option<String> {
        match (self.topic, self.command) {
            (Some(topic), Some(command)) => Some(topic.label(command)),
            _ => None,
        }
    }
}

/// Handling of dash-prefixed tokens that are not engine flags while flag
/// parsing is on.
///
/// `Ignore` passes them through to `Context::flags` without binding them or
/// failing. Whether unknown flags should eventually be rejected is an open
/// decision; don't turn this into an error without settling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFlagPolicy {
    #[default]
    Ignore,
}

pub const UNKNOWN_FLAGS: UnknownFlagPolicy = UnknownFlagPolicy::Ignore;

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Help,
    EndOfFlags,
    AppFlag,
    UnknownFlag(&'a str),
    Positional(&'a str),
}

fn classify(token: &str, parse_flags: bool) -> Token<'_> {
    match token {
        "help" | "--help" | "-h" => Token::Help,
        "--" => Token::EndOfFlags,
        "-a" | "--app" => Token::AppFlag,
        t if parse_flags && t.starts_with('-') => Token::UnknownFlag(t),
        t => Token::Positional(t),
    }
}

#[derive(Debug, Default)]
struct Bound {
    args: BTreeMap<String, String>,
    app_name: String,
    flags: Vec<String>,
}

fn bind_args<S: AsRef<str>>(
    label: &str,
    command: &Command,
    tokens: &[S],
) -> Result<Bound, ParseError> {
    let mut bound = Bound::default();
    let mut positional = 0;
    let mut parse_flags = true;

    let mut i = 0;
    while i < tokens.len() {
        match classify(tokens[i].as_ref(), parse_flags) {
            Token::Help => {
                return Err(ParseError::HelpRequested {
                    command: label.to_string(),
                });
            }
            Token::EndOfFlags => parse_flags = false,
            Token::AppFlag => {
                i += 1;
                let Some(app) = tokens.get(i) else {
                    return Err(ParseError::MissingAppName);
                };
                bound.app_name = app.as_ref().to_string();
            }
            Token::UnknownFlag(flag) => match UNKNOWN_FLAGS {
                UnknownFlagPolicy::Ignore => {
                    crate::log_trace!("{label}: ignoring flag '{flag}'");
                    bound.flags.push(flag.to_string());
                }
            },
            Token::Positional(value) => {
                let Some(slot) = command.args.get(positional) else {
                    let rest: Vec<&str> = tokens[i..].iter().map(AsRef::as_ref).collect();
                    return Err(ParseError::UnexpectedArgument(rest.join(" ")));
                };
                bound.args.insert(slot.name.clone(), value.to_string());
                positional += 1;
            }
        }
        i += 1;
    }

    if let Some(missing) = command
        .args
        .iter()
        .find(|arg| !arg.optional && bound.args.get(&arg.name).is_none_or(|v| v.is_empty()))
    {
        return Err(ParseError::MissingArgument(missing.name.to_uppercase()));
    }
    Ok(bound)
}

impl Registry {
    /// Resolve and bind a raw argument vector (program name excluded).
    ///
    /// An empty vector, an unknown topic and an unknown command all produce a
    /// context without a command and no error.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Context<'_>, ParseError> {
        let Some((first, rest)) = args.split_first() else {
            return Ok(Context::default());
        };

        let (topic, command) = self.resolve(first.as_ref());
        let (Some(topic), Some(command)) = (topic, command) else {
            return Ok(Context {
                topic,
                ..Context::default()
            });
        };

        let bound = bind_args(&topic.label(command), command, rest)?;
        Ok(Context {
            topic: Some(topic),
            command: Some(command),
            args: bound.args,
            app_name: bound.app_name,
            flags: bound.flags,
            auth: None,
        })
    }
}
