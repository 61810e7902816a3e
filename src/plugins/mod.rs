/*!
Plugin topic discovery.

Plugins announce their topics in a manifest file (JSON, or YAML when the
path ends in `.yaml`/`.yml`):

  topics:
    - name: pg
      description: manage databases
      commands:
        - name: ""            # default command
          needs_app: true
        - name: psql
          args: [{ name: database, optional: true }]
          needs_app: true
          needs_auth: true

Every declared topic becomes a `Topic` merged into the registry after the
built-ins. Plugin binaries are not executed: the handler attached to plugin
commands prints the resolved invocation as JSON.
*/

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Deserialize;

use crate::cli::{Arg, Command, Context, Topic};

pub const MANIFEST_ENV: &str = "HK_PLUGINS";

#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub topics: Vec<TopicSpec>,
}

#[derive(Debug, Deserialize)]
pub struct TopicSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

#[derive(Debug, Deserialize)]
pub struct CommandSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub args: Vec<ArgSpec>,
    #[serde(default)]
    pub needs_app: bool,
    #[serde(default)]
    pub needs_auth: bool,
}

#[derive(Debug, Deserialize)]
pub struct ArgSpec {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
}

impl Manifest {
    pub fn parse(raw: &str, yaml: bool) -> Result<Self> {
        if yaml {
            serde_yaml::from_str(raw).context("failed to parse YAML plugin manifest")
        } else {
            serde_json::from_str(raw).context("failed to parse JSON plugin manifest")
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read plugin manifest: {}", path.display()))?;
        let yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        Self::parse(&raw, yaml)
    }

    /// Topics in declaration order, ready for `RegistryBuilder::add_topics`.
    pub fn into_topics(self) -> Vec<Topic> {
        self.topics.into_iter().map(TopicSpec::into_topic).collect()
    }
}

impl TopicSpec {
    fn into_topic(self) -> Topic {
        let mut topic = Topic::new(self.name).describe(self.description);
        for spec in self.commands {
            let mut cmd = Command::new(spec.name, run_plugin_command).describe(spec.description);
            for arg in spec.args {
                cmd = cmd.arg(Arg {
                    name: arg.name,
                    optional: arg.optional,
                });
            }
            if spec.needs_app {
                cmd = cmd.needs_app();
            }
            if spec.needs_auth {
                cmd = cmd.needs_auth();
            }
            topic = topic.command(cmd);
        }
        topic
    }
}

/// Manifest location from `HK_PLUGINS`, if set and non-empty.
pub fn manifest_path() -> Option<PathBuf> {
    std::env::var_os(MANIFEST_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Plugin topics from an optional manifest path. No path means no plugins.
pub fn discover(path: Option<&Path>) -> Result<Vec<Topic>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let topics = Manifest::load(path)?.into_topics();
    crate::log_debug!(
        "plugins: {} topic(s) from {}",
        topics.len(),
        path.display()
    );
    Ok(topics)
}

/// JSON view of a resolved invocation. Credentials are reported only as present/absent.
pub fn invocation_json(ctx: &Context<'_>) -> serde_json::Value {
    serde_json::json!({
        "command": ctx.label(),
        "args": ctx.args,
        "app": if ctx.app_name.is_empty() { None } else { Some(ctx.app_name.as_str()) },
        "flags": ctx.flags,
        "authenticated": ctx.auth.is_some(),
    })
}

fn run_plugin_command(ctx: &Context<'_>) -> Result<()> {
    let out = invocation_json(ctx);
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
