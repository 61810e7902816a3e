/*!
Topic registry.

Built once at startup with `RegistryBuilder` (built-ins first, then every
plugin source in discovery order) and frozen into a `Registry`, which only
offers lookups. Merging is append-only: when a topic name is already
registered, incoming commands are added only if the existing topic does not
already resolve that command name, so earlier sources always win.
*/

use std::collections::BTreeMap;

use super::command::{Command, Topic};

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    topics: BTreeMap<String, Topic>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `topic`, or merge its commands into an existing topic of the
    /// same name without replacing anything already there.
    pub fn add_topic(&mut self, topic: Topic) -> &mut Self {
        let Some(dest) = self.topics.get_mut(&topic.name) else {
            crate::log_trace!(
                "registry: new topic '{}' ({} commands)",
                topic.name,
                topic.commands.len()
            );
            self.topics.insert(topic.name.clone(), topic);
            return self;
        };

        for cmd in topic.commands {
            if dest.get_command(&cmd.name).is_none() {
                crate::log_trace!("registry: merged '{}' into '{}'", cmd.name, dest.name);
                dest.commands.push(cmd);
            } else {
                crate::log_trace!(
                    "registry: dropped duplicate '{}' in '{}'",
                    cmd.name,
                    dest.name
                );
            }
        }
        self
    }

    pub fn add_topics(&mut self, topics: impl IntoIterator<Item = Topic>) -> &mut Self {
        for topic in topics {
            self.add_topic(topic);
        }
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            topics: self.topics,
        }
    }
}

/// Read-only set of topics, keyed by name.
#[derive(Debug)]
pub struct Registry {
    topics: BTreeMap<String, Topic>,
}

impl Registry {
    /// Build a registry from topics in registration order.
    pub fn new(topics: impl IntoIterator<Item = Topic>) -> Self {
        let mut builder = RegistryBuilder::new();
        builder.add_topics(topics);
        builder.build()
    }

    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.get(name)
    }

    /// Topics sorted by name.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.values()
    }

    /// Resolve a `topic[:command]` token.
    ///
    /// Splits on the first `:` only; without a command part the topic's
    /// default command is used. An unknown topic and an unknown command both
    /// yield no command.
    pub fn resolve(&self, token: &str) -> (Option<&Topic>, Option<&Command>) {
        let (topic_name, command_name) = match token.split_once(':') {
            Some((topic, command)) => (topic, command),
            None => (token, ""),
        };
        let Some(topic) = self.topic(topic_name) else {
            return (None, None);
        };
        (Some(topic), topic.get_command(command_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse::Context;
    use anyhow::Result;

    fn noop(_: &Context<'_>) -> Result<()> {
        Ok(())
    }

    fn names(topic: &Topic) -> Vec<&str> {
        topic.commands.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn merge_unions_commands_first_registration_wins() {
        let builtin = Topic::new("apps")
            .command(Command::default_for_topic(noop).describe("builtin list"))
            .command(Command::new("info", noop).describe("builtin info"));
        let plugin = Topic::new("apps")
            .command(Command::new("info", noop).describe("plugin info"))
            .command(Command::new("fork", noop).describe("plugin fork"));

        let registry = Registry::new([builtin, plugin]);
        let apps = registry.topic("apps").unwrap();

        assert_eq!(names(apps), vec!["", "info", "fork"]);
        assert_eq!(apps.get_command("info").unwrap().description, "builtin info");
        assert_eq!(apps.get_command("fork").unwrap().description, "plugin fork");
    }

    #[test]
    fn merge_keeps_one_topic_per_name() {
        let mut builder = RegistryBuilder::new();
        builder
            .add_topic(Topic::new("apps").command(Command::new("info", noop)))
            .add_topic(Topic::new("pg").command(Command::default_for_topic(noop)))
            .add_topic(Topic::new("apps").command(Command::new("create", noop)));
        let registry = builder.build();

        assert_eq!(registry.topics().count(), 2);
        assert_eq!(names(registry.topic("apps").unwrap()), vec!["info", "create"]);
    }

    #[test]
    fn merge_deduplicates_against_existing_not_incoming() {
        // Duplicates inside a single source are appended as-is on first
        // registration; a later source can't add a third copy.
        let first = Topic::new("apps")
            .command(Command::new("info", noop))
            .command(Command::new("info", noop));
        let second = Topic::new("apps").command(Command::new("info", noop));
        let registry = Registry::new([first, second]);
        assert_eq!(names(registry.topic("apps").unwrap()), vec!["info", "info"]);
    }

    #[test]
    fn resolve_topic_and_command() {
        let registry = Registry::new([Topic::new("apps")
            .command(Command::default_for_topic(noop))
            .command(Command::new("info", noop))]);

        let (topic, cmd) = registry.resolve("apps:info");
        assert_eq!(topic.unwrap().name, "apps");
        assert_eq!(cmd.unwrap().name, "info");

        let (_, cmd) = registry.resolve("apps");
        assert!(cmd.unwrap().is_default());
    }

    #[test]
    fn resolve_unknown_yields_no_command() {
        let registry = Registry::new([Topic::new("apps").command(Command::new("info", noop))]);

        let (topic, cmd) = registry.resolve("x:y");
        assert!(topic.is_none());
        assert!(cmd.is_none());

        let (topic, cmd) = registry.resolve("apps:nope");
        assert!(topic.is_some());
        assert!(cmd.is_none());

        // no default registered
        let (_, cmd) = registry.resolve("apps");
        assert!(cmd.is_none());
    }

    #[test]
    fn resolve_splits_on_first_colon_only() {
        let registry = Registry::new([Topic::new("apps").command(Command::new("a:b", noop))]);
        let (_, cmd) = registry.resolve("apps:a:b");
        assert_eq!(cmd.unwrap().name, "a:b");
    }
}
