//! `plugins` topic: show what the configured plugin manifest contributes.

use anyhow::Result;

use crate::cli::{Command, Context, Topic, help};
use crate::plugins;

pub fn topic() -> Topic {
    Topic::new("plugins")
        .describe("list installed plugins")
        .command(Command::default_for_topic(list).describe("list plugin commands"))
}

fn list(_ctx: &Context<'_>) -> Result<()> {
    let Some(path) = plugins::manifest_path() else {
        println!("No plugins installed (set {}).", plugins::MANIFEST_ENV);
        return Ok(());
    };
    let topics = plugins::discover(Some(&path))?;
    println!("Plugins from {}:", path.display());
    for topic in &topics {
        for command in &topic.commands {
            println!("  {}", help::usage_line(topic, command));
        }
    }
    Ok(())
}
