//! Help text. Returns strings; callers decide stdout vs stderr.

use super::command::{Command, Topic};
use super::registry::Registry;
use crate::utils::output::{Color, color};

const NAME_WIDTH: usize = 22;

/// Overview of every registered topic and command.
pub fn general(registry: &Registry) -> String {
    let mut out = String::new();
    out.push_str("Usage: hk COMMAND [--app APP] [command-specific-options]\n\n");
    out.push_str(&color(Color::Bold, "Commands:"));
    out.push('\n');
    for topic in registry.topics() {
        for command in &topic.commands {
            let label = topic.label(command);
            let description = if command.description.is_empty() {
                topic.description.as_str()
            } else {
                command.description.as_str()
            };
            out.push_str(&format!("  {label:<NAME_WIDTH$} # {description}\n"));
        }
    }
    out.push_str("\nRun `hk COMMAND --help` for help on a specific command.\n");
    out
}

/// One-line usage, e.g. `hk apps:create NAME [REGION] [--app APP]`.
pub fn usage_line(topic: &Topic, command: &Command) -> String {
    let mut parts = vec![format!("hk {}", topic.label(command))];
    parts.extend(command.args.iter().map(|arg| arg.usage()));
    if command.needs_app {
        parts.push("[--app APP]".to_string());
    }
    parts.join(" ")
}

/// Usage plus description for a single command.
pub fn command(topic: &Topic, command: &Command) -> String {
    let mut out = format!("Usage: {}\n", usage_line(topic, command));
    if !command.description.is_empty() {
        out.push_str(&format!("\n  {}\n", command.description));
    }
    out
}
