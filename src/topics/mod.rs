//! Built-in topics, registered before any plugin topic.

pub mod apps;
pub mod plugins;

use anyhow::Result;
use serde::Serialize;

use crate::cli::Topic;

/// Built-in topics in registration order.
pub fn builtins() -> Vec<Topic> {
    vec![apps::topic(), plugins::topic()]
}

/// Platform API call a built-in command stands for. Printed rather than sent.
#[derive(Debug, Serialize, PartialEq)]
pub struct ApiRequest {
    pub method: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: "GET",
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: "POST",
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: "DELETE",
            path: path.into(),
            body: None,
        }
    }

    pub fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}
