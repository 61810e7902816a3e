/*!
`apps` topic.

  hk apps                        list apps
  hk apps:info   [--app APP]     show one app
  hk apps:create [NAME] [REGION] create an app
  hk apps:destroy [--app APP]    delete an app
*/

use anyhow::Result;

use super::ApiRequest;
use crate::cli::{Arg, Command, Context, Topic};

pub fn topic() -> Topic {
    Topic::new("apps")
        .describe("manage apps")
        .command(
            Command::default_for_topic(list)
                .describe("list apps")
                .needs_auth(),
        )
        .command(
            Command::new("info", info)
                .describe("show app info")
                .needs_app()
                .needs_auth(),
        )
        .command(
            Command::new("create", create)
                .describe("create a new app")
                .arg(Arg::optional("name"))
                .arg(Arg::optional("region"))
                .needs_auth(),
        )
        .command(
            Command::new("destroy", destroy)
                .describe("permanently destroy an app")
                .needs_app()
                .needs_auth(),
        )
}

fn list(_ctx: &Context<'_>) -> Result<()> {
    ApiRequest::get("/apps").print()
}

fn info(ctx: &Context<'_>) -> Result<()> {
    ApiRequest::get(format!("/apps/{}", ctx.app_name)).print()
}

fn create(ctx: &Context<'_>) -> Result<()> {
    create_request(ctx).print()
}

fn create_request(ctx: &Context<'_>) -> ApiRequest {
    let mut body = serde_json::Map::new();
    if let Some(name) = ctx.arg("name") {
        body.insert("name".into(), name.into());
    }
    if let Some(region) = ctx.arg("region") {
        body.insert("region".into(), region.into());
    }
    ApiRequest::post("/apps", serde_json::Value::Object(body))
}

fn destroy(ctx: &Context<'_>) -> Result<()> {
    ApiRequest::delete(format!("/apps/{}", ctx.app_name)).print()
}
