/*!
Executor: completes a parsed `Context` and runs the command handler.

  needs_app  -> `--app`, else HEROKU_APP, else the app behind the git remote
  needs_auth -> HEROKU_API_KEY
*/

use std::process::Command as Process;
use std::time::Instant;

use anyhow::{Result, bail};
use thiserror::Error;
use url::Url;

use crate::cli::Context;

pub const APP_ENV: &str = "HEROKU_APP";
pub const API_KEY_ENV: &str = "HEROKU_API_KEY";
pub const GIT_REMOTE_ENV: &str = "HEROKU_GIT_REMOTE";
const DEFAULT_GIT_REMOTE: &str = "heroku";
const GIT_HOSTS: &[&str] = &["heroku.com", "git.heroku.com"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExecError {
    #[error("No app specified.")]
    NoApp,

    #[error("Not logged in. Set HEROKU_API_KEY to your API key.")]
    NotLoggedIn,
}

/// Process environment the executor reads.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub app: Option<String>,
    pub api_key: Option<String>,
    pub git_remote: String,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Environment {
    pub fn from_process() -> Self {
        Self {
            app: non_empty_var(APP_ENV),
            api_key: non_empty_var(API_KEY_ENV),
            git_remote: non_empty_var(GIT_REMOTE_ENV)
                .unwrap_or_else(|| DEFAULT_GIT_REMOTE.to_string()),
        }
    }

    /// App from the environment, falling back to the configured git remote.
    pub fn app(&self) -> Option<String> {
        self.app_via(git_remote_url)
    }

    fn app_via(&self, remote_url: impl FnOnce(&str) -> Option<String>) -> Option<String> {
        self.app.clone().or_else(|| {
            let remote = remote_url(&self.git_remote)?;
            let app = app_from_git_remote(&remote);
            crate::log_trace!("git remote '{}' = {remote} -> {app:?}", self.git_remote);
            app
        })
    }
}

/// `git config --get remote.<name>.url`; None outside a repo or without that remote.
fn git_remote_url(name: &str) -> Option<String> {
    let out = Process::new("git")
        .args(["config", "--get", &format!("remote.{name}.url")])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let url = String::from_utf8(out.stdout).ok()?;
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// App name from a platform git URL.
///
/// Accepts `https://git.heroku.com/<app>.git`, `ssh://git@heroku.com/<app>.git`
/// and the scp form `git@heroku.com:<app>.git`.
pub fn app_from_git_remote(remote: &str) -> Option<String> {
    let (host, path) = match Url::parse(remote) {
        Ok(url) => (url.host_str()?.to_string(), url.path().to_string()),
        Err(_) => {
            let (user_host, path) = remote.split_once(':')?;
            let host = user_host.rsplit_once('@').map_or(user_host, |(_, h)| h);
            (host.to_string(), path.to_string())
        }
    };
    if !GIT_HOSTS.contains(&host.as_str()) {
        return None;
    }
    let app = path.trim_start_matches('/');
    let app = app.strip_suffix(".git").unwrap_or(app);
    (!app.is_empty() && !app.contains('/')).then(|| app.to_string())
}

/// Resolve app and credentials the command asks for, then run its handler.
pub fn run(mut ctx: Context<'_>, env: &Environment) -> Result<()> {
    let (Some(topic), Some(command)) = (ctx.topic, ctx.command) else {
        bail!("no command to run");
    };
    let label = topic.label(command);

    if command.needs_app && ctx.app_name.is_empty() {
        ctx.app_name = env.app().ok_or(ExecError::NoApp)?;
    }
    if command.needs_auth {
        ctx.auth = Some(env.api_key.clone().ok_or(ExecError::NotLoggedIn)?);
    }

    crate::log_debug!("running {label} (app={:?})", ctx.app_name);
    let started = Instant::now();
    (command.handler)(&ctx)?;
    crate::log_debug!("finished {label} in {:?}", started.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Command, Registry, Topic};

    fn expect_env_app(ctx: &Context<'_>) -> Result<()> {
        anyhow::ensure!(ctx.app_name == "from-env", "app was {:?}", ctx.app_name);
        Ok(())
    }

    fn expect_flag_app(ctx: &Context<'_>) -> Result<()> {
        anyhow::ensure!(ctx.app_name == "from-flag", "app was {:?}", ctx.app_name);
        anyhow::ensure!(ctx.auth.as_deref() == Some("key"), "auth not set");
        Ok(())
    }

    fn registry() -> Registry {
        Registry::new([Topic::new("apps")
            .command(Command::new("env", expect_env_app).needs_app())
            .command(Command::new("flag", expect_flag_app).needs_app().needs_auth())])
    }

    fn env() -> Environment {
        Environment {
            app: Some("from-env".into()),
            api_key: Some("key".into()),
            git_remote: "heroku".into(),
        }
    }

    #[test]
    fn app_from_environment_when_flag_absent() {
        let registry = registry();
        let ctx = registry.parse(&["apps:env"]).unwrap();
        run(ctx, &env()).unwrap();
    }

    #[test]
    fn app_flag_beats_environment() {
        let registry = registry();
        let ctx = registry.parse(&["apps:flag", "-a", "from-flag"]).unwrap();
        run(ctx, &env()).unwrap();
    }

    #[test]
    fn missing_credentials() {
        let registry = registry();
        let ctx = registry.parse(&["apps:flag", "-a", "from-flag"]).unwrap();
        let env = Environment {
            api_key: None,
            ..env()
        };
        let err = run(ctx, &env).unwrap_err();
        assert_eq!(err.downcast_ref::<ExecError>(), Some(&ExecError::NotLoggedIn));
    }

    #[test]
    fn no_app_anywhere() {
        let registry = registry();
        let ctx = registry.parse(&["apps:env"]).unwrap();
        let env = Environment {
            app: None,
            git_remote: "hk-test-no-such-remote".into(),
            ..env()
        };
        let err = run(ctx, &env).unwrap_err();
        assert_eq!(err.downcast_ref::<ExecError>(), Some(&ExecError::NoApp));
    }

    #[test]
    fn app_falls_back_to_git_remote() {
        let env = Environment {
            app: None,
            git_remote: "staging".into(),
            ..env()
        };
        let app = env.app_via(|name| {
            assert_eq!(name, "staging");
            Some("https://git.heroku.com/from-git.git".into())
        });
        assert_eq!(app.as_deref(), Some("from-git"));

        // environment wins without consulting git
        let app = self::env().app_via(|_| panic!("git consulted"));
        assert_eq!(app.as_deref(), Some("from-env"));

        let env = Environment {
            app: None,
            ..self::env()
        };
        assert_eq!(env.app_via(|_| Some("git@github.com:me/repo.git".into())), None);
    }

    #[test]
    fn unresolved_context_is_rejected() {
        let registry = registry();
        let ctx = registry.parse(&["nope"]).unwrap();
        assert!(run(ctx, &env()).is_err());
    }

    #[test]
    fn git_remote_forms() {
        assert_eq!(
            app_from_git_remote("https://git.heroku.com/myapp.git").as_deref(),
            Some("myapp")
        );
        assert_eq!(
            app_from_git_remote("git@heroku.com:myapp.git").as_deref(),
            Some("myapp")
        );
        assert_eq!(
            app_from_git_remote("ssh://git@heroku.com/other-app.git").as_deref(),
            Some("other-app")
        );
        assert_eq!(app_from_git_remote("git@github.com:me/repo.git"), None);
        assert_eq!(app_from_git_remote("https://git.heroku.com/"), None);
        assert_eq!(app_from_git_remote("not a remote"), None);
    }
}
