use anyhow::Result;
use clap::Parser;

mod cli;
mod exec;
mod plugins;
mod topics;
mod utils;

use cli::{ParseError, Registry, RegistryBuilder, help};
use exec::{Environment, ExecError};
use utils::output::{Color, color};

/// hk - command-line dispatcher for the Heroku platform
///
/// Commands are addressed as `topic` (the topic's default command) or
/// `topic:command`, followed by the command's positional arguments:
///   hk apps
///   hk apps:info --app myapp
///   hk apps:create myapp eu
///
/// Reserved tokens after the command:
///   help, --help, -h   show usage for the command
///   -a / --app APP     app to operate on (else HEROKU_APP, else git remote)
///   --                 treat everything after it as positional
///
/// Environment:
///   HEROKU_APP         default app for commands that need one
///   HEROKU_API_KEY     credentials for commands that need auth
///   HEROKU_GIT_REMOTE  git remote used to infer the app (default: heroku)
///   HK_PLUGINS         plugin manifest (JSON or YAML) adding topics
#[derive(Parser, Debug)]
#[command(
    name = "hk",
    version,
    about = "hk - command-line dispatcher for the Heroku platform",
    disable_help_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long)]
    quiet: bool,

    /// Command followed by its arguments, passed through untouched
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let code = match build_registry()
        .and_then(|registry| run(&registry, &cli.args, &Environment::from_process()))
    {
        Ok(code) => code,
        Err(e) => report(&e),
    };
    std::process::exit(code);
}

/// Built-ins first, then plugin topics; first registration wins on clashes.
fn build_registry() -> Result<Registry> {
    let mut builder = RegistryBuilder::new();
    builder.add_topics(topics::builtins());
    builder.add_topics(plugins::discover(plugins::manifest_path().as_deref())?);
    Ok(builder.build())
}

fn is_help_token(token: &str) -> bool {
    matches!(token, "help" | "--help" | "-h")
}

/// Usage for `label` if it resolves, else general help.
fn help_for(registry: &Registry, label: Option<&str>) -> String {
    if let Some(label) = label
        && let (Some(topic), Some(command)) = registry.resolve(label)
    {
        return help::command(topic, command);
    }
    help::general(registry)
}

/// Dispatch `args` and return the process exit code. Errors are left to `report`.
fn run(registry: &Registry, args: &[String], env: &Environment) -> Result<i32> {
    // `hk help [COMMAND]`
    if let Some(first) = args.first()
        && is_help_token(first)
    {
        print!("{}", help_for(registry, args.get(1).map(String::as_str)));
        return Ok(0);
    }

    let ctx = match registry.parse(args) {
        Ok(ctx) => ctx,
        Err(ParseError::HelpRequested { command }) => {
            print!("{}", help_for(registry, Some(command.as_str())));
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.command.is_none() {
        let Some(first) = args.first() else {
            print!("{}", help::general(registry));
            return Ok(0);
        };
        eprintln!(" !    `{first}` is not a hk command.");
        eprint!("{}", help::general(registry));
        return Ok(1);
    }

    exec::run(ctx, env)?;
    Ok(0)
}

/// Print a failure the way the CLI reports all errors and pick the exit code.
fn report(err: &anyhow::Error) -> i32 {
    crate::log_debug!("error detail: {err:?}");
    eprintln!("{}", color(Color::Red, format!(" !    {err:#}")));
    match err.downcast_ref::<ExecError>() {
        Some(ExecError::NoApp) => {
            eprintln!(
                " !    Run this command from an app folder or specify which app to use with --app APP."
            );
            3
        }
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::new(topics::builtins())
    }

    fn env() -> Environment {
        Environment {
            app: Some("myapp".into()),
            api_key: Some("key".into()),
            git_remote: "hk-test-no-such-remote".into(),
        }
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    fn exit_code(args: &[&str], env: &Environment) -> i32 {
        match run(&registry(), &argv(args), env) {
            Ok(code) => code,
            Err(e) => report(&e),
        }
    }

    #[test]
    fn empty_argv_shows_help() {
        assert_eq!(exit_code(&[], &env()), 0);
    }

    #[test]
    fn unresolved_command_exits_one() {
        assert_eq!(exit_code(&["nope"], &env()), 1);
        assert_eq!(exit_code(&["apps:nope"], &env()), 1);
    }

    #[test]
    fn help_exits_zero() {
        assert_eq!(exit_code(&["apps:info", "--help"], &env()), 0);
        assert_eq!(exit_code(&["help", "apps:info"], &env()), 0);
        assert_eq!(exit_code(&["help"], &env()), 0);
    }

    #[test]
    fn parse_error_exits_one() {
        assert_eq!(exit_code(&["apps:info", "extra"], &env()), 1);
        assert_eq!(exit_code(&["apps:info", "--app"], &env()), 1);
    }

    #[test]
    fn resolved_command_runs() {
        assert_eq!(exit_code(&["apps:create", "newapp", "eu"], &env()), 0);
    }

    #[test]
    fn missing_app_exits_three() {
        let env = Environment {
            app: None,
            ..env()
        };
        assert_eq!(exit_code(&["apps:info"], &env), 3);
    }

    #[test]
    fn report_codes() {
        assert_eq!(report(&ExecError::NoApp.into()), 3);
        assert_eq!(report(&ExecError::NotLoggedIn.into()), 1);
        assert_eq!(report(&ParseError::MissingAppName.into()), 1);
    }

    #[test]
    fn help_for_known_and_unknown_labels() {
        let registry = registry();
        let text = help_for(&registry, Some("apps:info"));
        assert!(text.starts_with("Usage: hk apps:info [--app APP]"));

        let text = help_for(&registry, Some("nope:nothing"));
        assert!(text.starts_with("Usage: hk COMMAND"));
        assert_eq!(help_for(&registry, None), help::general(&registry));
    }
}
