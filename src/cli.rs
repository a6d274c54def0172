// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::core::config::DEFAULT_MANIFEST_FILE;
use crate::infra::{t, telemetry};

pub mod commands;

/// Options of the `run` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub manifest: PathBuf,
    pub root: Option<PathBuf>,
    pub tool: Option<String>,
    pub only: Vec<String>,
    pub capture_output: bool,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub dry_run: bool,
}

/// Options of the `init` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitArgs {
    pub dev: bool,
    pub non_interactive: bool,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run(RunArgs),
    Init(InitArgs),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub lang: Option<String>,
    pub verbose: u8,
    pub log_json: bool,
    pub command: CliCommand,
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows help texts to be localised before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language(args: &[OsString]) -> Option<String> {
    let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
}

fn build_cli(locale: &str) -> Command {
    Command::new("e2e-orchestrator")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli.verbose", locale = locale).to_string())
                .global(true)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .help(t!("cli.log_json", locale = locale).to_string())
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd.run_about", locale = locale).to_string())
                .arg(
                    Arg::new("manifest")
                        .short('m')
                        .long("manifest")
                        .help(t!("arg.manifest", locale = locale).to_string())
                        .value_name("MANIFEST")
                        .default_value(DEFAULT_MANIFEST_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("root")
                        .long("root")
                        .help(t!("arg.root", locale = locale).to_string())
                        .value_name("ROOT")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("tool")
                        .long("tool")
                        .help(t!("arg.tool", locale = locale).to_string())
                        .value_name("PROGRAM")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("only")
                        .long("only")
                        .help(t!("arg.only", locale = locale).to_string())
                        .value_name("NAME")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("capture-output")
                        .long("capture-output")
                        .help(t!("arg.capture_output", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("arg.html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("arg.json", locale = locale).to_string())
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help(t!("arg.dry_run", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd.init_about", locale = locale).to_string())
                .arg(
                    Arg::new("dev")
                        .long("dev")
                        .help(t!("arg.dev", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg.non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg.output", locale = locale).to_string())
                        .value_name("OUTPUT")
                        .default_value(DEFAULT_MANIFEST_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
}

/// Parses the process arguments, exiting with clap's usage message on error.
pub fn parse_args() -> CliArgs {
    let args: Vec<OsString> = std::env::args_os().collect();
    match try_parse_args_from(args) {
        Ok(cli_args) => cli_args,
        Err(e) => e.exit(),
    }
}

/// Parses an explicit argument list. The first item is the binary name.
pub fn try_parse_args_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let help_locale = crate::init_locale(pre_parse_language(&args).as_deref());
    let matches = build_cli(&help_locale).try_get_matches_from(args)?;
    from_matches(&matches)
}

fn from_matches(matches: &ArgMatches) -> Result<CliArgs, clap::Error> {
    let command = match matches.subcommand() {
        Some(("init", init_matches)) => CliCommand::Init(InitArgs {
            dev: init_matches.get_flag("dev"),
            non_interactive: init_matches.get_flag("non-interactive"),
            output: init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_FILE)),
        }),
        Some(("run", run_matches)) => CliCommand::Run(run_args(run_matches)),
        _ => return Err(clap::Error::new(clap::error::ErrorKind::MissingSubcommand)),
    };

    Ok(CliArgs {
        lang: matches.get_one::<String>("lang").cloned(),
        verbose: matches.get_count("verbose"),
        log_json: matches.get_flag("log-json"),
        command,
    })
}

fn run_args(matches: &ArgMatches) -> RunArgs {
    let flag = |id: &str| matches.try_get_one::<bool>(id).ok().flatten().copied().unwrap_or(false);
    let path = |id: &str| matches.try_get_one::<PathBuf>(id).ok().flatten().cloned();

    RunArgs {
        manifest: path("manifest").unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_FILE)),
        root: path("root"),
        tool: matches.try_get_one::<String>("tool").ok().flatten().cloned(),
        only: matches
            .try_get_many::<String>("only")
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        capture_output: flag("capture-output"),
        html: path("html"),
        json: path("json"),
        dry_run: flag("dry-run"),
    }
}

/// Runs the parsed command and returns the process exit code.
pub async fn process_command(cli_args: CliArgs) -> Result<ExitCode> {
    telemetry::init_tracing(
        cli_args.log_json,
        telemetry::level_for_verbosity(cli_args.verbose),
    );

    match cli_args.command {
        CliCommand::Run(run_args) => {
            let verdict = commands::run::execute(run_args, cli_args.lang.as_deref()).await?;
            Ok(verdict.into())
        }
        CliCommand::Init(init_args) => {
            commands::init::execute(init_args, cli_args.lang.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_is_found_in_both_spellings() {
        let split: Vec<OsString> = ["bin", "--lang", "zh-CN", "run"].iter().map(OsString::from).collect();
        let joined: Vec<OsString> = ["bin", "run", "--lang=en"].iter().map(OsString::from).collect();

        assert_eq!(pre_parse_language(&split).as_deref(), Some("zh-CN"));
        assert_eq!(pre_parse_language(&joined).as_deref(), Some("en"));
    }

    #[test]
    fn run_defaults_and_repeated_only() {
        let cli = try_parse_args_from(["bin", "-vv", "run", "--only", "micro", "--only", "small2"]).unwrap();

        assert_eq!(cli.verbose, 2);
        let CliCommand::Run(run) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(run.manifest, PathBuf::from(DEFAULT_MANIFEST_FILE));
        assert_eq!(run.only, vec!["micro", "small2"]);
        assert!(!run.dry_run);
    }

    #[test]
    fn init_subcommand_is_parsed() {
        let cli = try_parse_args_from(["bin", "init", "--dev", "--non-interactive"]).unwrap();

        assert_eq!(
            cli.command,
            CliCommand::Init(InitArgs {
                dev: true,
                non_interactive: true,
                output: PathBuf::from(DEFAULT_MANIFEST_FILE),
            })
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(try_parse_args_from(["bin", "--lang", "en"]).is_err());
    }
}
