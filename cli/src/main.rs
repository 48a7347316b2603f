use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_dispatch_core::{
    CommandManager, ConsoleIssuer, DispatchConfig, Issuer, Outcome, ParentCommand,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod demo;

/// Output format for `describe`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "dispatch-console")]
#[command(about = "Console host for the command dispatch engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read command lines from stdin and dispatch them as the console.
    Run(RunArgs),
    /// Print the registered command tree.
    Describe(DescribeArgs),
    /// List completions for a partially typed command line.
    Complete(CompleteArgs),
    /// Validate a console config file and print its effective values.
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Console config YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Permission granted to the console issuer (repeatable).
    #[arg(long = "grant")]
    grants: Vec<String>,
    /// Log dispatch decisions to stderr.
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    /// Permission granted to the console issuer (repeatable).
    #[arg(long = "grant")]
    grants: Vec<String>,
    /// Root alias followed by the tokens typed so far.
    #[arg(required = true, allow_hyphen_values = true)]
    line: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckConfigArgs {
    /// Console config YAML file.
    input: PathBuf,
}

/// Config file read by `run`: dispatch settings plus console grants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConsoleConfig {
    #[serde(flatten)]
    dispatch: DispatchConfig,
    /// Permissions granted to the console issuer.
    #[serde(default)]
    grants: Vec<String>,
}

impl ConsoleConfig {
    fn load(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
        serde_yaml::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))
    }
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Command::Run(args) if args.verbose);
    init_tracing(verbose);

    let result = match cli.command {
        Command::Run(args) => run_run(args),
        Command::Describe(args) => run_describe(args),
        Command::Complete(args) => run_complete(args),
        Command::CheckConfig(args) => run_check_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_manager(config: DispatchConfig) -> Result<CommandManager, String> {
    let mut manager = CommandManager::with_config(config);
    demo::register(&mut manager).map_err(|err| format!("Failed to register commands: {err}"))?;
    Ok(manager)
}

fn run_run(args: RunArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };
    let manager = build_manager(config.dispatch)?;
    let console = ConsoleIssuer::new("console")
        .with_permissions(config.grants)
        .with_permissions(args.grants);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| format!("Failed to read stdin: {err}"))?;
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let Some((alias, rest)) = tokens.split_first() else {
            continue;
        };

        let reply = match dispatch_line(&manager, alias, rest, &console) {
            Ok(outcome) => {
                debug!(?outcome, line = %line, "dispatched");
                None
            }
            Err(err) => Some(err),
        };

        for message in console.take_messages() {
            writeln!(stdout, "{message}").map_err(|err| format!("Failed to write stdout: {err}"))?;
        }
        if let Some(reply) = reply {
            writeln!(stdout, "{reply}").map_err(|err| format!("Failed to write stdout: {err}"))?;
        }
    }

    Ok(())
}

/// Resolves the root for one console line and dispatches it.
///
/// The error string is printed to the console instead of aborting the loop.
fn dispatch_line(
    manager: &CommandManager,
    alias: &str,
    rest: &[String],
    console: &dyn Issuer,
) -> Result<Outcome, String> {
    if let Some(root) = manager.find_command(alias) {
        let (sub, args) = split_subcommand(root, rest);
        return manager
            .dispatch(root, sub, args, console)
            .map_err(|err| format!("error: {err}"));
    }

    match manager.find_command_by_child_alias(alias) {
        Some(root) => manager
            .dispatch(root, Some(alias), rest, console)
            .map_err(|err| format!("error: {err}")),
        None => Err(format!("Unknown command: {alias}")),
    }
}

fn split_subcommand<'a>(root: &ParentCommand, rest: &'a [String]) -> (Option<&'a str>, &'a [String]) {
    match rest.split_first() {
        Some((first, args)) if root.find_child(first).is_some() => (Some(first.as_str()), args),
        _ => (None, rest),
    }
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let manager = build_manager(DispatchConfig::default())?;
    let summaries = manager.commands().summaries();

    let raw = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&summaries)
            .map_err(|err| format!("Failed to serialize command tree: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&summaries)
            .map_err(|err| format!("Failed to serialize command tree: {err}"))?,
    };
    println!("{}", raw.trim_end());
    Ok(())
}

fn run_complete(args: CompleteArgs) -> Result<(), String> {
    let manager = build_manager(DispatchConfig::default())?;
    let console = ConsoleIssuer::new("console").with_permissions(args.grants);

    let Some((alias, tokens)) = args.line.split_first() else {
        return Err("Missing root alias".to_string());
    };
    for suggestion in manager.suggest(alias, tokens, &console) {
        println!("{suggestion}");
    }
    Ok(())
}

fn run_check_config(args: CheckConfigArgs) -> Result<(), String> {
    let config = ConsoleConfig::load(&args.input)?;
    let raw = serde_yaml::to_string(&config)
        .map_err(|err| format!("Failed to serialize config: {err}"))?;

    println!("Config '{}' is valid.", args.input.display());
    print!("{raw}");
    Ok(())
}
