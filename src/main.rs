//! PolGen - Entry Point
//!
//! `polgen init` bootstraps the AWS account for a forked wiki repository.
//! `polgen template` prints the bootstrap template for manual setup.

use clap::{Args, Parser, Subcommand};
use polgen::aws::{AwsExecutor, SystemRunner};
use polgen::bootstrap::init::{print_manual_instructions, run_init, InitOptions, StdinPrompt};
use polgen::bootstrap::repo::{detect_repo_name, validate_repo_name};
use polgen::bootstrap::{deployment_seed, derive_postfix, render_template};
use polgen::core::config::{PolgenConfig, TransportKind, DEFAULT_CONFIG_FILE};
use polgen::core::error::{PolgenError, Result};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "polgen")]
#[command(about = "Bootstrap tooling for the PolGen policy wiki")]
struct Cli {
    /// Config file (defaults to ./polgen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the GitHub and AWS accounts after having forked the repo
    Init(InitArgs),
    /// Print the bootstrap CloudFormation template
    Template(TemplateArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    /// GitHub repository as <owner>/<repo> (detected from git when omitted)
    #[arg(long)]
    repo: Option<String>,

    /// Deployment branch (asked for when omitted)
    #[arg(long)]
    branch: Option<String>,

    /// Create or update the stack without asking
    #[arg(long, short = 'y')]
    yes: bool,

    /// Which AWS transport to use
    #[arg(long, value_enum)]
    transport: Option<TransportKind>,
}

#[derive(Args, Debug)]
struct TemplateArgs {
    /// GitHub repository as <owner>/<repo>
    #[arg(long)]
    repo: String,

    /// Deployment branch
    #[arg(long)]
    branch: Option<String>,

    /// Also print the manual setup instructions
    #[arg(long)]
    instructions: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("polgen={level}"))),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = PolgenConfig::load(&config_path)?;

    match cli.command {
        Command::Init(args) => {
            if let Some(transport) = args.transport {
                config.transport = transport;
            }
            init(&config, args)
        }
        Command::Template(args) => template(&config, args),
    }
}

fn init(config: &PolgenConfig, args: InitArgs) -> Result<()> {
    let repo = args
        .repo
        .or_else(|| detect_repo_name(&SystemRunner, &config.git_program));
    let options = InitOptions {
        repo,
        branch: args.branch,
        assume_yes: args.yes,
    };

    let executor = match AwsExecutor::detect(config) {
        Ok(executor) => executor,
        Err(PolgenError::NoAwsInterface) => {
            eprintln!("For manual setup run `polgen template --repo <owner>/<repo> --instructions`.");
            return Err(PolgenError::NoAwsInterface);
        }
        Err(e) => return Err(e),
    };

    let summary = run_init(
        &executor,
        config,
        &options,
        &mut StdinPrompt,
        &mut io::stdout().lock(),
    )?;
    tracing::info!(
        "Init finished for {}/{} (postfix {}): {:?}",
        summary.repo,
        summary.branch,
        summary.postfix,
        summary.action
    );
    Ok(())
}

fn template(config: &PolgenConfig, args: TemplateArgs) -> Result<()> {
    validate_repo_name(&args.repo)?;
    let branch = args.branch.unwrap_or_else(|| config.default_branch.clone());
    let postfix = derive_postfix(&deployment_seed(&args.repo, &branch));
    if args.instructions {
        print_manual_instructions(&postfix, &mut io::stdout().lock())?;
    } else {
        println!("{}", render_template(&postfix));
    }
    Ok(())
}
