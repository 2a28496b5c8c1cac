use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use nova::cli::{Cli, Commands, ConfigCommands, SecretCommands};
use nova::commands::{
    handle_config_add, handle_config_clone, handle_config_edit, handle_config_list,
    handle_config_remove, handle_secret_check, handle_secret_clone, handle_secret_list,
    handle_secret_set,
};
use nova::config::Config;
use nova::db::{Repository, init_db};
use nova::error::Result;
use nova::utils::TerminalPrompt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("NOVA_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("nova=debug")
        } else {
            EnvFilter::new("nova=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");
    let cwd = std::env::current_dir()?;

    match command {
        Commands::Config { command: None } => print_group_help("config")?,
        Commands::Secret { command: None } => print_group_help("secret")?,

        Commands::Config {
            command: Some(command),
        } => {
            let repo = open_repository(&config)?;
            match command {
                ConfigCommands::Clone { shorthands } => {
                    handle_config_clone(&repo, &cwd, &shorthands).await?;
                }
                ConfigCommands::List => {
                    handle_config_list(&repo).await?;
                }
                ConfigCommands::Add {
                    shorthand,
                    filename,
                } => {
                    handle_config_add(&repo, &cwd, &shorthand, &filename).await?;
                }
                ConfigCommands::Remove { shorthand } => {
                    handle_config_remove(&repo, &shorthand).await?;
                }
                ConfigCommands::Edit { shorthand } => {
                    handle_config_edit(&repo, &config.editor(), &shorthand).await?;
                }
            }
        }

        Commands::Secret {
            command: Some(command),
        } => {
            let repo = open_repository(&config)?;
            let prompt = TerminalPrompt;
            match command {
                SecretCommands::Clone => {
                    handle_secret_clone(&config, &repo, &prompt, &cwd).await?;
                }
                SecretCommands::Set { path } => {
                    handle_secret_set(&config, &repo, &prompt, &cwd, &path).await?;
                }
                SecretCommands::Check => {
                    handle_secret_check(&config, &repo, &prompt, &cwd).await?;
                }
                SecretCommands::List => {
                    handle_secret_list(&config, &repo, &prompt, &cwd).await?;
                }
            }
        }
    }

    Ok(())
}

/// Print the help of a command group invoked without a subcommand.
fn print_group_help(name: &str) -> Result<()> {
    let mut cli = Cli::command();
    cli.build();
    if let Some(group) = cli.find_subcommand_mut(name) {
        group.print_help()?;
        println!();
    }
    Ok(())
}

fn open_repository(config: &Config) -> Result<Repository> {
    let path = config.database_path()?;
    tracing::debug!(path = %path.display(), "opening store");
    Ok(Repository::new(init_db(&path)?))
}
