use std::io;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use portfolio::commands::{email::EmailCommand, serve::serve, submit::SubmitArgs};
use portfolio_config::Config;
use portfolio_utils::portfolio_version;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.command.run().await
}

/// Contact form backend of the portfolio website
#[derive(Debug, Parser)]
#[command(version = portfolio_version())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Accept contact form submissions over HTTP and forward them by email
    #[command(aliases(["run", "s"]))]
    Serve,
    /// Check that the configured mail provider delivers
    #[command(alias("e"))]
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
    /// Validate a contact message like the website does and submit it to a
    /// running server
    Submit(SubmitArgs),
    /// Load the configuration and report errors
    CheckConfig {
        /// Print the loaded configuration
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Serve => serve(load_config()?).await,
            Self::Email { command } => command.invoke(load_config()?).await,
            Self::Submit(args) => args.invoke().await,
            Self::CheckConfig { verbose } => {
                let config = load_config()?;
                if verbose {
                    println!("{config:#?}");
                }
                Ok(())
            }
            Self::Completion { shell } => {
                clap_complete::generate(
                    shell,
                    &mut Cli::command(),
                    env!("CARGO_BIN_NAME"),
                    &mut io::stdout(),
                );
                Ok(())
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    portfolio_config::load().context("Failed to load config")
}

/// Logs go to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env());

    #[cfg(tracing_pretty)]
    let subscriber = subscriber.pretty();

    subscriber.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_submit() {
        let cli = Cli::try_parse_from([
            "portfolio",
            "submit",
            "--name",
            "Max",
            "--email",
            "max@example.de",
            "--message",
            "Hello World, how are you?",
        ])
        .unwrap();

        let Command::Submit(args) = cli.command else {
            panic!("expected submit command");
        };
        assert_eq!(args.subject, "");
        assert_eq!(args.endpoint.as_str(), "http://127.0.0.1:8000/api/contact");
    }
}
