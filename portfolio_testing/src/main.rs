use std::{io, net::IpAddr};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use portfolio_testing::resend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Resend(args) => resend::start_server(args.host, args.port, args.api_key).await,
        Command::Completion { shell } => {
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

/// Fake third party services for local development and tests
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a fake Resend email API that keeps accepted emails in memory
    Resend(ResendArgs),
    /// Print shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, clap::Args)]
struct ResendArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,
    #[arg(long, default_value_t = 8001)]
    port: u16,
    /// The only api key accepted as bearer token
    #[arg(long, default_value = "re_test")]
    api_key: String,
}
