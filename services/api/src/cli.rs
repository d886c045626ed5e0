use crate::demo::{run_comps_report, run_demo, CompsReportArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use comps_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Comparable Market Engine",
    about = "Run the comparable-listing pipeline and market report service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Normalize comparables and compute market statistics
    Comps {
        #[command(subcommand)]
        command: CompsCommand,
    },
    /// Run an end-to-end CLI demo covering comps and photo selection
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CompsCommand {
    /// Generate a market report from a raw listing export
    Report(CompsReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Comps {
            command: CompsCommand::Report(args),
        } => run_comps_report(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
