use crate::report::{run_report, ReportArgs, ReportView};
use crate::server;
use clap::{Args, Parser, Subcommand};
use results_panel::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Results Panel",
    about = "Serve or render productivity and effectiveness results by zone",
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
    /// Render results from TSV files without starting the server
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Zone x category tables for both indicators
    Pivot(ReportArgs),
    /// Weighted composite ranking of the area's zones
    Ranking(ReportArgs),
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
        Command::Report {
            command: ReportCommand::Pivot(args),
        } => run_report(args, ReportView::Pivot),
        Command::Report {
            command: ReportCommand::Ranking(args),
        } => run_report(args, ReportView::Ranking),
    }
}
