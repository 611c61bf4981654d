use crate::demo::{
    run_assess, run_dashboard, run_demo, run_health, AssessArgs, DashboardArgs, DemoArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use student_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Student Risk Assessment",
    about = "Run the student dropout-risk assessment service or exercise it from the command line",
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
    /// Score a completed answer file and store the session
    Assess(AssessArgs),
    /// Check whether the remote prediction service is reachable
    Health,
    /// Print the retention dashboard built from stored sessions
    Dashboard(DashboardArgs),
    /// Walk through a scripted assessment using the local fallback scorer
    Demo(DemoArgs),
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
        Command::Assess(args) => run_assess(args).await,
        Command::Health => run_health().await,
        Command::Dashboard(args) => run_dashboard(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
