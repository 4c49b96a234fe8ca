use crate::demo::{run_cases, run_demo, run_profile, CasesArgs, DemoArgs, ProfileArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ijp_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "IJP Match",
    about = "Serve and explore the volunteer case board and onboarding flow",
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
    /// Filter a case list and print the resulting cards
    Cases(CasesArgs),
    /// Write a bare profile row without languages or roles
    Profile(ProfileArgs),
    /// Walk through filtering, onboarding and a password reset
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
        Command::Cases(args) => run_cases(args).await,
        Command::Profile(args) => run_profile(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
