use busbuddy::commands::Cli;
use busbuddy::libs::messages::macros::init_tracing;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    init_tracing();
    Cli::menu()
}
