use crate::args::Cli;
use crate::prompt::TerminalSelector;
use clap::{CommandFactory, Parser};
use shared::adapters::AwsEcsApi;
use shared::configuration::Configuration;
use shared::core::{EnvFetcher, EnvLoader};
use shared::error::EcsnvError;
use std::process::ExitCode;

mod args;
mod prompt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    shared::observability::init_logging();

    let config = match Configuration::load(cli.into()) {
        Ok(config) => config,
        Err(e) if e.is_usage() => {
            println!("Error: {}", e);
            if let Err(e) = Cli::command().print_help() {
                tracing::warn!("Failed to print help: {}", e);
            }
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(e),
    };
    tracing::debug!("{}", config);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

async fn run(config: &Configuration) -> Result<(), EcsnvError> {
    let ecs_api = AwsEcsApi::connect(config.profile.as_deref()).await?;
    let loader = EnvLoader::new(EnvFetcher::new(ecs_api), TerminalSelector::new());

    loader.run(config, &mut std::io::stdout()).await
}

fn fail(e: EcsnvError) -> ExitCode {
    tracing::error!("{}", e);
    ExitCode::from(e.exit_code())
}
