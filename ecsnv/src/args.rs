use clap::Parser;
use shared::configuration::Configuration;
use std::path::PathBuf;

/// Load AWS ECS envs locally.
#[derive(Debug, Parser)]
#[command(
    name = "ecsnv",
    version,
    about = "Load AWS ECS envs locally",
    long_about = "Download the environment variables of an AWS ECS service's current task \
definition. The envs can be written into a file or printed as KEY=VALUE lines to be \
exported in the current terminal session.\n\nCluster and service are picked interactively \
when not given."
)]
pub struct Cli {
    /// ECS cluster name
    #[arg(short, long)]
    pub cluster: Option<String>,

    /// ECS service name, service can be paired with cluster
    #[arg(short, long)]
    pub service: Option<String>,

    /// File to export
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// AWS profile (overrides the default profile set in terminal)
    #[arg(short, long)]
    pub profile: Option<String>,
}

impl From<Cli> for Configuration {
    fn from(cli: Cli) -> Self {
        Self {
            cluster: cli.cluster,
            service: cli.service,
            file: cli.file,
            profile: cli.profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use shared::error::EcsnvError;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_flags_should_map_onto_configuration() {
        let cli = Cli::try_parse_from([
            "ecsnv", "-c", "production", "-s", "api", "-f", "prod.env", "-p", "prod",
        ])
        .unwrap();

        let flags = Configuration::from(cli);

        assert_eq!(flags.cluster.as_deref(), Some("production"));
        assert_eq!(flags.service.as_deref(), Some("api"));
        assert_eq!(flags.file, Some(PathBuf::from("prod.env")));
        assert_eq!(flags.profile.as_deref(), Some("prod"));
    }

    #[test]
    fn service_without_cluster_should_be_rejected_before_any_client_exists() {
        figment::Jail::expect_with(|_jail| {
            let cli = Cli::try_parse_from(["ecsnv", "--service=foo"]).unwrap();

            let result = Configuration::load(cli.into());

            assert!(matches!(result, Err(EcsnvError::Config(_))));

            Ok(())
        });
    }

    #[test]
    fn no_flags_should_be_accepted() {
        figment::Jail::expect_with(|_jail| {
            let cli = Cli::try_parse_from(["ecsnv"]).unwrap();

            assert!(Configuration::load(cli.into()).is_ok());

            Ok(())
        });
    }
}
