use crate::{configuration::Configuration, error::EcsnvError, output};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::Write;

#[cfg(test)]
use mockall::automock;

/// Variable name to value, taken from a single container definition.
pub type Environment = HashMap<String, String>;

/// One page of a list call: the raw ARNs plus the token for the next page.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Page {
    pub arns: Vec<String>,
    pub next_token: Option<String>,
}

impl Page {
    pub fn new(arns: Vec<String>, next_token: Option<String>) -> Self {
        Self { arns, next_token }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskDefinition {
    pub container_definitions: Option<Vec<ContainerDefinition>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContainerDefinition {
    pub name: Option<String>,
    pub environment: Vec<(String, String)>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait EcsApi: Debug {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page, EcsnvError>;
    async fn list_services(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<Page, EcsnvError>;
    /// Task definition reference of the service's current deployment, if the
    /// service exists.
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<String>, EcsnvError>;
    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<Option<TaskDefinition>, EcsnvError>;
}

/// Interactive choice between names. `None` means nothing was picked, either
/// because `items` was empty or the user backed out.
#[cfg_attr(test, automock)]
pub trait Selector {
    fn select(&self, label: &str, items: &[String]) -> Result<Option<String>, EcsnvError>;
}

/// Reads clusters, services and task definitions through an [`EcsApi`].
#[derive(Debug)]
pub struct EnvFetcher<A: EcsApi> {
    api: A,
}

impl<A: EcsApi> EnvFetcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn list_clusters(&self) -> Result<Vec<String>, EcsnvError> {
        let mut clusters = Vec::new();
        let mut next_token = None;

        loop {
            let page = self.api.list_clusters(next_token).await?;
            clusters.extend(page.arns.iter().map(|arn| cluster_name(arn).to_string()));

            next_token = page.next_token.filter(|token| !token.is_empty());
            if next_token.is_none() {
                break;
            }
        }

        Ok(clusters)
    }

    pub async fn list_services(&self, cluster: &str) -> Result<Vec<String>, EcsnvError> {
        let mut services = Vec::new();
        let mut next_token = None;

        loop {
            let page = self.api.list_services(cluster, next_token).await?;
            services.extend(
                page.arns
                    .iter()
                    .map(|arn| service_name(arn, cluster).to_string()),
            );

            next_token = page.next_token.filter(|token| !token.is_empty());
            if next_token.is_none() {
                break;
            }
        }

        Ok(services)
    }

    pub async fn current_task_definition(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<String, EcsnvError> {
        self.api
            .describe_service(cluster, service)
            .await?
            .ok_or_else(|| {
                EcsnvError::NotFound(format!(
                    "service '{}' not found in cluster '{}'",
                    service, cluster
                ))
            })
    }

    /// Only the first container definition is read. Variables declared on
    /// sidecars or any later container are not part of the result.
    pub async fn environment(&self, task_definition: &str) -> Result<Environment, EcsnvError> {
        let task_definition = self
            .api
            .describe_task_definition(task_definition)
            .await?
            .ok_or_else(|| EcsnvError::NotFound("missing task definitions".to_string()))?;

        let container = task_definition
            .container_definitions
            .and_then(|containers| containers.into_iter().next())
            .ok_or_else(|| EcsnvError::NotFound("missing container definitions".to_string()))?;

        Ok(container.environment.into_iter().collect())
    }
}

/// `arn:aws:ecs:<region>:<account>:cluster/<name>` -> `<name>`
fn cluster_name(arn: &str) -> &str {
    arn.split_once("cluster/").map_or(arn, |(_, name)| name)
}

/// `arn:aws:ecs:<region>:<account>:service/<cluster>/<name>` -> `<name>`.
/// Old-format ARNs without the cluster segment keep their last segment.
fn service_name<'a>(arn: &'a str, cluster: &str) -> &'a str {
    arn.split_once(&format!("/{}/", cluster))
        .map(|(_, name)| name)
        .or_else(|| arn.rsplit('/').next())
        .unwrap_or(arn)
}

/// Runs one invocation: resolve cluster and service, fetch the environment of
/// the current task definition and emit it.
pub struct EnvLoader<A: EcsApi, S: Selector> {
    fetcher: EnvFetcher<A>,
    selector: S,
}

impl<A: EcsApi, S: Selector> EnvLoader<A, S> {
    pub fn new(fetcher: EnvFetcher<A>, selector: S) -> Self {
        Self { fetcher, selector }
    }

    pub async fn run<W: Write>(
        &self,
        configuration: &Configuration,
        out: &mut W,
    ) -> Result<(), EcsnvError> {
        let cluster = match &configuration.cluster {
            Some(cluster) => cluster.clone(),
            None => {
                let clusters = self.fetcher.list_clusters().await?;
                if clusters.is_empty() {
                    tracing::info!("No clusters found");
                }
                self.choose("cluster", "Select cluster", &clusters)?
            }
        };

        let service = match &configuration.service {
            Some(service) => service.clone(),
            None => {
                let services = self.fetcher.list_services(&cluster).await?;
                if services.is_empty() {
                    tracing::info!(cluster = %cluster, "No services found");
                }
                self.choose("service", "Select service", &services)?
            }
        };

        let task_definition = self
            .fetcher
            .current_task_definition(&cluster, &service)
            .await?;
        tracing::debug!(%cluster, %service, %task_definition, "Resolved task definition");

        let envs = self.fetcher.environment(&task_definition).await?;

        match &configuration.file {
            Some(path) => {
                let written = output::write_envs(&envs, path)?;
                writeln!(out, "{}", written)?;
            }
            None => output::print_envs(&envs, out)?,
        }

        Ok(())
    }

    fn choose(
        &self,
        kind: &'static str,
        label: &str,
        items: &[String],
    ) -> Result<String, EcsnvError> {
        self.selector
            .select(label, items)?
            .ok_or(EcsnvError::Selection(kind))
    }
}
