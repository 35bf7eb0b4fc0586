use crate::{
    core::{ContainerDefinition, EcsApi, Page, TaskDefinition},
    error::EcsnvError,
};
use async_trait::async_trait;
use aws_config::{timeout::TimeoutConfig, BehaviorVersion};
use aws_sdk_ecs::{error::DisplayErrorContext, types, Client};
use std::time::Duration;

/// Upper bound for every single ECS call, retries included.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(3);
const PAGE_SIZE: i32 = 100;

#[derive(Debug)]
pub struct AwsEcsApi {
    ecs_client: Client,
}

impl AwsEcsApi {
    pub fn new(ecs_client: Client) -> Self {
        Self { ecs_client }
    }

    /// Resolves credentials and region through the standard AWS chain,
    /// pinned to `profile` when one is given.
    pub async fn connect(profile: Option<&str>) -> Result<Self, EcsnvError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(CALL_TIMEOUT)
                .build(),
        );
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        if config.region().is_none() {
            return Err(EcsnvError::Session(match profile {
                Some(profile) => format!("no region configured for profile '{}'", profile),
                None => "no region configured".to_string(),
            }));
        }
        tracing::debug!(region = ?config.region(), profile, "AWS session ready");

        Ok(Self::new(Client::new(&config)))
    }
}

#[async_trait]
impl EcsApi for AwsEcsApi {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page, EcsnvError> {
        tracing::debug!(?next_token, "ListClusters");
        let result = self
            .ecs_client
            .list_clusters()
            .max_results(PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| EcsnvError::service("ListClusters", DisplayErrorContext(&e).to_string()))?;

        Ok(Page::new(
            result.cluster_arns.unwrap_or_default(),
            result.next_token,
        ))
    }

    async fn list_services(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<Page, EcsnvError> {
        tracing::debug!(cluster, ?next_token, "ListServices");
        let result = self
            .ecs_client
            .list_services()
            .cluster(cluster)
            .max_results(PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| EcsnvError::service("ListServices", DisplayErrorContext(&e).to_string()))?;

        Ok(Page::new(
            result.service_arns.unwrap_or_default(),
            result.next_token,
        ))
    }

    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<String>, EcsnvError> {
        tracing::debug!(cluster, service, "DescribeServices");
        let result = self
            .ecs_client
            .describe_services()
            .cluster(cluster)
            .services(service)
            .send()
            .await
            .map_err(|e| {
                EcsnvError::service("DescribeServices", DisplayErrorContext(&e).to_string())
            })?;

        Ok(result
            .services
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|service| service.task_definition))
    }

    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<Option<TaskDefinition>, EcsnvError> {
        tracing::debug!(task_definition, "DescribeTaskDefinition");
        let result = self
            .ecs_client
            .describe_task_definition()
            .task_definition(task_definition)
            .send()
            .await
            .map_err(|e| {
                EcsnvError::service("DescribeTaskDefinition", DisplayErrorContext(&e).to_string())
            })?;

        Ok(result.task_definition.map(TaskDefinition::from))
    }
}

impl From<types::TaskDefinition> for TaskDefinition {
    fn from(task_definition: types::TaskDefinition) -> Self {
        Self {
            container_definitions: task_definition
                .container_definitions
                .map(|containers| containers.into_iter().map(ContainerDefinition::from).collect()),
        }
    }
}

impl From<types::ContainerDefinition> for ContainerDefinition {
    fn from(container: types::ContainerDefinition) -> Self {
        Self {
            name: container.name,
            environment: container
                .environment
                .unwrap_or_default()
                .into_iter()
                .filter_map(|pair| Some((pair.name?, pair.value.unwrap_or_default())))
                .collect(),
        }
    }
}
