use serde::Serialize;

use crate::deployers::{DeployerFactory, DockerFactory, KubernetesFactory, PodmanFactory};
use crate::schema::{self, SchemaError, ScopeSchema};

/// The data every documentation template is rendered against.
///
/// Built fresh for each template; there are no setters.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateData {
    docker_deployer: ScopeSchema,
    kubernetes_deployer: ScopeSchema,
    podman_deployer: ScopeSchema,
    scope: ScopeSchema,
    schema: ScopeSchema,
}

impl TemplateData {
    /// Collects the deployer configuration schemas and the schema
    /// self-descriptions. Fails on the first provider error.
    pub fn assemble() -> Result<Self, SchemaError> {
        Ok(Self {
            docker_deployer: DockerFactory::default().configuration_schema()?,
            kubernetes_deployer: KubernetesFactory::default().configuration_schema()?,
            podman_deployer: PodmanFactory::default().configuration_schema()?,
            scope: schema::describe_scope()?,
            schema: schema::describe_schema()?,
        })
    }

    pub fn docker_deployer(&self) -> &ScopeSchema {
        &self.docker_deployer
    }

    pub fn kubernetes_deployer(&self) -> &ScopeSchema {
        &self.kubernetes_deployer
    }

    pub fn podman_deployer(&self) -> &ScopeSchema {
        &self.podman_deployer
    }

    pub fn scope(&self) -> &ScopeSchema {
        &self.scope
    }

    pub fn schema(&self) -> &ScopeSchema {
        &self.schema
    }
}
