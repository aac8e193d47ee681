//! Deployer factories and the configuration schemas they accept.

use crate::schema::{PropertySchema, SchemaError, ScopeSchema, TypeSchema};

pub mod docker;
pub mod kubernetes;
pub mod podman;

pub use docker::DockerFactory;
pub use kubernetes::KubernetesFactory;
pub use podman::PodmanFactory;

/// A factory for one deployment backend.
pub trait DeployerFactory {
    /// Short identifier of the backend, e.g. `docker`.
    fn id(&self) -> &'static str;

    /// Describes the configuration the deployer accepts.
    fn configuration_schema(&self) -> Result<ScopeSchema, SchemaError>;
}

pub(crate) fn property(type_: TypeSchema, name: &str, description: &str) -> PropertySchema {
    PropertySchema::new(type_).with_display(name, description)
}

pub(crate) fn image_pull_policy() -> TypeSchema {
    TypeSchema::string_enum([
        ("Always", "Always"),
        ("IfNotPresent", "If not present"),
        ("Never", "Never"),
    ])
}

pub(crate) fn pem_property(name: &str, description: &str) -> PropertySchema {
    property(
        TypeSchema::string_pattern(r"^\s*-----BEGIN [A-Z ]+-----(\s*.*\s*)*-----END [A-Z ]+-----\s*$"),
        name,
        description,
    )
    .with_example("\"-----BEGIN CERTIFICATE-----\\nMIIB...\\n-----END CERTIFICATE-----\\n\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factories_build_valid_schemas() {
        let factories: Vec<Box<dyn DeployerFactory>> = vec![
            Box::new(DockerFactory::default()),
            Box::new(KubernetesFactory::default()),
            Box::new(PodmanFactory::default()),
        ];
        for factory in factories {
            let scope = factory
                .configuration_schema()
                .unwrap_or_else(|e| panic!("{} schema is invalid: {e}", factory.id()));
            assert_eq!(scope.root, "Config");
            assert!(scope.root_object().is_some());
        }
    }

    #[test]
    fn test_factory_ids_are_distinct() {
        let ids = [
            DockerFactory::default().id(),
            KubernetesFactory::default().id(),
            PodmanFactory::default().id(),
        ];
        assert_eq!(ids, ["docker", "kubernetes", "podman"]);
    }
}
