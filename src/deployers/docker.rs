use super::{image_pull_policy, pem_property, property, DeployerFactory};
use crate::schema::{ObjectSchema, SchemaError, ScopeSchema, TypeSchema};

const DEFAULT_HOST: &str = "unix:///var/run/docker.sock";

/// Runs plugins as containers through the Docker engine API.
#[derive(Debug, Default, Clone, Copy)]
pub struct DockerFactory;

impl DeployerFactory for DockerFactory {
    fn id(&self) -> &'static str {
        "docker"
    }

    fn configuration_schema(&self) -> Result<ScopeSchema, SchemaError> {
        ScopeSchema::new(
            "Config",
            [config(), connection(), deployment(), container_config(), host_config()],
        )
    }
}

fn config() -> ObjectSchema {
    ObjectSchema::new(
        "Config",
        [
            (
                "connection",
                property(
                    TypeSchema::reference("Connection"),
                    "Docker connection",
                    "Docker connection information.",
                ),
            ),
            (
                "deployment",
                property(
                    TypeSchema::reference("Deployment"),
                    "Deployment",
                    "Deployment configuration for the plugin.",
                ),
            ),
            (
                "timeouts",
                property(
                    ObjectSchema::new(
                        "Timeouts",
                        [(
                            "http",
                            property(
                                TypeSchema::int_range(Some(100_000_000), None, Some("nanoseconds")),
                                "HTTP",
                                "HTTP timeout for the Docker API.",
                            )
                            .with_default("\"15s\""),
                        )],
                    )
                    .into(),
                    "Timeouts",
                    "Timeouts for the Docker connection.",
                ),
            ),
        ],
    )
}

fn connection() -> ObjectSchema {
    ObjectSchema::new(
        "Connection",
        [
            (
                "host",
                property(
                    TypeSchema::string(),
                    "Host",
                    "Host name for Docker. Can be a unix socket or a TCP address.",
                )
                .with_default(&format!("\"{DEFAULT_HOST}\"")),
            ),
            (
                "cacert",
                pem_property("CA certificate", "CA certificate in PEM format to verify the Docker server certificate against."),
            ),
            (
                "cert",
                pem_property("Client certificate", "Client certificate in PEM format to authenticate against the Docker server with.")
                    .with_required_if("key"),
            ),
            (
                "key",
                pem_property("Client key", "Client private key in PEM format to authenticate against the Docker server with.")
                    .with_required_if("cert"),
            ),
        ],
    )
}

fn deployment() -> ObjectSchema {
    ObjectSchema::new(
        "Deployment",
        [
            (
                "container",
                property(
                    TypeSchema::reference("ContainerConfig"),
                    "Container configuration",
                    "Container configuration for the plugin.",
                ),
            ),
            (
                "host",
                property(
                    TypeSchema::reference("HostConfig"),
                    "Host configuration",
                    "Host configuration for the plugin.",
                ),
            ),
            (
                "imagePullPolicy",
                property(
                    image_pull_policy(),
                    "Image pull policy",
                    "When to pull the plugin image.",
                )
                .with_default("\"IfNotPresent\""),
            ),
        ],
    )
}

fn container_config() -> ObjectSchema {
    ObjectSchema::new(
        "ContainerConfig",
        [
            (
                "Domainname",
                property(TypeSchema::string(), "Domain name", "Domain name for the plugin container."),
            ),
            (
                "Env",
                property(
                    TypeSchema::map(TypeSchema::string_pattern("^[A-Z0-9_]+$"), TypeSchema::string()),
                    "Environment variables",
                    "Environment variables to set on the plugin container.",
                ),
            ),
            (
                "MacAddress",
                property(
                    TypeSchema::string_pattern("^[a-fA-F0-9]{2}(:[a-fA-F0-9]{2}){5}$"),
                    "MAC address",
                    "Media Access Control address for the container.",
                ),
            ),
            (
                "NetworkDisabled",
                property(TypeSchema::bool(), "Disable network", "Disable container networking completely."),
            ),
            (
                "User",
                property(TypeSchema::string(), "Username", "User that will run the command inside the container. Optionally, a group can be specified in the user:group format."),
            ),
        ],
    )
}

fn host_config() -> ObjectSchema {
    ObjectSchema::new(
        "HostConfig",
        [
            (
                "Binds",
                property(
                    TypeSchema::list(TypeSchema::string_pattern("^.+:.+$")),
                    "Volume bindings",
                    "Volumes to mount in the container, in the source:target format.",
                ),
            ),
            (
                "CapAdd",
                property(TypeSchema::list(TypeSchema::string()), "Add capabilities", "Add capabilities to the container."),
            ),
            (
                "CapDrop",
                property(TypeSchema::list(TypeSchema::string()), "Drop capabilities", "Drop capabilities from the container."),
            ),
            (
                "CgroupnsMode",
                property(
                    TypeSchema::string_enum([("", "Empty"), ("private", "Private"), ("host", "Host")]),
                    "CGroup namespace mode",
                    "CGroup namespace mode to use for the container.",
                ),
            ),
            (
                "NetworkMode",
                property(
                    TypeSchema::string_pattern("^(none|bridge|host|container:[a-zA-Z0-9][a-zA-Z0-9_.-]+|[a-zA-Z0-9][a-zA-Z0-9_.-]+)$"),
                    "Network mode",
                    "Network mode for the container. The first two characters of a container name must be alphanumeric.",
                ),
            ),
            (
                "Privileged",
                property(TypeSchema::bool(), "Privileged", "Run the container in privileged mode.")
                    .with_default("false"),
            ),
        ],
    )
}
