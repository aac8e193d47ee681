use super::{image_pull_policy, property, DeployerFactory};
use crate::schema::{ObjectSchema, SchemaError, ScopeSchema, TypeSchema};

/// Runs plugins as containers through the podman CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct PodmanFactory;

impl DeployerFactory for PodmanFactory {
    fn id(&self) -> &'static str {
        "podman"
    }

    fn configuration_schema(&self) -> Result<ScopeSchema, SchemaError> {
        ScopeSchema::new("Config", [config(), podman(), deployment(), container()])
    }
}

fn config() -> ObjectSchema {
    ObjectSchema::new(
        "Config",
        [
            (
                "podman",
                property(
                    TypeSchema::reference("Podman"),
                    "Podman",
                    "Podman CLI configuration.",
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
        ],
    )
}

fn podman() -> ObjectSchema {
    ObjectSchema::new(
        "Podman",
        [
            (
                "path",
                property(TypeSchema::string(), "Podman path", "Path to the podman binary.")
                    .with_default("\"podman\""),
            ),
            (
                "containerName",
                property(
                    TypeSchema::string_pattern("^.*$"),
                    "Container name",
                    "Name prefix of the plugin containers.",
                ),
            ),
            (
                "cgroupNs",
                property(
                    TypeSchema::string_pattern("^host|ns:/proc/\\d+/ns/cgroup|container:.+|private$"),
                    "CGroup namespace",
                    "CGroup namespace to use for the container: host, ns:<path>, container:<name> or private.",
                ),
            ),
            (
                "imageArchitecture",
                property(
                    TypeSchema::string_pattern("^.*$"),
                    "Podman image Architecture",
                    "Podman image architecture to pull.",
                )
                .with_default("\"amd64\""),
            ),
            (
                "imageOS",
                property(
                    TypeSchema::string_pattern("^.*$"),
                    "Podman Image OS",
                    "Podman image operating system to pull.",
                )
                .with_default("\"linux\""),
            ),
            (
                "networkMode",
                property(
                    TypeSchema::string_pattern("^bridge:.*|host|none|ns:/proc/\\d+/ns/net|slirp4netns:.*|pasta:.*|private$"),
                    "Network mode",
                    "Network mode of the container.\nSee the podman run --network documentation for the accepted values.",
                ),
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
                "imagePullPolicy",
                property(image_pull_policy(), "Image pull policy", "When to pull the plugin image.")
                    .with_default("\"IfNotPresent\""),
            ),
        ],
    )
}

fn container() -> ObjectSchema {
    ObjectSchema::new(
        "ContainerConfig",
        [
            (
                "Env",
                property(
                    TypeSchema::list(TypeSchema::string_pattern("^.+=.+$")),
                    "Environment variables",
                    "Environment variables to set on the plugin container, in the NAME=value format.",
                ),
            ),
            (
                "User",
                property(
                    TypeSchema::string(),
                    "Username",
                    "User that will run the command inside the container.",
                ),
            ),
            (
                "NetworkDisabled",
                property(TypeSchema::bool(), "Disable network", "Disable container networking completely."),
            ),
            (
                "Binds",
                property(
                    TypeSchema::list(TypeSchema::string_pattern("^.+:.+$")),
                    "Volume bindings",
                    "Volumes to mount in the container, in the source:target format.",
                ),
            ),
        ],
    )
}
