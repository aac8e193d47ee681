use super::{image_pull_policy, pem_property, property, DeployerFactory};
use crate::schema::{ObjectSchema, SchemaError, ScopeSchema, TypeSchema};

/// Runs plugins as pods in a Kubernetes cluster.
#[derive(Debug, Default, Clone, Copy)]
pub struct KubernetesFactory;

impl DeployerFactory for KubernetesFactory {
    fn id(&self) -> &'static str {
        "kubernetes"
    }

    fn configuration_schema(&self) -> Result<ScopeSchema, SchemaError> {
        ScopeSchema::new(
            "Config",
            [
                config(),
                connection(),
                pod(),
                object_meta(),
                pod_spec(),
                container(),
                toleration(),
                timeouts(),
            ],
        )
    }
}

fn label_map() -> TypeSchema {
    TypeSchema::map(
        TypeSchema::string_pattern("^(|([a-zA-Z](|[a-zA-Z\\-.]{0,251}[a-zA-Z0-9]))/)([a-zA-Z](|[a-zA-Z\\-]{0,61}[a-zA-Z0-9]))$"),
        TypeSchema::string(),
    )
}

fn config() -> ObjectSchema {
    ObjectSchema::new(
        "Config",
        [
            (
                "connection",
                property(
                    TypeSchema::reference("Connection"),
                    "Kubernetes connection",
                    "Connection details for the Kubernetes API.",
                ),
            ),
            (
                "pod",
                property(
                    TypeSchema::reference("Pod"),
                    "Pod",
                    "Pod configuration for the plugin.",
                ),
            ),
            (
                "timeouts",
                property(
                    TypeSchema::reference("Timeouts"),
                    "Timeouts",
                    "Timeouts for the Kubernetes connection.",
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
                property(TypeSchema::string(), "Server", "Kubernetes API URL.")
                    .with_default("\"kubernetes.default.svc\""),
            ),
            (
                "path",
                property(TypeSchema::string(), "API path", "Kubernetes API path.")
                    .with_default("\"/api\""),
            ),
            (
                "username",
                property(TypeSchema::string(), "Username", "Username for basic authentication.")
                    .with_conflicts("bearerToken"),
            ),
            (
                "password",
                property(TypeSchema::string(), "Password", "Password for basic authentication.")
                    .with_required_if("username")
                    .with_conflicts("bearerToken"),
            ),
            (
                "serverName",
                property(
                    TypeSchema::string(),
                    "TLS server name",
                    "Expected TLS server name to verify in the certificate.",
                ),
            ),
            (
                "cert",
                pem_property("Client certificate", "Client certificate in PEM format to authenticate against Kubernetes with.")
                    .with_required_if("key"),
            ),
            (
                "key",
                pem_property("Client key", "Client private key in PEM format to authenticate against Kubernetes with.")
                    .with_required_if("cert"),
            ),
            (
                "cacert",
                pem_property("CA certificate", "CA certificate in PEM format to verify Kubernetes server certificate against."),
            ),
            (
                "bearerToken",
                property(TypeSchema::string(), "Bearer token", "Bearer token to authenticate against the Kubernetes API with.")
                    .with_conflicts("username"),
            ),
            (
                "qps",
                property(TypeSchema::float(), "QPS", "Queries per second allowed against the API.")
                    .with_default("5.0"),
            ),
            (
                "burst",
                property(TypeSchema::int_range(Some(0), None, None), "Burst", "Burst value for query throttling.")
                    .with_default("10"),
            ),
        ],
    )
}

fn pod() -> ObjectSchema {
    ObjectSchema::new(
        "Pod",
        [
            (
                "metadata",
                property(TypeSchema::reference("ObjectMeta"), "Metadata", "Pod metadata."),
            ),
            (
                "spec",
                property(TypeSchema::reference("PodSpec"), "Specification", "Pod specification."),
            ),
        ],
    )
}

fn object_meta() -> ObjectSchema {
    ObjectSchema::new(
        "ObjectMeta",
        [
            (
                "namespace",
                property(
                    TypeSchema::string_pattern("^[a-z0-9]([-a-z0-9]*[a-z0-9])?$"),
                    "Namespace",
                    "Kubernetes namespace to deploy in.",
                )
                .with_default("\"default\""),
            ),
            (
                "generateName",
                property(
                    TypeSchema::string(),
                    "Name prefix",
                    "Name prefix to generate pod names from.",
                )
                .with_required_if_not("name")
                .with_conflicts("name"),
            ),
            (
                "name",
                property(TypeSchema::string(), "Name", "Pod name.").with_conflicts("generateName"),
            ),
            (
                "labels",
                property(label_map(), "Labels", "Kubernetes labels to apply. See https://kubernetes.io/docs/concepts/overview/working-with-objects/labels/ for details."),
            ),
            (
                "annotations",
                property(label_map(), "Annotations", "Kubernetes annotations to apply."),
            ),
        ],
    )
}

fn pod_spec() -> ObjectSchema {
    ObjectSchema::new(
        "PodSpec",
        [
            (
                "nodeSelector",
                property(
                    label_map(),
                    "Node selector",
                    "Labels the node must carry for the pod to be scheduled on it.",
                ),
            ),
            (
                "pluginContainer",
                property(
                    TypeSchema::reference("Container"),
                    "Plugin container",
                    "The container to run the plugin in.",
                )
                .required(),
            ),
            (
                "tolerations",
                property(
                    TypeSchema::list(TypeSchema::reference("Toleration")),
                    "Tolerations",
                    "Tolerations that let the pod schedule onto nodes with matching taints.",
                ),
            ),
        ],
    )
}

fn container() -> ObjectSchema {
    ObjectSchema::new(
        "Container",
        [
            (
                "name",
                property(TypeSchema::string(), "Name", "Name for the container.")
                    .with_default("\"arcaflow-plugin-container\""),
            ),
            (
                "imagePullPolicy",
                property(image_pull_policy(), "Image pull policy", "When to pull the plugin image.")
                    .with_default("\"IfNotPresent\""),
            ),
            (
                "env",
                property(
                    TypeSchema::map(TypeSchema::string_pattern("^[A-Z0-9_]+$"), TypeSchema::string()),
                    "Environment",
                    "Environment variables for the container.",
                ),
            ),
            (
                "resources",
                property(
                    ObjectSchema::new(
                        "ResourceRequirements",
                        [
                            (
                                "limits",
                                property(
                                    TypeSchema::map(TypeSchema::string(), TypeSchema::string()),
                                    "Limits",
                                    "Maximum resources the container may use.",
                                ),
                            ),
                            (
                                "requests",
                                property(
                                    TypeSchema::map(TypeSchema::string(), TypeSchema::string()),
                                    "Requests",
                                    "Resources reserved for the container.",
                                ),
                            ),
                        ],
                    )
                    .into(),
                    "Resources",
                    "Resource requests and limits for the container.",
                ),
            ),
        ],
    )
}

fn toleration() -> ObjectSchema {
    ObjectSchema::new(
        "Toleration",
        [
            (
                "key",
                property(TypeSchema::string(), "Key", "Taint key the toleration applies to."),
            ),
            (
                "operator",
                property(
                    TypeSchema::string_enum([("Exists", "Exists"), ("Equal", "Equal")]),
                    "Operator",
                    "How the key is matched against the value.",
                )
                .with_default("\"Equal\""),
            ),
            (
                "value",
                property(TypeSchema::string(), "Value", "Taint value the toleration matches."),
            ),
            (
                "effect",
                property(
                    TypeSchema::string_enum([
                        ("NoSchedule", "No schedule"),
                        ("PreferNoSchedule", "Prefer no schedule"),
                        ("NoExecute", "No execute"),
                    ]),
                    "Effect",
                    "Taint effect to match. Empty matches all effects.",
                ),
            ),
        ],
    )
}

fn timeouts() -> ObjectSchema {
    ObjectSchema::new(
        "Timeouts",
        [(
            "http",
            property(
                TypeSchema::int_range(Some(100_000_000), None, Some("nanoseconds")),
                "HTTP",
                "HTTP timeout for the Kubernetes API.",
            )
            .with_default("\"15s\""),
        )],
    )
}
