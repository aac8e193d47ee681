use log::error;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::DocsError;
use crate::{helpers, partials};

/// TemplateEngine wraps minijinja::Environment with the documentation helpers
/// and bundled partials registered.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Creates a fresh environment: strict undefined handling, escaping
    /// formatter, helper functions and bundled partials.
    pub fn new() -> Result<Self, DocsError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_formatter(helpers::markdown_formatter);

        helpers::register(&mut env);
        partials::register(&mut env)?;

        Ok(Self { env })
    }

    /// Parses `source` under `name` and renders it with `data`.
    pub fn render<T: Serialize>(
        &mut self,
        name: &str,
        source: String,
        data: &T,
    ) -> Result<String, DocsError> {
        self.env
            .add_template_owned(name.to_string(), source)
            .map_err(|source| DocsError::Parse {
                name: name.to_string(),
                source,
            })?;

        let template = self.env.get_template(name).map_err(|source| DocsError::Parse {
            name: name.to_string(),
            source,
        })?;

        template.render(data).map_err(|e| {
            if let Some(line) = e.line() {
                let error_line = template.source().lines().nth(line - 1).unwrap_or("");
                error!("{}:{}: {}", name, line, error_line.trim());
            }
            DocsError::Render {
                name: name.to_string(),
                source: e,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectSchema, PropertySchema, ScopeSchema, TypeSchema};
    use std::collections::HashMap;

    fn render<T: Serialize>(source: &str, data: &T) -> Result<String, DocsError> {
        let mut engine = TemplateEngine::new().unwrap();
        engine.render("test.md.tpl", source.to_string(), data)
    }

    fn scope() -> ScopeSchema {
        let timeouts = ObjectSchema::new(
            "Timeouts",
            [(
                "http",
                PropertySchema::new(TypeSchema::int()).with_display("HTTP", "HTTP timeout"),
            )],
        );
        let config = ObjectSchema::new(
            "Config",
            [
                (
                    "connection",
                    PropertySchema::new(TypeSchema::reference("Connection"))
                        .with_display("Connection", "How to connect.\nSecond line.")
                        .required(),
                ),
                (
                    "timeouts",
                    PropertySchema::new(TypeSchema::Object(timeouts)),
                ),
            ],
        );
        let connection = ObjectSchema::new(
            "Connection",
            [(
                "host",
                PropertySchema::new(TypeSchema::string_pattern("^a|b$"))
                    .with_display("Host", "Host name")
                    .with_default("\"localhost\"")
                    .with_example("\"example.com\""),
            )],
        );
        ScopeSchema::new("Config", [config, connection]).unwrap()
    }

    #[test]
    fn test_render_string() {
        let context = HashMap::from([("name", "World")]);
        let result = render("Hello, {{ name }}!", &context).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_render_undefined_variable() {
        let context: HashMap<String, String> = HashMap::new();
        let result = render("Hello, {{ name }}!", &context);
        assert!(matches!(result, Err(DocsError::Render { .. })));
    }

    #[test]
    fn test_render_syntax_error() {
        let context: HashMap<String, String> = HashMap::new();
        let result = render("{% if %}", &context);
        assert!(matches!(result, Err(DocsError::Parse { .. })));
    }

    #[test]
    fn test_plain_strings_are_escaped() {
        let context = HashMap::from([("text", "a < b & \"c\"")]);
        let result = render("{{ text }}|{{ safeMD(text) }}", &context).unwrap();
        assert_eq!(result, "a &lt; b &amp; &#34;c&#34;|a < b & \"c\"");
    }

    #[test]
    fn test_nl2br_output_needs_safe_md() {
        let context = HashMap::from([("text", "a\nb")]);
        let result = render("{{ nl2br(text) }} {{ safeMD(nl2br(text)) }}", &context).unwrap();
        assert_eq!(result, "a&lt;br /&gt;b a<br />b");
    }

    #[test]
    fn test_prefix_in_template() {
        let context = HashMap::from([("text", "one\ntwo")]);
        let result = render("> {{ prefix(text, \"> \") }}", &context).unwrap();
        assert_eq!(result, "> one\n> two");
    }

    #[test]
    fn test_partial_is_not_escaped_twice() {
        let data = HashMap::from([("scope", scope())]);
        let result = render(
            "{{ partial(\"type_name\", scope.objects.Connection.properties.host.type) }}",
            &data,
        )
        .unwrap();
        assert_eq!(result, "string matching `^a\\|b$`");
    }

    #[test]
    fn test_partial_recursion() {
        let data = HashMap::from([("scope", scope())]);
        let result = render("{{ partial(\"scope\", scope) }}", &data).unwrap();
        assert!(result.starts_with("### Config"));
        assert!(result.contains("### Connection"));
        assert!(result.contains("| `connection` | [Connection](#connection) | yes | How to connect.<br />Second line. |"));
        // Inline objects are rendered through asObject.
        assert!(result.contains("### Timeouts"));
        assert!(result.contains("defaults to `\"localhost\"`"));
        assert!(result.contains("\"example.com\""));
    }

    #[test]
    fn test_partial_sees_non_map_data() {
        let mut engine = TemplateEngine::new().unwrap();
        engine
            .env
            .add_template("partials/items", "{% for item in data %}[{{ item }}]{% endfor %}")
            .unwrap();
        engine
            .env
            .add_template("partials/quote", "> {{ data }}")
            .unwrap();

        let context = HashMap::from([("xs", vec!["a", "b"])]);
        let result = engine.render("list.md.tpl", "{{ partial(\"items\", xs) }}".to_string(), &context);
        assert_eq!(result.unwrap(), "[a][b]");

        let context = HashMap::from([("text", "a & b")]);
        let result = engine.render("string.md.tpl", "{{ partial(\"quote\", text) }}".to_string(), &context);
        assert_eq!(result.unwrap(), "> a &amp; b");
    }

    #[test]
    fn test_partial_map_fields_are_top_level() {
        let data = HashMap::from([("scope", scope())]);
        let result = render("{{ partial(\"type_name\", scope.objects.Config.properties.connection.type) }}", &data);
        assert_eq!(result.unwrap(), "[Connection](#connection)");
    }

    #[test]
    fn test_property_notes() {
        let property = PropertySchema::new(TypeSchema::string())
            .with_display("Name prefix", "")
            .with_required_if("namespace")
            .with_required_if_not("name")
            .with_conflicts("name");
        let data = HashMap::from([("property", property)]);
        let result = render(
            "{{ partial(\"property\", {\"name\": \"generateName\", \"property\": property}) }}",
            &data,
        )
        .unwrap();
        assert_eq!(
            result,
            "- **Name prefix** (`generateName`): Required if namespace is set. Required if name is not set. Cannot be combined with name."
        );
    }

    #[test]
    fn test_missing_partial() {
        let context: HashMap<String, String> = HashMap::new();
        let result = render("{{ partial(\"missing\", 1) }}", &context);
        let Err(DocsError::Render { source, .. }) = result else {
            panic!("expected a render error");
        };
        let message = source.to_string();
        assert!(message.contains("failed to render partial missing"), "{message}");
    }

    #[test]
    fn test_as_object_in_template() {
        let data = HashMap::from([("scope", scope())]);
        let result = render(
            "{{ asObject(scope.objects.Config.properties.timeouts).id }}",
            &data,
        )
        .unwrap();
        assert_eq!(result, "Timeouts");

        let result = render(
            "{{ asObject(scope.objects.Config.properties.connection).id }}",
            &data,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_as_scope_in_template() {
        let data = HashMap::from([("scope", scope())]);
        assert_eq!(render("{{ asScope(scope).root }}", &data).unwrap(), "Config");
        assert!(render("{{ asScope(scope.objects.Config) }}", &data).is_err());
    }

    #[test]
    fn test_filters() {
        let context = HashMap::from([("name", "image_pull_policy")]);
        let result = render("{{ name|titlecase }} #{{ \"Pod Spec\"|anchor }}", &context).unwrap();
        assert_eq!(result, "Image Pull Policy #pod-spec");
    }
}
