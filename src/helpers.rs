use heck::ToTitleCase;
use minijinja::value::Value;
use minijinja::{context, escape_formatter, Environment, Error, ErrorKind, Output, State};

use crate::partials;
use crate::schema::{type_id, TYPE_ID_KEY};

/// Replacement for newlines in `nl2br`.
pub const LINE_BREAK: &str = "<br />";

/// Registers the template functions and filters on `env`.
pub fn register(env: &mut Environment<'static>) {
    env.add_function("asObject", as_object);
    env.add_function("asScope", as_scope);
    env.add_function("nl2br", nl2br);
    env.add_function("prefix", prefix);
    env.add_function("partial", partial);
    env.add_function("safeMD", safe_md);

    env.add_filter("titlecase", titlecase);
    env.add_filter("anchor", anchor);
}

fn schema_type_id(value: &Value) -> Option<String> {
    value
        .get_attr(TYPE_ID_KEY)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
}

fn invalid_input(helper: &str, value: &Value) -> Error {
    Error::new(
        ErrorKind::InvalidOperation,
        format!(
            "invalid input type for '{}': {} ({})",
            helper,
            value.kind(),
            schema_type_id(value).as_deref().unwrap_or("untagged")
        ),
    )
}

/// Narrows a value to an object schema. Properties are unwrapped to their type.
pub fn as_object(value: Value) -> Result<Value, Error> {
    match schema_type_id(&value).as_deref() {
        Some(type_id::OBJECT) => Ok(value),
        Some(type_id::PROPERTY) => {
            let inner = value.get_attr("type")?;
            if schema_type_id(&inner).as_deref() == Some(type_id::OBJECT) {
                Ok(inner)
            } else {
                Err(invalid_input("asObject", &value))
            }
        }
        _ => Err(invalid_input("asObject", &value)),
    }
}

/// Narrows a value to a scope schema.
pub fn as_scope(value: Value) -> Result<Value, Error> {
    match schema_type_id(&value).as_deref() {
        Some(type_id::SCOPE) => Ok(value),
        _ => Err(invalid_input("asScope", &value)),
    }
}

pub fn nl2br(input: &str) -> String {
    input.replace('\n', LINE_BREAK)
}

/// Inserts `prefix` after every newline, keeping the input's safe marking.
pub fn prefix(input: Value, prefix: &str) -> Result<Value, Error> {
    let Some(text) = input.as_str() else {
        return Err(invalid_input("prefix", &input));
    };
    let prefixed = text.replace('\n', &format!("\n{prefix}"));
    if input.is_safe() {
        Ok(Value::from_safe_string(prefixed))
    } else {
        Ok(Value::from(prefixed))
    }
}

/// Renders a bundled partial in the calling template's environment.
///
/// The whole argument is bound as `data`; when it is a map, its fields are
/// also top-level variables of the fragment.
pub fn partial(state: &State, name: &str, data: Value) -> Result<Value, Error> {
    let template_name = partials::template_name(name);
    let rendered = state
        .env()
        .get_template(&template_name)
        .and_then(|template| template.render(context! { data => data.clone(), ..data }))
        .map_err(|err| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("failed to render partial {name}"),
            )
            .with_source(err)
        })?;
    Ok(Value::from_safe_string(rendered))
}

pub fn safe_md(input: Value) -> Result<Value, Error> {
    if input.is_safe() {
        return Ok(input);
    }
    match input.as_str() {
        Some(text) => Ok(Value::from_safe_string(text.to_string())),
        None => Err(invalid_input("safeMD", &input)),
    }
}

pub fn titlecase(value: &str) -> String {
    value.to_title_case()
}

/// Converts heading text into the anchor Markdown renderers generate for it.
pub fn anchor(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Escapes text for embedding in Markdown that may contain inline HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Output formatter: plain strings are escaped, safe strings and everything
/// else go through the default formatter.
pub fn markdown_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), Error> {
    match value.as_str() {
        Some(text) if !value.is_safe() => {
            out.write_str(&escape_html(text))?;
            Ok(())
        }
        _ => escape_formatter(out, state, value),
    }
}
