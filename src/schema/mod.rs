//! Configuration schema descriptions.
//!
//! Every schema value serializes with a `type_id` field, which is what the
//! template helpers use to narrow a value to the shape they expect.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

mod describe;

pub use describe::{describe_schema, describe_scope};

/// The field carrying the schema discriminator in serialized values.
pub const TYPE_ID_KEY: &str = "type_id";

/// Discriminator values, matching the `rename` of each schema struct.
pub mod type_id {
    pub const STRING: &str = "string";
    pub const PATTERN: &str = "pattern";
    pub const INT: &str = "integer";
    pub const FLOAT: &str = "float";
    pub const BOOL: &str = "bool";
    pub const STRING_ENUM: &str = "enum_string";
    pub const INT_ENUM: &str = "enum_integer";
    pub const LIST: &str = "list";
    pub const MAP: &str = "map";
    pub const OBJECT: &str = "object";
    pub const REF: &str = "ref";
    pub const SCOPE: &str = "scope";
    pub const ONE_OF_STRING: &str = "one_of_string";
    pub const ANY: &str = "any";
    pub const PROPERTY: &str = "property";
}

#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("root object {root:?} is not defined in the scope")]
    MissingRoot { root: String },
    #[error("property {property:?} of object {object:?} references undefined object {id:?}")]
    UnresolvedRef {
        object: String,
        property: String,
        id: String,
    },
}

/// Human-readable metadata attached to properties and enum values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Display {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl Display {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            icon: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "string")]
pub struct StringSchema {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "pattern")]
pub struct PatternSchema {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "integer")]
pub struct IntSchema {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "float")]
pub struct FloatSchema {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "bool")]
pub struct BoolSchema {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "enum_string")]
pub struct StringEnumSchema {
    pub values: BTreeMap<String, Display>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "enum_integer")]
pub struct IntEnumSchema {
    pub values: BTreeMap<i64, Display>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "list")]
pub struct ListSchema {
    pub items: Box<TypeSchema>,
    pub min: Option<u64>,
    pub max: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "map")]
pub struct MapSchema {
    pub keys: Box<TypeSchema>,
    pub values: Box<TypeSchema>,
    pub min: Option<u64>,
    pub max: Option<u64>,
}

/// A single structured record with named properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "object")]
pub struct ObjectSchema {
    pub id: String,
    pub properties: BTreeMap<String, PropertySchema>,
}

impl ObjectSchema {
    pub fn new<I, S>(id: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = (S, PropertySchema)>,
        S: Into<String>,
    {
        Self {
            id: id.to_string(),
            properties: properties
                .into_iter()
                .map(|(name, property)| (name.into(), property))
                .collect(),
        }
    }
}

/// A reference to an object defined in the enclosing scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "ref")]
pub struct RefSchema {
    pub id: String,
}

/// A named collection of object schemas with one designated root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "scope")]
pub struct ScopeSchema {
    pub objects: BTreeMap<String, ObjectSchema>,
    pub root: String,
}

impl ScopeSchema {
    /// Builds a scope, checking that the root and every reference resolve.
    pub fn new<I>(root: &str, objects: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = ObjectSchema>,
    {
        let objects: BTreeMap<String, ObjectSchema> = objects
            .into_iter()
            .map(|object| (object.id.clone(), object))
            .collect();
        if !objects.contains_key(root) {
            return Err(SchemaError::MissingRoot {
                root: root.to_string(),
            });
        }
        let scope = Self {
            objects,
            root: root.to_string(),
        };
        scope.check_refs()?;
        Ok(scope)
    }

    pub fn root_object(&self) -> Option<&ObjectSchema> {
        self.objects.get(&self.root)
    }

    fn check_refs(&self) -> Result<(), SchemaError> {
        let known: BTreeSet<&str> = self.objects.keys().map(String::as_str).collect();
        for object in self.objects.values() {
            check_object_refs(object, &known)?;
        }
        Ok(())
    }
}

fn check_object_refs(object: &ObjectSchema, known: &BTreeSet<&str>) -> Result<(), SchemaError> {
    for (name, property) in &object.properties {
        let mut ids = Vec::new();
        property.type_.collect_refs(&mut ids);
        if let Some(id) = ids.into_iter().find(|id| !known.contains(id)) {
            return Err(SchemaError::UnresolvedRef {
                object: object.id.clone(),
                property: name.clone(),
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// A value that is one of several object types, selected by a string field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "one_of_string")]
pub struct OneOfStringSchema {
    pub discriminator_field_name: String,
    pub types: BTreeMap<String, TypeSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "any")]
pub struct AnySchema {}

/// The tagged union of all type schemas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypeSchema {
    String(StringSchema),
    Pattern(PatternSchema),
    Int(IntSchema),
    Float(FloatSchema),
    Bool(BoolSchema),
    StringEnum(StringEnumSchema),
    IntEnum(IntEnumSchema),
    List(ListSchema),
    Map(MapSchema),
    Object(ObjectSchema),
    Ref(RefSchema),
    Scope(ScopeSchema),
    OneOfString(OneOfStringSchema),
    Any(AnySchema),
}

impl TypeSchema {
    pub fn string() -> Self {
        Self::String(StringSchema::default())
    }

    pub fn string_min(min: u64) -> Self {
        Self::String(StringSchema {
            min: Some(min),
            ..StringSchema::default()
        })
    }

    pub fn string_pattern(pattern: &str) -> Self {
        Self::String(StringSchema {
            pattern: Some(pattern.to_string()),
            ..StringSchema::default()
        })
    }

    pub fn pattern() -> Self {
        Self::Pattern(PatternSchema {})
    }

    pub fn int() -> Self {
        Self::Int(IntSchema::default())
    }

    pub fn int_range(min: Option<i64>, max: Option<i64>, units: Option<&str>) -> Self {
        Self::Int(IntSchema {
            min,
            max,
            units: units.map(str::to_string),
        })
    }

    pub fn float() -> Self {
        Self::Float(FloatSchema::default())
    }

    pub fn bool() -> Self {
        Self::Bool(BoolSchema {})
    }

    pub fn string_enum<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::StringEnum(StringEnumSchema {
            values: values
                .into_iter()
                .map(|(value, name)| {
                    (
                        value.to_string(),
                        Display {
                            name: Some(name.to_string()),
                            ..Display::default()
                        },
                    )
                })
                .collect(),
        })
    }

    pub fn list(items: TypeSchema) -> Self {
        Self::List(ListSchema {
            items: Box::new(items),
            min: None,
            max: None,
        })
    }

    pub fn map(keys: TypeSchema, values: TypeSchema) -> Self {
        Self::Map(MapSchema {
            keys: Box::new(keys),
            values: Box::new(values),
            min: None,
            max: None,
        })
    }

    pub fn reference(id: &str) -> Self {
        Self::Ref(RefSchema { id: id.to_string() })
    }

    pub fn any() -> Self {
        Self::Any(AnySchema {})
    }

    /// Returns the discriminator this value serializes with.
    pub fn type_id(&self) -> &'static str {
        match self {
            Self::String(_) => type_id::STRING,
            Self::Pattern(_) => type_id::PATTERN,
            Self::Int(_) => type_id::INT,
            Self::Float(_) => type_id::FLOAT,
            Self::Bool(_) => type_id::BOOL,
            Self::StringEnum(_) => type_id::STRING_ENUM,
            Self::IntEnum(_) => type_id::INT_ENUM,
            Self::List(_) => type_id::LIST,
            Self::Map(_) => type_id::MAP,
            Self::Object(_) => type_id::OBJECT,
            Self::Ref(_) => type_id::REF,
            Self::Scope(_) => type_id::SCOPE,
            Self::OneOfString(_) => type_id::ONE_OF_STRING,
            Self::Any(_) => type_id::ANY,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_scope(&self) -> Option<&ScopeSchema> {
        match self {
            Self::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    // Nested scopes validate on construction.
    fn collect_refs<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Self::Ref(reference) => ids.push(&reference.id),
            Self::Object(object) => {
                for property in object.properties.values() {
                    property.type_.collect_refs(ids);
                }
            }
            Self::List(list) => list.items.collect_refs(ids),
            Self::Map(map) => {
                map.keys.collect_refs(ids);
                map.values.collect_refs(ids);
            }
            Self::OneOfString(one_of) => {
                for schema in one_of.types.values() {
                    schema.collect_refs(ids);
                }
            }
            _ => {}
        }
    }
}

impl From<ObjectSchema> for TypeSchema {
    fn from(object: ObjectSchema) -> Self {
        Self::Object(object)
    }
}

impl From<ScopeSchema> for TypeSchema {
    fn from(scope: ScopeSchema) -> Self {
        Self::Scope(scope)
    }
}

/// A named field of an object: its type plus documentation and constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type_id", rename = "property")]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub type_: TypeSchema,
    pub display: Display,
    pub required: bool,
    pub required_if: Vec<String>,
    pub required_if_not: Vec<String>,
    pub conflicts: Vec<String>,
    /// JSON-encoded default value.
    pub default: Option<String>,
    /// JSON-encoded example values.
    pub examples: Vec<String>,
}

impl PropertySchema {
    pub fn new(type_: TypeSchema) -> Self {
        Self {
            type_,
            display: Display::default(),
            required: false,
            required_if: Vec::new(),
            required_if_not: Vec::new(),
            conflicts: Vec::new(),
            default: None,
            examples: Vec::new(),
        }
    }

    pub fn with_display(mut self, name: &str, description: &str) -> Self {
        self.display = Display::new(name, description);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_required_if(mut self, property: &str) -> Self {
        self.required_if.push(property.to_string());
        self
    }

    pub fn with_required_if_not(mut self, property: &str) -> Self {
        self.required_if_not.push(property.to_string());
        self
    }

    pub fn with_conflicts(mut self, property: &str) -> Self {
        self.conflicts.push(property.to_string());
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.examples.push(example.to_string());
        self
    }

    /// Narrows the property's type to an inline object schema.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        self.type_.as_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn connection() -> ObjectSchema {
        ObjectSchema::new(
            "Connection",
            [(
                "host",
                PropertySchema::new(TypeSchema::string()).with_display("Host", "Server address"),
            )],
        )
    }

    #[test]
    fn test_type_id_matches_serialized_tag() {
        let schemas = [
            TypeSchema::string(),
            TypeSchema::pattern(),
            TypeSchema::int(),
            TypeSchema::float(),
            TypeSchema::bool(),
            TypeSchema::string_enum([("a", "A")]),
            TypeSchema::IntEnum(IntEnumSchema::default()),
            TypeSchema::list(TypeSchema::string()),
            TypeSchema::map(TypeSchema::string(), TypeSchema::int()),
            TypeSchema::Object(connection()),
            TypeSchema::reference("Connection"),
            TypeSchema::any(),
        ];
        for schema in schemas {
            let value = serde_json::to_value(&schema).unwrap();
            assert_eq!(value[TYPE_ID_KEY], json!(schema.type_id()));
        }
    }

    #[test]
    fn test_property_serialization() {
        let property = PropertySchema::new(TypeSchema::Object(connection()))
            .required()
            .with_default("\"localhost\"");
        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(value["type_id"], json!("property"));
        assert_eq!(value["type"]["type_id"], json!("object"));
        assert_eq!(value["type"]["id"], json!("Connection"));
        assert_eq!(value["required"], json!(true));
        assert_eq!(value["default"], json!("\"localhost\""));
    }

    #[test]
    fn test_scope_serialization() {
        let scope = ScopeSchema::new("Connection", [connection()]).unwrap();
        let value = serde_json::to_value(&scope).unwrap();
        assert_eq!(value["type_id"], json!("scope"));
        assert_eq!(value["root"], json!("Connection"));
        assert_eq!(
            value["objects"]["Connection"]["properties"]["host"]["display"]["name"],
            json!("Host")
        );
    }

    #[test]
    fn test_scope_missing_root() {
        let result = ScopeSchema::new("Config", [connection()]);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::MissingRoot {
                root: "Config".to_string()
            }
        );
    }

    #[test]
    fn test_scope_unresolved_ref() {
        let config = ObjectSchema::new(
            "Config",
            [(
                "connections",
                PropertySchema::new(TypeSchema::list(TypeSchema::reference("Missing"))),
            )],
        );
        let result = ScopeSchema::new("Config", [config, connection()]);
        assert!(matches!(
            result,
            Err(SchemaError::UnresolvedRef { ref id, .. }) if id == "Missing"
        ));
    }

    #[test]
    fn test_scope_unresolved_ref_in_inline_object() {
        let inline = ObjectSchema::new(
            "Inline",
            [("target", PropertySchema::new(TypeSchema::reference("Missing")))],
        );
        let config = ObjectSchema::new(
            "Config",
            [("inline", PropertySchema::new(TypeSchema::Object(inline)))],
        );
        assert!(ScopeSchema::new("Config", [config]).is_err());
    }

    #[test]
    fn test_scope_unresolved_ref_in_list_inline_object() {
        let inline = ObjectSchema::new(
            "Inline",
            [("target", PropertySchema::new(TypeSchema::reference("Missing")))],
        );
        let config = ObjectSchema::new(
            "Config",
            [(
                "items",
                PropertySchema::new(TypeSchema::list(TypeSchema::Object(inline))),
            )],
        );
        assert_eq!(
            ScopeSchema::new("Config", [config]).unwrap_err(),
            SchemaError::UnresolvedRef {
                object: "Config".to_string(),
                property: "items".to_string(),
                id: "Missing".to_string(),
            }
        );
    }

    #[test]
    fn test_scope_unresolved_ref_in_map_inline_object() {
        let inline = ObjectSchema::new(
            "Inline",
            [("target", PropertySchema::new(TypeSchema::reference("Missing")))],
        );
        let config = ObjectSchema::new(
            "Config",
            [(
                "entries",
                PropertySchema::new(TypeSchema::map(
                    TypeSchema::string(),
                    TypeSchema::Object(inline),
                )),
            )],
        );
        assert!(ScopeSchema::new("Config", [config]).is_err());
    }

    #[test]
    fn test_scope_resolved_ref_in_list_inline_object() {
        let inline = ObjectSchema::new(
            "Inline",
            [("target", PropertySchema::new(TypeSchema::reference("Connection")))],
        );
        let config = ObjectSchema::new(
            "Config",
            [(
                "items",
                PropertySchema::new(TypeSchema::list(TypeSchema::Object(inline))),
            )],
        );
        assert!(ScopeSchema::new("Config", [config, connection()]).is_ok());
    }

    #[test]
    fn test_narrowing() {
        let property = PropertySchema::new(TypeSchema::Object(connection()));
        assert_eq!(property.as_object().map(|o| o.id.as_str()), Some("Connection"));
        assert!(PropertySchema::new(TypeSchema::string()).as_object().is_none());

        let scope = ScopeSchema::new("Connection", [connection()]).unwrap();
        let scope = TypeSchema::from(scope);
        assert!(scope.as_scope().is_some());
        assert!(scope.as_object().is_none());
    }
}
