use std::collections::BTreeMap;

use super::{
    type_id, ObjectSchema, OneOfStringSchema, PropertySchema, SchemaError, ScopeSchema,
    TypeSchema,
};

fn optional(type_: TypeSchema, name: &str, description: &str) -> PropertySchema {
    PropertySchema::new(type_).with_display(name, description)
}

fn required(type_: TypeSchema, name: &str, description: &str) -> PropertySchema {
    optional(type_, name, description).required()
}

fn min_max_object<'a>(
    id: &str,
    bound: TypeSchema,
    extra: impl IntoIterator<Item = (&'a str, PropertySchema)>,
) -> ObjectSchema {
    let mut properties = vec![
        (
            "min",
            optional(bound.clone(), "Minimum", "Minimum value or length, inclusive."),
        ),
        (
            "max",
            optional(bound, "Maximum", "Maximum value or length, inclusive."),
        ),
    ];
    properties.extend(extra);
    ObjectSchema::new(id, properties)
}

fn units_property() -> PropertySchema {
    optional(
        TypeSchema::string(),
        "Units",
        "Unit the value is expressed in, for example nanoseconds.",
    )
}

fn display_object() -> ObjectSchema {
    ObjectSchema::new(
        "Display",
        [
            (
                "name",
                optional(TypeSchema::string_min(1), "Name", "Short human-readable name."),
            ),
            (
                "description",
                optional(
                    TypeSchema::string_min(1),
                    "Description",
                    "Longer description of the item.",
                ),
            ),
            (
                "icon",
                optional(
                    TypeSchema::string_min(1),
                    "Icon",
                    "SVG icon without XML header.",
                ),
            ),
        ],
    )
}

/// Every type schema as a `type_id`-discriminated union of references.
fn type_union() -> TypeSchema {
    let variants = [
        (type_id::STRING, "String"),
        (type_id::PATTERN, "Pattern"),
        (type_id::INT, "Int"),
        (type_id::FLOAT, "Float"),
        (type_id::BOOL, "Bool"),
        (type_id::STRING_ENUM, "StringEnum"),
        (type_id::INT_ENUM, "IntEnum"),
        (type_id::LIST, "List"),
        (type_id::MAP, "Map"),
        (type_id::OBJECT, "Object"),
        (type_id::REF, "Ref"),
        (type_id::SCOPE, "Scope"),
        (type_id::ONE_OF_STRING, "OneOfString"),
        (type_id::ANY, "Any"),
    ];
    TypeSchema::OneOfString(OneOfStringSchema {
        discriminator_field_name: super::TYPE_ID_KEY.to_string(),
        types: variants
            .into_iter()
            .map(|(id, object)| (id.to_string(), TypeSchema::reference(object)))
            .collect::<BTreeMap<_, _>>(),
    })
}

fn scope_objects() -> Vec<ObjectSchema> {
    let string_list = || TypeSchema::list(TypeSchema::string());
    vec![
        ObjectSchema::new(
            "Scope",
            [
                (
                    "objects",
                    required(
                        TypeSchema::map(TypeSchema::string_min(1), TypeSchema::reference("Object")),
                        "Objects",
                        "Objects defined in this scope, keyed by their ID.",
                    ),
                ),
                (
                    "root",
                    required(
                        TypeSchema::string_min(1),
                        "Root object",
                        "ID of the object the scope starts from.",
                    ),
                ),
            ],
        ),
        ObjectSchema::new(
            "Object",
            [
                (
                    "id",
                    required(TypeSchema::string_min(1), "ID", "Unique identifier of the object."),
                ),
                (
                    "properties",
                    required(
                        TypeSchema::map(
                            TypeSchema::string_min(1),
                            TypeSchema::reference("Property"),
                        ),
                        "Properties",
                        "Properties of the object, keyed by field name.",
                    ),
                ),
            ],
        ),
        ObjectSchema::new(
            "Property",
            [
                (
                    "type",
                    required(type_union(), "Type", "Type definition of the property."),
                ),
                (
                    "display",
                    optional(
                        TypeSchema::reference("Display"),
                        "Display",
                        "Name, description and icon of the property.",
                    ),
                ),
                (
                    "required",
                    optional(
                        TypeSchema::bool(),
                        "Required",
                        "Whether the property must always be set.",
                    )
                    .with_default("false"),
                ),
                (
                    "required_if",
                    optional(
                        string_list(),
                        "Required if",
                        "The property becomes required if any of these properties is set.",
                    ),
                ),
                (
                    "required_if_not",
                    optional(
                        string_list(),
                        "Required if not",
                        "The property becomes required if none of these properties is set.",
                    ),
                ),
                (
                    "conflicts",
                    optional(
                        string_list(),
                        "Conflicts",
                        "The property cannot be set together with these properties.",
                    ),
                ),
                (
                    "default",
                    optional(
                        TypeSchema::string(),
                        "Default",
                        "JSON-encoded default value.",
                    ),
                ),
                (
                    "examples",
                    optional(
                        string_list(),
                        "Examples",
                        "JSON-encoded example values.",
                    ),
                ),
            ],
        ),
        display_object(),
        min_max_object(
            "String",
            TypeSchema::int_range(Some(0), None, None),
            [(
                "pattern",
                optional(
                    TypeSchema::pattern(),
                    "Pattern",
                    "Regular expression the value must match.",
                ),
            )],
        ),
        ObjectSchema::new("Pattern", Vec::<(String, PropertySchema)>::new()),
        min_max_object("Int", TypeSchema::int(), [("units", units_property())]),
        min_max_object("Float", TypeSchema::float(), [("units", units_property())]),
        ObjectSchema::new("Bool", Vec::<(String, PropertySchema)>::new()),
        ObjectSchema::new(
            "StringEnum",
            [(
                "values",
                required(
                    TypeSchema::map(TypeSchema::string(), TypeSchema::reference("Display")),
                    "Values",
                    "Allowed values and their display names.",
                ),
            )],
        ),
        ObjectSchema::new(
            "IntEnum",
            [(
                "values",
                required(
                    TypeSchema::map(TypeSchema::int(), TypeSchema::reference("Display")),
                    "Values",
                    "Allowed values and their display names.",
                ),
            )],
        ),
        min_max_object(
            "List",
            TypeSchema::int_range(Some(0), None, None),
            [(
                "items",
                required(type_union(), "Items", "Type of the list items."),
            )],
        ),
        min_max_object(
            "Map",
            TypeSchema::int_range(Some(0), None, None),
            [
                ("keys", required(type_union(), "Keys", "Type of the map keys.")),
                (
                    "values",
                    required(type_union(), "Values", "Type of the map values."),
                ),
            ],
        ),
        ObjectSchema::new(
            "Ref",
            [(
                "id",
                required(
                    TypeSchema::string_min(1),
                    "ID",
                    "ID of the referenced object in the current scope.",
                ),
            )],
        ),
        ObjectSchema::new(
            "OneOfString",
            [
                (
                    "discriminator_field_name",
                    required(
                        TypeSchema::string_min(1),
                        "Discriminator field",
                        "Field that selects which type applies.",
                    ),
                ),
                (
                    "types",
                    required(
                        TypeSchema::map(TypeSchema::string(), TypeSchema::reference("Ref")),
                        "Types",
                        "Object types keyed by discriminator value.",
                    ),
                ),
            ],
        ),
        ObjectSchema::new("Any", Vec::<(String, PropertySchema)>::new()),
    ]
}

/// Describes the scope schema format itself.
pub fn describe_scope() -> Result<ScopeSchema, SchemaError> {
    ScopeSchema::new("Scope", scope_objects())
}

/// Describes the full schema format: plugin steps, their input scopes and
/// outputs, on top of everything [`describe_scope`] covers.
pub fn describe_schema() -> Result<ScopeSchema, SchemaError> {
    let mut objects = scope_objects();
    objects.push(ObjectSchema::new(
        "Schema",
        [(
            "steps",
            required(
                TypeSchema::map(TypeSchema::string_min(1), TypeSchema::reference("Step")),
                "Steps",
                "Steps provided by the plugin, keyed by step ID.",
            ),
        )],
    ));
    objects.push(ObjectSchema::new(
        "Step",
        [
            (
                "id",
                required(TypeSchema::string_min(1), "ID", "Machine identifier of the step."),
            ),
            (
                "display",
                optional(
                    TypeSchema::reference("Display"),
                    "Display",
                    "Name, description and icon of the step.",
                ),
            ),
            (
                "input",
                required(
                    TypeSchema::reference("Scope"),
                    "Input",
                    "Input data schema of the step.",
                ),
            ),
            (
                "outputs",
                required(
                    TypeSchema::map(
                        TypeSchema::string_min(1),
                        TypeSchema::reference("StepOutput"),
                    ),
                    "Outputs",
                    "Possible outputs of the step, keyed by output ID.",
                ),
            ),
        ],
    ));
    objects.push(ObjectSchema::new(
        "StepOutput",
        [
            (
                "schema",
                required(
                    TypeSchema::reference("Scope"),
                    "Schema",
                    "Data schema of the output.",
                ),
            ),
            (
                "display",
                optional(
                    TypeSchema::reference("Display"),
                    "Display",
                    "Name, description and icon of the output.",
                ),
            ),
            (
                "error",
                optional(
                    TypeSchema::bool(),
                    "Error",
                    "Whether the output denotes a failure.",
                )
                .with_default("false"),
            ),
        ],
    ));
    ScopeSchema::new("Schema", objects)
}
