use serde_json::Value;

/// Internal marker appended to synthesized enum ids so `Pet.status` and a
/// schema literally named `PetStatus` never share a registry slot.
pub const ENUM_SUFFIX: &str = "#EnumSuffix";

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize(word: Option<&str>) -> String {
    let Some(word) = word else {
        return String::new();
    };

    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `name` when required, `name?` otherwise.
pub fn with_optional_name(name: &str, required: bool) -> String {
    if required {
        name.to_string()
    } else {
        format!("{}?", name)
    }
}

/// Splits a property key built by [`with_optional_name`] into the bare name
/// and its required flag.
///
/// The marker is not escaped: a schema property whose real name ends in `?`
/// reads back as an optional property without the trailing `?`.
pub fn split_optional_name(name: &str) -> (&str, bool) {
    match name.strip_suffix('?') {
        Some(bare) => (bare, false),
        None => (name, true),
    }
}

/// Quotes the bare identifier and keeps the optional marker outside the quotes.
pub fn quote_key(key: &str) -> String {
    let (bare, required) = split_optional_name(key);
    let quoted = format!("'{}'", bare.replace('\'', "\\'"));
    if required {
        quoted
    } else {
        format!("{}?", quoted)
    }
}

/// Last path segment of a `$ref`, e.g. `#/definitions/Pet` -> `Pet`.
pub fn get_ref_id(reference: Option<&str>) -> String {
    reference
        .and_then(|r| r.rsplit('/').next())
        .unwrap_or_default()
        .to_string()
}

/// Key path of a `$ref` inside a unified document.
///
/// The `components` level is dropped because the unified inputs hoist its
/// children: `#/components/requestBodies/PetBody` -> `["requestBodies", "PetBody"]`,
/// `#/definitions/Dog` -> `["definitions", "Dog"]`.
pub fn get_paths_from_ref(reference: &str) -> Vec<String> {
    reference
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "#" && *segment != "components")
        .map(str::to_string)
        .collect()
}

/// Registry id for an enum nested under `name` at property `prop_key`.
///
/// Without a property key the enum is the declaration body itself, so it takes
/// an `Enum` suffix to keep its display name apart from the alias:
/// `type Status = keyof typeof StatusEnum`.
pub fn enum_type_id(name: &str, prop_key: &str) -> String {
    let member = if prop_key.is_empty() {
        "Enum".to_string()
    } else {
        capitalize(Some(prop_key))
    };
    format!("{}{}{}", capitalize(Some(name)), member, ENUM_SUFFIX)
}

/// Display form of a registry id (enum marker stripped).
pub fn display_id(id: &str) -> &str {
    id.strip_suffix(ENUM_SUFFIX).unwrap_or(id)
}

/// Output file stem derived from a base path: `/api/web` -> `api.web`.
pub fn get_filename(base_path: &str) -> String {
    let segments: Vec<&str> = base_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "api.client".to_string();
    }
    segments.join(".")
}

/// Whether an `allOf` list should render as `interface X extends Ref {...}`.
///
/// True iff the list holds at least one `$ref` member and at least one
/// object-shaped member with own properties.
pub fn should_use_extends(all_of: &[Value]) -> bool {
    let has_ref = all_of.iter().any(|member| member.get("$ref").is_some());
    let has_object_with_props = all_of.iter().any(|member| {
        member.get("$ref").is_none()
            && member
                .get("properties")
                .and_then(Value::as_object)
                .is_some_and(|props| !props.is_empty())
    });

    has_ref && has_object_with_props
}
