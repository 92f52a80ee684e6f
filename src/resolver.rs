use crate::naming::{
    capitalize, enum_type_id, get_ref_id, should_use_extends, split_optional_name,
    with_optional_name,
};
use crate::registry::{DeclKind, Registry};
use crate::types::{EnumType, ObjectType, Properties, Reference, TypeExpr};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Naming context of the schema being resolved: the enclosing declaration
/// and the property key it sits under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub name: String,
    pub prop_key: String,
}

impl Context {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            prop_key: String::new(),
        }
    }

    fn with_prop_key(&self, prop_key: &str) -> Self {
        Self {
            name: self.name.clone(),
            prop_key: prop_key.to_string(),
        }
    }
}

/// Walks raw schema nodes, producing type expressions and filling the
/// registry with named declarations.
pub struct Resolver<'r> {
    registry: &'r mut Registry,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r mut Registry) -> Self {
        Self { registry }
    }

    /// Registers every top-level schema under its capitalized key.
    pub fn register_all(&mut self, schemas: &IndexMap<String, Value>) {
        for (key, schema) in schemas {
            self.register_schema(key, schema);
        }
    }

    /// Resolves one named top-level schema and registers its declaration.
    pub fn register_schema(&mut self, key: &str, schema: &Value) {
        let name = capitalize(Some(key));
        let body = self.convert(schema, &name);
        self.registry
            .register_declaration(&name, declaration_kind(schema), body);
    }

    /// Resolves `schema` as the body of a declaration called `name`.
    pub fn convert(&mut self, schema: &Value, name: &str) -> TypeExpr {
        self.resolve(schema, &Context::named(name))
    }

    /// Recursive entry point. Never fails: malformed input degrades to an
    /// untyped placeholder.
    pub fn resolve(&mut self, schema: &Value, ctx: &Context) -> TypeExpr {
        let Some(obj) = schema.as_object() else {
            return TypeExpr::untyped();
        };

        if let Some(members) = obj
            .get("oneOf")
            .or_else(|| obj.get("anyOf"))
            .and_then(Value::as_array)
        {
            return TypeExpr::Union(members.iter().map(|m| self.resolve(m, ctx)).collect());
        }

        if let Some(reference) = obj.get("$ref") {
            return self.resolve_ref(reference.as_str());
        }

        if let Some(items) = obj.get("items") {
            return self.resolve_items(obj, items, ctx);
        }

        if let Some(values) = obj.get("enum").and_then(Value::as_array) {
            return self.resolve_enum(values, ctx);
        }

        if is_object_shaped(obj) {
            return self.resolve_object(obj, ctx);
        }

        match obj.get("type") {
            Some(Value::String(type_name)) => primitive(type_name),
            Some(Value::Array(type_names)) => TypeExpr::Union(
                type_names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(primitive)
                    .collect(),
            ),
            _ => TypeExpr::untyped(),
        }
    }

    fn resolve_ref(&mut self, reference: Option<&str>) -> TypeExpr {
        let id = capitalize(Some(&get_ref_id(reference)));
        if id.is_empty() {
            return TypeExpr::untyped();
        }
        TypeExpr::Reference(self.registry.set_ref(&id))
    }

    fn resolve_items(&mut self, obj: &Map<String, Value>, items: &Value, ctx: &Context) -> TypeExpr {
        if let Some(tuple) = items.as_array() {
            return TypeExpr::tuple(tuple.iter().map(|item| self.resolve(item, ctx)).collect());
        }

        let element = self.resolve(items, ctx);
        if type_is(obj, "array") {
            TypeExpr::array(element)
        } else {
            element
        }
    }

    fn resolve_enum(&mut self, values: &[Value], ctx: &Context) -> TypeExpr {
        let id = enum_type_id(&ctx.name, &ctx.prop_key);
        let body = EnumType {
            id: id.clone(),
            values: Some(values.to_vec()),
        };
        let numeric = body.has_numeric_values();

        debug!(id = %id, numeric, "synthesized enum");
        self.registry
            .register_declaration(&id, DeclKind::Enum, TypeExpr::Enum(body));

        if numeric {
            return TypeExpr::Reference(self.registry.set_ref(&id));
        }

        TypeExpr::Enum(EnumType { id, values: None })
    }

    fn resolve_object(&mut self, obj: &Map<String, Value>, ctx: &Context) -> TypeExpr {
        let own_fields = self.resolve_properties(obj, ctx);

        if let Some(all_of) = obj.get("allOf").and_then(Value::as_array) {
            return self.resolve_all_of(all_of, own_fields, ctx);
        }

        match own_fields {
            Some(fields) => TypeExpr::Object(ObjectType::fields(fields)),
            None => TypeExpr::Object(ObjectType::free_form()),
        }
    }

    fn resolve_properties(
        &mut self,
        obj: &Map<String, Value>,
        ctx: &Context,
    ) -> Option<IndexMap<String, TypeExpr>> {
        let properties = obj.get("properties")?.as_object()?;
        let required: Vec<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut fields = IndexMap::new();
        for (key, property) in properties {
            let ty = self.resolve(property, &ctx.with_prop_key(key));
            fields.insert(with_optional_name(key, required.contains(&key.as_str())), ty);
        }
        Some(fields)
    }

    fn resolve_all_of(
        &mut self,
        all_of: &[Value],
        own_fields: Option<IndexMap<String, TypeExpr>>,
        ctx: &Context,
    ) -> TypeExpr {
        let has_own_fields = own_fields.as_ref().is_some_and(|f| !f.is_empty());
        let mut fields = own_fields.unwrap_or_default();
        let mut extends: Vec<Reference> = Vec::new();
        let mut others = Vec::new();

        for member in all_of {
            match self.resolve(member, ctx) {
                TypeExpr::Reference(reference) => extends.push(reference),
                TypeExpr::Object(object) => {
                    extends.extend(object.extends);
                    if let Properties::Fields(member_fields) = object.properties {
                        merge_fields(&mut fields, member_fields);
                    }
                }
                other => others.push(other),
            }
        }

        let use_extends =
            should_use_extends(all_of) || (has_own_fields && !extends.is_empty());
        if use_extends && others.is_empty() {
            return TypeExpr::Object(ObjectType {
                properties: Properties::Fields(fields),
                extends,
                use_extends_syntax: true,
            });
        }

        // An interface cannot extend a union or a primitive, so any such
        // member turns the whole allOf into an intersection.
        let mut parts: Vec<TypeExpr> = extends.into_iter().map(TypeExpr::Reference).collect();
        if !fields.is_empty() {
            parts.push(TypeExpr::Object(ObjectType::fields(fields)));
        }
        parts.extend(others);

        match parts.len() {
            0 => TypeExpr::Object(ObjectType::fields(IndexMap::new())),
            1 => parts.remove(0),
            _ => {
                debug!(name = %ctx.name, members = parts.len(), "allOf resolved as intersection");
                TypeExpr::Intersection(parts)
            }
        }
    }
}

/// Declaration kind for a named top-level schema.
pub fn declaration_kind(schema: &Value) -> DeclKind {
    let Some(obj) = schema.as_object() else {
        return DeclKind::Type;
    };

    let extends_form = obj
        .get("allOf")
        .and_then(Value::as_array)
        .is_some_and(|all_of| should_use_extends(all_of));

    if type_is(obj, "object") || obj.contains_key("properties") || extends_form {
        DeclKind::Interface
    } else {
        DeclKind::Type
    }
}

fn is_object_shaped(obj: &Map<String, Value>) -> bool {
    type_is(obj, "object") || obj.contains_key("properties") || obj.contains_key("allOf")
}

fn type_is(obj: &Map<String, Value>, expected: &str) -> bool {
    obj.get("type").and_then(Value::as_str) == Some(expected)
}

/// Inserts `fields` into `into`, keyed by bare property name. A later entry
/// replaces an earlier one even when their optional markers differ.
fn merge_fields(into: &mut IndexMap<String, TypeExpr>, fields: IndexMap<String, TypeExpr>) {
    for (key, ty) in fields {
        let (bare, _) = split_optional_name(&key);
        into.retain(|existing, _| split_optional_name(existing).0 != bare);
        into.insert(key, ty);
    }
}

fn primitive(type_name: &str) -> TypeExpr {
    match type_name {
        "integer" => TypeExpr::number(),
        "file" => TypeExpr::file(),
        "array" => TypeExpr::array(TypeExpr::untyped()),
        "object" => TypeExpr::Object(ObjectType::free_form()),
        other => TypeExpr::primitive(other),
    }
}
