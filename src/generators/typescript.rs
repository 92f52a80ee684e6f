use super::{GeneratedOutput, Generator};
use crate::config::Config;
use crate::naming::{get_filename, quote_key};
use crate::parsers::UnifiedInputs;
use crate::registry::{DeclKind, Declaration, Registry};
use crate::types::{ArrayType, EnumType, ObjectType, Properties, TypeExpr};
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::collections::HashMap;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "declarations.ts.tera";
const BUILTIN_TEMPLATE: &str = include_str!("../../templates/typescript/declarations.ts.tera");

pub struct TypeScriptGenerator;

impl Generator for TypeScriptGenerator {
    fn name(&self) -> &str {
        "typescript"
    }

    fn file_extension(&self) -> &str {
        "ts"
    }

    fn generate(
        &self,
        inputs: &UnifiedInputs,
        registry: &Registry,
        config: &Config,
    ) -> Result<GeneratedOutput> {
        let tera = load_templates(config)?;
        let declarations = render_declarations(registry);

        let mut context = Context::new();
        context.insert("header", &config.file_header);
        context.insert("data_type", &inputs.data_type);
        context.insert("base_path", &inputs.base_path);
        context.insert("declarations", &declarations);

        let content = tera.render(TEMPLATE_NAME, &context)?;

        let mut metadata = HashMap::new();
        metadata.insert("declarations".to_string(), declarations.len().to_string());
        metadata.insert("collisions".to_string(), registry.collisions().to_string());

        Ok(GeneratedOutput {
            filename: format!("{}.{}", get_filename(&inputs.base_path), self.file_extension()),
            content,
            metadata,
        })
    }

    fn validate_config(&self, config: &Config) -> Result<()> {
        if let Some(dir) = &config.template {
            if !dir.join(TEMPLATE_NAME).exists() {
                anyhow::bail!("Template {} not found in {:?}", TEMPLATE_NAME, dir);
            }
        }
        Ok(())
    }
}

fn load_templates(config: &Config) -> Result<Tera> {
    match &config.template {
        Some(dir) => {
            let dir = dir
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Template path is not valid UTF-8: {:?}", dir))?;
            Tera::new(&format!("{}/**/*.tera", dir))
                .with_context(|| format!("Failed to load templates from {}", dir))
        }
        None => {
            let mut tera = Tera::default();
            tera.add_raw_template(TEMPLATE_NAME, BUILTIN_TEMPLATE)?;
            Ok(tera)
        }
    }
}

/// Every declaration rendered as TypeScript source, ordered by id.
pub fn render_declarations(registry: &Registry) -> Vec<String> {
    let mut decls: Vec<&Declaration> = registry.get_declarations().values().collect();
    decls.sort_by(|a, b| a.id.cmp(&b.id));
    decls
        .into_iter()
        .map(|decl| render_declaration(decl, registry))
        .collect()
}

pub fn render_declaration(decl: &Declaration, registry: &Registry) -> String {
    match (decl.kind, &decl.body) {
        (
            DeclKind::Enum,
            TypeExpr::Enum(EnumType {
                values: Some(values),
                ..
            }),
        ) => render_enum(&decl.name, values),
        (DeclKind::Interface, TypeExpr::Object(object)) => {
            let extends = if object.extends.is_empty() {
                String::new()
            } else {
                let names: Vec<String> = object
                    .extends
                    .iter()
                    .map(|r| registry.display_name(&r.target_id))
                    .collect();
                format!(" extends {}", names.join(", "))
            };
            format!(
                "export interface {}{} {}",
                decl.name,
                extends,
                render_body(object, registry, 0)
            )
        }
        (DeclKind::Interface, TypeExpr::Reference(reference)) => format!(
            "export interface {} extends {} {{}}",
            decl.name,
            registry.display_name(&reference.target_id)
        ),
        _ => format!(
            "export type {} = {};",
            decl.name,
            render_type(&decl.body, registry)
        ),
    }
}

pub fn render_type(ty: &TypeExpr, registry: &Registry) -> String {
    render_at(ty, registry, 0)
}

fn render_at(ty: &TypeExpr, registry: &Registry, depth: usize) -> String {
    match ty {
        TypeExpr::Primitive(name) if name.is_empty() => "any".to_string(),
        TypeExpr::Primitive(name) => name.clone(),
        TypeExpr::Reference(reference) => registry.display_name(&reference.target_id),
        TypeExpr::Object(object) => render_intersection(object, registry, depth),
        TypeExpr::Array(ArrayType::Single(element)) => {
            let inner = render_at(element, registry, depth);
            if needs_parens(element) {
                format!("({})[]", inner)
            } else {
                format!("{}[]", inner)
            }
        }
        TypeExpr::Array(ArrayType::Tuple(elements)) => {
            let inner: Vec<String> = elements
                .iter()
                .map(|e| render_at(e, registry, depth))
                .collect();
            format!("[{}]", inner.join(", "))
        }
        TypeExpr::Enum(EnumType {
            values: Some(values),
            ..
        }) if !values.is_empty() => values
            .iter()
            .map(render_literal)
            .collect::<Vec<_>>()
            .join(" | "),
        TypeExpr::Enum(EnumType { id, .. }) => {
            format!("keyof typeof {}", registry.display_name(id))
        }
        TypeExpr::Union(members) if members.is_empty() => "any".to_string(),
        TypeExpr::Union(members) => members
            .iter()
            .map(|m| render_at(m, registry, depth))
            .collect::<Vec<_>>()
            .join(" | "),
        TypeExpr::Intersection(members) if members.is_empty() => "any".to_string(),
        TypeExpr::Intersection(members) => members
            .iter()
            .map(|m| {
                let inner = render_at(m, registry, depth);
                if is_union_like(m) {
                    format!("({})", inner)
                } else {
                    inner
                }
            })
            .collect::<Vec<_>>()
            .join(" & "),
    }
}

/// `A & B & {...}`; the body is left out when it adds nothing.
fn render_intersection(object: &ObjectType, registry: &Registry, depth: usize) -> String {
    let mut parts: Vec<String> = object
        .extends
        .iter()
        .map(|r| registry.display_name(&r.target_id))
        .collect();

    if parts.is_empty() || object.entries().next().is_some() {
        parts.push(render_body(object, registry, depth));
    }
    parts.join(" & ")
}

fn render_body(object: &ObjectType, registry: &Registry, depth: usize) -> String {
    let fields = match &object.properties {
        Properties::FreeForm => return "{[key: string]: any}".to_string(),
        Properties::Fields(fields) if fields.is_empty() => return "{}".to_string(),
        Properties::Fields(fields) => fields,
    };

    let indent = "  ".repeat(depth + 1);
    let mut out = String::from("{\n");
    for (key, ty) in fields {
        out.push_str(&format!(
            "{}{}: {};\n",
            indent,
            quote_key(key),
            render_at(ty, registry, depth + 1)
        ));
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
    out
}

fn render_enum(name: &str, values: &[Value]) -> String {
    let mut out = format!("export enum {} {{\n", name);
    for value in values {
        let member = match value {
            Value::Number(n) => format!("_{}", n.to_string().replace(['-', '.'], "_")),
            Value::String(s) => format!("'{}'", escape(s)),
            other => format!("'{}'", escape(&other.to_string())),
        };
        let literal = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => format!("'{}'", escape(s)),
            other => format!("'{}'", escape(&other.to_string())),
        };
        out.push_str(&format!("  {} = {},\n", member, literal));
    }
    out.push('}');
    out
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", escape(s)),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => format!("'{}'", escape(&other.to_string())),
    }
}

/// Array elements that must be wrapped before appending `[]`.
fn needs_parens(element: &TypeExpr) -> bool {
    match element {
        TypeExpr::Object(object) => !object.extends.is_empty(),
        TypeExpr::Intersection(members) => members.len() > 1,
        other => is_union_like(other),
    }
}

/// Renders with a top-level `|` or a `keyof` prefix.
fn is_union_like(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Union(members) => members.len() > 1,
        TypeExpr::Enum(EnumType { values: None, .. }) => true,
        TypeExpr::Enum(EnumType {
            values: Some(values),
            ..
        }) => values.len() > 1,
        _ => false,
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
