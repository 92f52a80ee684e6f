use serde_json::{json, Value};
use std::collections::BTreeMap;
use ts_codegen::generators::typescript::{render_declaration, render_declarations};
use ts_codegen::parsers::DataType;
use ts_codegen::types::{ArrayType, Properties};
use ts_codegen::{scan, DeclKind, Registry, ScanOptions, TypeExpr};

fn petstore_v2() -> Value {
    json!({
        "swagger": "2.0",
        "basePath": "/v2",
        "paths": {},
        "definitions": {
            "Category": {
                "type": "object",
                "properties": { "id": { "type": "integer", "format": "int64" }, "name": { "type": "string" } }
            },
            "Tag": {
                "type": "object",
                "properties": { "id": { "type": "integer" }, "name": { "type": "string" } }
            },
            "Pet": {
                "type": "object",
                "required": ["name", "photoUrls"],
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "category": { "$ref": "#/definitions/Category" },
                    "name": { "type": "string" },
                    "photoUrls": { "type": "array", "items": { "type": "string" } },
                    "tags": { "type": "array", "items": { "$ref": "#/definitions/Tag" } },
                    "status": { "type": "string", "enum": ["available", "pending", "sold"] }
                }
            },
            "Order": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "shipDate": { "type": "string", "format": "date-time" },
                    "status": { "type": "string", "enum": ["placed", "approved", "delivered"] },
                    "complete": { "type": "boolean" }
                }
            }
        }
    })
}

fn petstore_v3_expanded() -> Value {
    json!({
        "openapi": "3.0.0",
        "servers": [{ "url": "http://petstore.swagger.io/api" }],
        "paths": {},
        "components": {
            "schemas": {
                "Pet": {
                    "allOf": [
                        { "$ref": "#/components/schemas/NewPet" },
                        {
                            "type": "object",
                            "required": ["id"],
                            "properties": {
                                "id": { "type": "integer", "format": "int64" },
                                "categories": { "type": "array", "items": { "$ref": "#/components/schemas/Category" } }
                            }
                        }
                    ]
                },
                "NewPet": {
                    "type": "object",
                    "required": ["name"],
                    "properties": { "name": { "type": "string" }, "tag": { "type": "string" } }
                },
                "Category": {
                    "type": "object",
                    "properties": { "id": { "type": "integer" }, "name": { "type": "string" } }
                },
                "Pets": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } },
                "Error": {
                    "type": "object",
                    "required": ["code", "message"],
                    "properties": { "code": { "type": "integer" }, "message": { "type": "string" } }
                }
            }
        }
    })
}

fn fields(registry: &Registry, id: &str) -> Vec<(String, TypeExpr)> {
    let decl = registry.get(id).unwrap_or_else(|| panic!("{} not registered", id));
    match decl.body.as_object().map(|o| &o.properties) {
        Some(Properties::Fields(fields)) => fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => panic!("{} is not an object with fields", id),
    }
}

#[test]
fn swagger_v2_pet_resolves_end_to_end() {
    let result = scan(&petstore_v2(), ScanOptions::default()).expect("scan");
    assert_eq!(result.inputs.data_type, DataType::Swagger);

    let registry = &result.registry;
    let pet = registry.get("Pet").expect("Pet");
    assert_eq!(pet.kind, DeclKind::Interface);

    let pet_fields = fields(registry, "Pet");
    let lookup = |key: &str| {
        pet_fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| panic!("missing {}", key))
    };

    assert_eq!(lookup("id?"), TypeExpr::number());
    assert_eq!(lookup("name"), TypeExpr::string());
    assert_eq!(lookup("photoUrls"), TypeExpr::array(TypeExpr::string()));
    assert_eq!(lookup("category?"), TypeExpr::reference("Category"));
    match lookup("tags?") {
        TypeExpr::Array(ArrayType::Single(element)) => {
            assert_eq!(*element, TypeExpr::reference("Tag"))
        }
        other => panic!("tags should be an array, got {:?}", other),
    }

    assert!(registry.get("PetStatus#EnumSuffix").is_some());
    assert!(registry.get("OrderStatus#EnumSuffix").is_some());
    assert!(registry.dangling_references().is_empty());
    assert_eq!(registry.collisions(), 0);
}

#[test]
fn spec_example_pet_with_required_id() {
    let doc = json!({
        "swagger": "2.0",
        "definitions": {
            "Pet": {
                "properties": {
                    "id": { "type": "integer" },
                    "tags": { "type": "array", "items": { "$ref": "#/definitions/Tag" } }
                },
                "required": ["id"]
            }
        }
    });

    let result = scan(&doc, ScanOptions::default()).expect("scan");
    let pet_fields = fields(&result.registry, "Pet");
    assert_eq!(
        pet_fields,
        vec![
            ("id".to_string(), TypeExpr::number()),
            ("tags?".to_string(), TypeExpr::array(TypeExpr::reference("Tag"))),
        ]
    );
    assert_eq!(result.registry.dangling_references(), vec!["Tag"]);
}

#[test]
fn openapi_v3_expanded_uses_extends() {
    let result = scan(&petstore_v3_expanded(), ScanOptions::default()).expect("scan");
    assert_eq!(result.inputs.data_type, DataType::OpenApi);
    assert_eq!(result.inputs.base_path, "/api");

    let registry = &result.registry;
    let pet = registry.get("Pet").expect("Pet");
    assert_eq!(pet.kind, DeclKind::Interface);
    assert_eq!(
        render_declaration(pet, registry),
        "export interface Pet extends NewPet {\n  'id': number;\n  'categories'?: Category[];\n}"
    );

    let pets = registry.get("Pets").expect("Pets");
    assert_eq!(pets.kind, DeclKind::Type);
    assert_eq!(render_declaration(pets, registry), "export type Pets = Pet[];");
}

#[test]
fn type_prefix_renames_every_reference() {
    let options = ScanOptions {
        type_with_prefix: true,
    };
    let mut result = scan(&petstore_v3_expanded(), options).expect("scan");

    let rendered = render_declarations(&result.registry).join("\n");
    assert!(rendered.contains("export interface IPet extends INewPet {"));
    assert!(rendered.contains("'categories'?: ICategory[];"));
    assert!(rendered.contains("export type TPets = IPet[];"));

    // a second pass changes nothing
    result.registry.apply_declaration_names();
    assert_eq!(render_declarations(&result.registry).join("\n"), rendered);
}

#[test]
fn name_collision_keeps_last_body() {
    let doc = json!({
        "swagger": "2.0",
        "definitions": {
            "pet": { "type": "object", "properties": { "name": { "type": "string" } } },
            "Pet": { "type": "object", "properties": { "tag": { "type": "string" } } }
        }
    });

    let result = scan(&doc, ScanOptions::default()).expect("scan");
    let registry = &result.registry;
    assert_eq!(registry.get_declarations().len(), 1);
    assert_eq!(
        fields(registry, "Pet"),
        vec![("tag?".to_string(), TypeExpr::string())]
    );
    assert_eq!(registry.collisions(), 1);
}

#[test]
fn malformed_schemas_degrade_instead_of_failing() {
    let doc = json!({
        "swagger": "2.0",
        "definitions": {
            "Empty": {},
            "Weird": { "items": { "type": "integer" } },
            "NotAnObject": 42,
            "BadRef": { "$ref": null }
        }
    });

    let result = scan(&doc, ScanOptions::default()).expect("scan");
    let rendered = render_declarations(&result.registry);
    assert!(rendered.contains(&"export type Empty = any;".to_string()));
    assert!(rendered.contains(&"export type Weird = number;".to_string()));
    assert!(rendered.contains(&"export type NotAnObject = any;".to_string()));
    assert!(rendered.contains(&"export type BadRef = any;".to_string()));
}

#[test]
fn non_object_document_is_invalid() {
    let err = scan(&json!(["not", "a", "spec"]), ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ts_codegen::CodegenError::InvalidDocument(_)));
}

/// Reads the property names, optional flags and referenced names back out of
/// rendered interface text.
fn reparse_interface(text: &str) -> (Vec<String>, BTreeMap<String, (bool, String)>) {
    let header = text.lines().next().unwrap_or_default();
    let extends: Vec<String> = header
        .split(" extends ")
        .nth(1)
        .map(|rest| {
            rest.trim_end_matches('{')
                .split(',')
                .map(|s| s.trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut props = BTreeMap::new();
    for line in text.lines().skip(1) {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('\'') else {
            continue;
        };
        let (name, rest) = rest.split_once('\'').expect("closing quote");
        let (optional, rest) = match rest.strip_prefix('?') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let ty = rest.trim_start_matches(':').trim().trim_end_matches(';');
        props.insert(name.to_string(), (optional, ty.to_string()));
    }
    (extends, props)
}

#[test]
fn rendered_declarations_round_trip_structure() {
    let doc = petstore_v3_expanded();
    let result = scan(&doc, ScanOptions::default()).expect("scan");
    let schemas = doc["components"]["schemas"].as_object().expect("schemas");

    for key in ["NewPet", "Category", "Error"] {
        let schema = &schemas[key];
        let decl = result.registry.get(key).expect("declared");
        let (extends, props) = reparse_interface(&render_declaration(decl, &result.registry));
        assert!(extends.is_empty());

        let required: Vec<&str> = schema["required"]
            .as_array()
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let expected: Vec<&String> = schema["properties"].as_object().expect("props").keys().collect();
        assert_eq!(props.len(), expected.len());
        for name in expected {
            let (optional, _) = &props[name.as_str()];
            assert_eq!(*optional, !required.contains(&name.as_str()), "{}.{}", key, name);
        }
    }

    let pet = result.registry.get("Pet").expect("Pet");
    let (extends, props) = reparse_interface(&render_declaration(pet, &result.registry));
    assert_eq!(extends, vec!["NewPet".to_string()]);
    assert_eq!(props["id"], (false, "number".to_string()));
    assert_eq!(props["categories"], (true, "Category[]".to_string()));
}

#[test]
fn top_level_enums_render_as_aliases_of_synthesized_enums() {
    let doc = json!({
        "openapi": "3.0.0",
        "components": {
            "schemas": {
                "Status": { "type": "string", "enum": ["on", "off"] },
                "Level": { "type": "integer", "enum": [1, 2] }
            }
        }
    });

    let result = scan(&doc, ScanOptions::default()).expect("scan");
    let rendered = render_declarations(&result.registry);
    assert!(rendered.contains(&"export type Status = keyof typeof StatusEnum;".to_string()));
    assert!(rendered.contains(&"export enum StatusEnum {\n  'on' = 'on',\n  'off' = 'off',\n}".to_string()));
    assert!(rendered.contains(&"export type Level = LevelEnum;".to_string()));
    assert!(result.registry.dangling_references().is_empty());
}
