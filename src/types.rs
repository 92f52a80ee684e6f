use indexmap::IndexMap;
use serde_json::Value;

/// Resolved type expression. Closed set of variants; renderers match on it
/// exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `string`, `number`, `boolean`, `null`, `File`, or `""` when the
    /// schema declared nothing.
    Primitive(String),
    Reference(Reference),
    Object(ObjectType),
    Array(ArrayType),
    Enum(EnumType),
    Union(Vec<TypeExpr>),
    /// `allOf` members that cannot share one `extends` clause, `A & B`.
    Intersection(Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeExpr::Primitive(name.into())
    }

    pub fn string() -> Self {
        Self::primitive("string")
    }

    pub fn number() -> Self {
        Self::primitive("number")
    }

    pub fn boolean() -> Self {
        Self::primitive("boolean")
    }

    pub fn null() -> Self {
        Self::primitive("null")
    }

    pub fn file() -> Self {
        Self::primitive("File")
    }

    /// Placeholder for an under-specified schema.
    pub fn untyped() -> Self {
        Self::primitive("")
    }

    pub fn reference(target_id: impl Into<String>) -> Self {
        TypeExpr::Reference(Reference::new(target_id))
    }

    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array(ArrayType::Single(Box::new(element)))
    }

    pub fn tuple(elements: Vec<TypeExpr>) -> Self {
        TypeExpr::Array(ArrayType::Tuple(elements))
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeExpr::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// Pointer to a declaration by id. The rendered name is looked up through the
/// registry's alias table at emit time, so renames never touch this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub target_id: String,
}

impl Reference {
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Properties {
    /// Keys follow the optional-name convention (`name` / `name?`).
    Fields(IndexMap<String, TypeExpr>),
    /// Open object with no declared properties, `{[key: string]: any}`.
    FreeForm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub properties: Properties,
    pub extends: Vec<Reference>,
    /// `interface X extends A {...}` when true, `A & {...}` otherwise.
    pub use_extends_syntax: bool,
}

impl ObjectType {
    pub fn fields(properties: IndexMap<String, TypeExpr>) -> Self {
        Self {
            properties: Properties::Fields(properties),
            extends: Vec::new(),
            use_extends_syntax: false,
        }
    }

    pub fn free_form() -> Self {
        Self {
            properties: Properties::FreeForm,
            extends: Vec::new(),
            use_extends_syntax: false,
        }
    }

    /// Property entries, empty for free-form objects.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &TypeExpr)> {
        let fields = match &self.properties {
            Properties::Fields(fields) => Some(fields),
            Properties::FreeForm => None,
        };
        fields.into_iter().flat_map(|fields| fields.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayType {
    Single(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub id: String,
    /// Literal members when known; `None` renders as `keyof typeof <id>`.
    pub values: Option<Vec<Value>>,
}

impl EnumType {
    pub fn has_numeric_values(&self) -> bool {
        self.values
            .as_ref()
            .is_some_and(|values| values.iter().any(Value::is_number))
    }
}
