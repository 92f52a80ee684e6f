use crate::naming::display_id;
use crate::types::{Reference, TypeExpr};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Interface,
    Type,
    Enum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Registry key; enum ids keep their suffix marker.
    pub id: String,
    /// Rendered declaration name (prefix convention applied).
    pub name: String,
    pub kind: DeclKind,
    pub body: TypeExpr,
}

/// Declarations and references collected during one resolution run.
#[derive(Debug, Default)]
pub struct Registry {
    decls: IndexMap<String, Declaration>,
    refs: IndexMap<String, Reference>,
    aliases: HashMap<String, String>,
    type_with_prefix: bool,
    collisions: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose declaration names follow the `I`/`T` prefix convention.
    pub fn with_prefix(type_with_prefix: bool) -> Self {
        Self {
            type_with_prefix,
            ..Self::default()
        }
    }

    /// Registers `body` under `id`. Re-registering an id overwrites the
    /// previous entry; differing content is counted as a collision.
    pub fn register_declaration(&mut self, id: &str, kind: DeclKind, body: TypeExpr) {
        let name = self.declaration_name(id, kind);
        let decl = Declaration {
            id: id.to_string(),
            name,
            kind,
            body,
        };

        if let Some(previous) = self.decls.get(id) {
            if previous.kind != decl.kind || previous.body != decl.body {
                self.collisions += 1;
                warn!(id, "declaration id registered twice with different content, keeping the last one");
            }
        } else {
            debug!(id, ?kind, "registered declaration");
        }

        self.decls.insert(id.to_string(), decl);
    }

    pub fn get_declarations(&self) -> &IndexMap<String, Declaration> {
        &self.decls
    }

    pub fn get(&self, id: &str) -> Option<&Declaration> {
        self.decls.get(id)
    }

    /// Returns the reference for `id`, recording it in the reference table.
    pub fn set_ref(&mut self, id: &str) -> Reference {
        self.refs
            .entry(id.to_string())
            .or_insert_with(|| Reference::new(id))
            .clone()
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.refs.values()
    }

    /// Renames every recorded reference through `mapper`. The mapper always
    /// receives the original target id, so repeated passes are idempotent.
    pub fn rename_all_references<F>(&mut self, mapper: F)
    where
        F: Fn(&str) -> String,
    {
        for id in self.refs.keys() {
            self.aliases.insert(id.clone(), mapper(id));
        }
    }

    /// Points every reference at its declaration's rendered name.
    pub fn apply_declaration_names(&mut self) {
        let names: HashMap<String, String> = self
            .decls
            .iter()
            .map(|(id, decl)| (id.clone(), decl.name.clone()))
            .collect();

        self.rename_all_references(|id| {
            names
                .get(id)
                .cloned()
                .unwrap_or_else(|| display_id(id).to_string())
        });
    }

    /// Name a reference to `id` renders as.
    pub fn display_name(&self, id: &str) -> String {
        self.aliases
            .get(id)
            .cloned()
            .unwrap_or_else(|| display_id(id).to_string())
    }

    /// Number of overwrites that replaced different content.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Referenced ids with no matching declaration.
    pub fn dangling_references(&self) -> Vec<&str> {
        self.refs
            .keys()
            .filter(|id| !self.decls.contains_key(id.as_str()))
            .map(String::as_str)
            .collect()
    }

    fn declaration_name(&self, id: &str, kind: DeclKind) -> String {
        let bare = display_id(id);
        if !self.type_with_prefix {
            return bare.to_string();
        }

        match kind {
            DeclKind::Interface => format!("I{}", bare),
            DeclKind::Type => format!("T{}", bare),
            DeclKind::Enum => bare.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectType;
    use indexmap::IndexMap;

    fn object_with(key: &str) -> TypeExpr {
        let mut fields = IndexMap::new();
        fields.insert(key.to_string(), TypeExpr::string());
        TypeExpr::Object(ObjectType::fields(fields))
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = Registry::new();
        registry.register_declaration("Pet", DeclKind::Interface, object_with("name"));
        registry.register_declaration("Pet", DeclKind::Interface, object_with("tag"));

        let decls = registry.get_declarations();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls["Pet"].body, object_with("tag"));
        assert_eq!(registry.collisions(), 1);
    }

    #[test]
    fn identical_reregistration_is_not_a_collision() {
        let mut registry = Registry::new();
        registry.register_declaration("Pet", DeclKind::Type, TypeExpr::string());
        registry.register_declaration("Pet", DeclKind::Type, TypeExpr::string());
        assert_eq!(registry.collisions(), 0);
    }

    #[test]
    fn references_are_deduplicated() {
        let mut registry = Registry::new();
        let first = registry.set_ref("Pet");
        let second = registry.set_ref("Pet");
        assert_eq!(first, second);
        assert_eq!(registry.references().count(), 1);
    }

    #[test]
    fn rename_is_idempotent() {
        let mut registry = Registry::new();
        registry.set_ref("Pet");
        registry.rename_all_references(|id| format!("I{}", id));
        registry.rename_all_references(|id| format!("I{}", id));
        assert_eq!(registry.display_name("Pet"), "IPet");
    }

    #[test]
    fn prefixed_declaration_names() {
        let mut registry = Registry::with_prefix(true);
        registry.register_declaration("Pet", DeclKind::Interface, object_with("name"));
        registry.register_declaration("Pets", DeclKind::Type, TypeExpr::string());
        registry.register_declaration("PetStatus#EnumSuffix", DeclKind::Enum, TypeExpr::string());
        registry.set_ref("Pet");
        registry.set_ref("Pets");
        registry.apply_declaration_names();

        assert_eq!(registry.get("Pet").map(|d| d.name.as_str()), Some("IPet"));
        assert_eq!(registry.get("PetStatus#EnumSuffix").map(|d| d.name.as_str()), Some("PetStatus"));
        assert_eq!(registry.display_name("Pet"), "IPet");
        assert_eq!(registry.display_name("Pets"), "TPets");
    }

    #[test]
    fn reports_dangling_references() {
        let mut registry = Registry::new();
        registry.set_ref("Missing");
        registry.set_ref("Pet");
        registry.register_declaration("Pet", DeclKind::Type, TypeExpr::string());
        assert_eq!(registry.dangling_references(), vec!["Missing"]);
    }
}
