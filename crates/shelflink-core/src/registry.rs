use std::collections::BTreeMap;

use crate::errors::{Result, ShelfError};

/// Entity description the relationship layer needs: where rows live and
/// which column holds the display label
///
/// All other entity attributes are invisible to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDef {
    /// Registry name (`"book"`, `"author"`, ...)
    pub name: String,
    /// Backing table
    pub table: String,
    /// Column projected as the aggregation label
    pub label_column: String,
}

impl EntityDef {
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        label_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            label_column: label_column.into(),
        }
    }
}

/// One registered many-to-many relation and its junction-table layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    /// Stable kind name (`"book-author"`)
    pub kind: String,
    /// Owner-side entity name
    pub owner_entity: String,
    /// Target-side entity name
    pub target_entity: String,
    /// Junction table
    pub table: String,
    /// Column holding the owner id
    pub owner_column: String,
    /// Column holding the target id
    pub target_column: String,
    /// Column holding the opaque per-link payload, if this kind carries one
    pub payload_column: Option<String>,
}

impl RelationDef {
    /// True when links of this kind carry an opaque payload value
    pub fn has_payload(&self) -> bool {
        self.payload_column.is_some()
    }
}

/// Registry of entities and relation kinds
///
/// Built once at startup from the catalog and passed by reference to every
/// store and engine call; there is no ambient global instance. Lookups of
/// unregistered kinds fail with `UnknownRelationKind` before any SQL runs.
#[derive(Debug, Clone, Default)]
pub struct RelationRegistry {
    entities: BTreeMap<String, EntityDef>,
    relations: BTreeMap<String, RelationDef>,
}

impl RelationRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity definition
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the name is already registered.
    pub fn register_entity(&mut self, def: EntityDef) -> Result<()> {
        if self.entities.contains_key(&def.name) {
            return Err(ShelfError::invalid_input(format!(
                "entity already registered: {}",
                def.name
            )));
        }
        self.entities.insert(def.name.clone(), def);
        Ok(())
    }

    /// Register a relation definition
    ///
    /// Both sides must already be registered entities.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a duplicate kind or an unregistered
    /// owner/target entity.
    pub fn register_relation(&mut self, def: RelationDef) -> Result<()> {
        if self.relations.contains_key(&def.kind) {
            return Err(ShelfError::invalid_input(format!(
                "relation kind already registered: {}",
                def.kind
            )));
        }
        for side in [&def.owner_entity, &def.target_entity] {
            if !self.entities.contains_key(side) {
                return Err(ShelfError::invalid_input(format!(
                    "relation {} references unregistered entity: {}",
                    def.kind, side
                )));
            }
        }
        self.relations.insert(def.kind.clone(), def);
        Ok(())
    }

    /// Look up an entity by name
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unregistered name.
    pub fn entity(&self, name: &str) -> Result<&EntityDef> {
        self.entities
            .get(name)
            .ok_or_else(|| ShelfError::invalid_input(format!("unregistered entity: {name}")))
    }

    /// Look up a relation by kind
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationKind` for an unregistered kind.
    pub fn relation(&self, kind: &str) -> Result<&RelationDef> {
        self.relations
            .get(kind)
            .ok_or_else(|| ShelfError::UnknownRelationKind {
                kind: kind.to_string(),
            })
    }

    /// Find the relation joining `owner_entity` to `target_entity`
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationKind` when no registered kind joins the pair.
    pub fn relation_between(&self, owner_entity: &str, target_entity: &str) -> Result<&RelationDef> {
        self.relations
            .values()
            .find(|def| def.owner_entity == owner_entity && def.target_entity == target_entity)
            .ok_or_else(|| ShelfError::UnknownRelationKind {
                kind: format!("{owner_entity}-{target_entity}"),
            })
    }

    /// All relation kinds owned by `owner_entity`, in kind order
    pub fn relations_owned_by(&self, owner_entity: &str) -> Vec<&RelationDef> {
        self.relations
            .values()
            .filter(|def| def.owner_entity == owner_entity)
            .collect()
    }

    /// All registered kind names, in order
    pub fn kinds(&self) -> Vec<&str> {
        self.relations.keys().map(String::as_str).collect()
    }

    /// All registered entity names, in order
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }
}
