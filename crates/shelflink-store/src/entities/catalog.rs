//! Entity impls for the catalog-side tables
//!
//! Genre, publisher, and location need nothing beyond the generic store;
//! authors pick up a name search.

use rusqlite::{Connection, Row, ToSql};
use shelflink_core::errors::Result;
use shelflink_core::model::{
    Author, AuthorDraft, Genre, GenreDraft, Location, LocationDraft, Publisher, PublisherDraft,
};
use shelflink_core::rules;

use crate::entity::{Entity, EntityStore};
use crate::errors::from_rusqlite;

impl Entity for Author {
    type Draft = AuthorDraft;

    const ENTITY: &'static str = "author";
    const TABLE: &'static str = "authors";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Author {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    fn bind(draft: &AuthorDraft) -> Vec<&dyn ToSql> {
        vec![&draft.name]
    }

    fn validate(draft: &AuthorDraft) -> Result<()> {
        rules::validate_label("name", &draft.name)
    }
}

impl Entity for Genre {
    type Draft = GenreDraft;

    const ENTITY: &'static str = "genre";
    const TABLE: &'static str = "genres";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Genre {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    fn bind(draft: &GenreDraft) -> Vec<&dyn ToSql> {
        vec![&draft.name]
    }

    fn validate(draft: &GenreDraft) -> Result<()> {
        rules::validate_label("name", &draft.name)
    }
}

impl Entity for Publisher {
    type Draft = PublisherDraft;

    const ENTITY: &'static str = "publisher";
    const TABLE: &'static str = "publishers";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Publisher {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    fn bind(draft: &PublisherDraft) -> Vec<&dyn ToSql> {
        vec![&draft.name]
    }

    fn validate(draft: &PublisherDraft) -> Result<()> {
        rules::validate_label("name", &draft.name)
    }
}

impl Entity for Location {
    type Draft = LocationDraft;

    const ENTITY: &'static str = "location";
    const TABLE: &'static str = "locations";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Location {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    fn bind(draft: &LocationDraft) -> Vec<&dyn ToSql> {
        vec![&draft.name]
    }

    fn validate(draft: &LocationDraft) -> Result<()> {
        rules::validate_label("name", &draft.name)
    }
}

/// Author store: generic CRUD plus a name search
#[derive(Clone, Default)]
pub struct AuthorStore {
    pub base: EntityStore<Author>,
}

impl AuthorStore {
    pub fn new() -> Self {
        Self {
            base: EntityStore::new(),
        }
    }

    /// Case-insensitive substring search on the author name
    pub fn search_by_name(&self, conn: &Connection, fragment: &str) -> Result<Vec<Author>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, name FROM authors
                 WHERE name LIKE '%' || ?1 || '%'
                 ORDER BY name, id",
            )
            .map_err(|e| from_rusqlite("search_by_name", e))?;

        let authors = stmt
            .query_map([fragment], |row| Author::from_row(row))
            .map_err(|e| from_rusqlite("search_by_name", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("search_by_name", e))?;
        Ok(authors)
    }
}
