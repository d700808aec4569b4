//! Catalog side entities: the relation targets books link to, plus publishers.

use serde::{Deserialize, Serialize};

use super::Labeled;

/// Author of one or more books (target side of `book-author`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDraft {
    pub name: String,
}

/// Genre classification (target side of `book-genre`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreDraft {
    pub name: String,
}

/// Publishing house, referenced by books through a plain foreign key
/// rather than a junction table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherDraft {
    pub name: String,
}

/// Physical store location (target side of `book-location`; the link payload
/// carries the stocked quantity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDraft {
    pub name: String,
}

impl Labeled for Author {
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for Genre {
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for Publisher {
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for Location {
    fn label(&self) -> &str {
        &self.name
    }
}
