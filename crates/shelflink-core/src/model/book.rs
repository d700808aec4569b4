use serde::{Deserialize, Serialize};

use super::Labeled;

/// Book - the central inventory entity
///
/// Books own all three junction-backed relations (authors, genres, stocked
/// locations). Every attribute besides `id` and `title` is pass-through data:
/// the relationship layer never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Surrogate row id
    pub id: i64,

    /// Display title; doubles as the aggregation label
    pub title: String,

    /// Optional ISBN-13
    pub isbn: Option<String>,

    /// Retail price
    pub price: f64,

    /// Optional year of publication
    pub publication_year: Option<i64>,

    /// Optional reference to the publisher row
    pub publisher_id: Option<i64>,
}

/// Caller-supplied book fields for create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    #[serde(default)]
    pub isbn: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub publication_year: Option<i64>,
    #[serde(default)]
    pub publisher_id: Option<i64>,
}

impl Labeled for Book {
    fn label(&self) -> &str {
        &self.title
    }
}
