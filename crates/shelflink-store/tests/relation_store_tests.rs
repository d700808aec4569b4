//! Integration tests for link persistence across relation kinds

use std::collections::BTreeSet;
use std::sync::Arc;

use rusqlite::Connection;
use shelflink_core::ShelfError;
use shelflink_store::catalog::{bookstore_registry, BOOK_AUTHOR, BOOK_GENRE, BOOK_LOCATION};
use shelflink_store::{db, schema, RelationStore};

fn setup() -> (Connection, RelationStore) {
    let conn = db::open_in_memory().expect("Failed to open in-memory db");
    schema::ensure_schema(&conn).expect("Failed to ensure schema");
    conn.execute_batch(
        "INSERT INTO books (id, title, price) VALUES
             (5, 'Beloved', 11.5),
             (6, 'Sula', 9.0);
         INSERT INTO authors (id, name) VALUES
             (1, 'Toni Morrison'),
             (2, 'A.N. Other'),
             (3, 'Octavia Butler');
         INSERT INTO genres (id, name) VALUES (7, 'Fiction'), (8, 'Historical');
         INSERT INTO locations (id, name) VALUES (2, 'Downtown'), (4, 'Warehouse');",
    )
    .expect("Failed to seed rows");
    let registry = bookstore_registry().expect("Failed to build registry");
    (conn, RelationStore::new(Arc::new(registry)))
}

// ---------------------------------------------------------------
// Pair-level operations
// ---------------------------------------------------------------

#[test]
fn test_remove_link_is_idempotent() {
    let (conn, store) = setup();
    store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();

    assert!(store.remove_link(&conn, BOOK_AUTHOR, 5, 1).unwrap());
    assert!(!store.remove_link(&conn, BOOK_AUTHOR, 5, 1).unwrap());
    assert!(store.list_links(&conn, BOOK_AUTHOR, 5).unwrap().is_empty());
}

#[test]
fn test_remove_link_by_id() {
    let (conn, store) = setup();
    let link_id = store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();

    assert!(store.remove_link_by_id(&conn, BOOK_AUTHOR, link_id).unwrap());
    assert!(!store.remove_link_by_id(&conn, BOOK_AUTHOR, link_id).unwrap());
}

#[test]
fn test_same_pair_allowed_across_kinds() {
    let (conn, store) = setup();
    // (5, 2) in book-author and (5, 2) in book-location are distinct rows
    store.add_link(&conn, BOOK_AUTHOR, 5, 2, None).unwrap();
    store.add_link(&conn, BOOK_LOCATION, 5, 2, None).unwrap();

    assert_eq!(store.list_links(&conn, BOOK_AUTHOR, 5).unwrap().len(), 1);
    assert_eq!(store.list_links(&conn, BOOK_LOCATION, 5).unwrap().len(), 1);
}

#[test]
fn test_get_link_missing_is_not_found() {
    let (conn, store) = setup();
    let err = store.get_link(&conn, BOOK_AUTHOR, 404).unwrap_err();
    assert_eq!(err.code(), "ERR_NOT_FOUND");
}

#[test]
fn test_links_for_owner_ascending_by_target() {
    let (conn, store) = setup();
    store.add_link(&conn, BOOK_AUTHOR, 5, 3, None).unwrap();
    store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();

    let links = store.links_for_owner(&conn, BOOK_AUTHOR, 5).unwrap();
    let targets: Vec<i64> = links.iter().map(|l| l.target_id).collect();
    assert_eq!(targets, vec![1, 3]);
    assert!(links.iter().all(|l| l.owner_id == 5));
    assert!(links.iter().all(|l| l.relation == BOOK_AUTHOR));
    // Kinds without a payload column read back as None
    assert!(links.iter().all(|l| l.payload.is_none()));
}

// ---------------------------------------------------------------
// Retarget and payload updates
// ---------------------------------------------------------------

#[test]
fn test_retarget_preserves_id_payload_and_timestamp() {
    let (conn, store) = setup();
    let link_id = store.add_link(&conn, BOOK_LOCATION, 5, 2, Some(9)).unwrap();
    let before = store.get_link(&conn, BOOK_LOCATION, link_id).unwrap();

    store.retarget_link(&conn, BOOK_LOCATION, link_id, 6, 4).unwrap();

    let after = store.get_link(&conn, BOOK_LOCATION, link_id).unwrap();
    assert_eq!(after.owner_id, 6);
    assert_eq!(after.target_id, 4);
    assert_eq!(after.payload, Some(9));
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn test_retarget_onto_existing_pair_is_duplicate() {
    let (conn, store) = setup();
    store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();
    let link_id = store.add_link(&conn, BOOK_AUTHOR, 5, 2, None).unwrap();

    let err = store
        .retarget_link(&conn, BOOK_AUTHOR, link_id, 5, 1)
        .unwrap_err();
    assert_eq!(err.code(), "ERR_DUPLICATE_LINK");
}

#[test]
fn test_retarget_missing_link_is_not_found() {
    let (conn, store) = setup();
    let err = store.retarget_link(&conn, BOOK_AUTHOR, 404, 5, 1).unwrap_err();
    assert_eq!(err.code(), "ERR_NOT_FOUND");
}

#[test]
fn test_set_link_payload_overwrites() {
    let (conn, store) = setup();
    let link_id = store.add_link(&conn, BOOK_LOCATION, 5, 2, Some(3)).unwrap();

    store.set_link_payload(&conn, BOOK_LOCATION, link_id, 12).unwrap();
    let link = store.get_link(&conn, BOOK_LOCATION, link_id).unwrap();
    assert_eq!(link.payload, Some(12));
}

#[test]
fn test_set_link_payload_rejected_for_payloadless_kind() {
    let (conn, store) = setup();
    let link_id = store.add_link(&conn, BOOK_GENRE, 5, 7, None).unwrap();

    let err = store
        .set_link_payload(&conn, BOOK_GENRE, link_id, 1)
        .unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_INPUT");
}

#[test]
fn test_omitted_payload_defaults_to_zero() {
    let (conn, store) = setup();
    let link_id = store.add_link(&conn, BOOK_LOCATION, 5, 2, None).unwrap();
    let link = store.get_link(&conn, BOOK_LOCATION, link_id).unwrap();
    assert_eq!(link.payload, Some(0));
}

// ---------------------------------------------------------------
// Batched reads
// ---------------------------------------------------------------

#[test]
fn test_fetch_labels_joins_target_names() {
    let (conn, store) = setup();
    store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();
    store.add_link(&conn, BOOK_AUTHOR, 5, 2, None).unwrap();
    store.add_link(&conn, BOOK_AUTHOR, 6, 3, None).unwrap();

    let mut pairs = store.fetch_labels(&conn, BOOK_AUTHOR, &[5, 6]).unwrap();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            (5, "A.N. Other".to_string()),
            (5, "Toni Morrison".to_string()),
            (6, "Octavia Butler".to_string()),
        ]
    );
}

#[test]
fn test_fetch_labels_skips_unlinked_owners() {
    let (conn, store) = setup();
    store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();

    let pairs = store.fetch_labels(&conn, BOOK_AUTHOR, &[5, 6]).unwrap();
    assert_eq!(pairs.len(), 1);
    assert!(pairs.iter().all(|(owner, _)| *owner == 5));
}

#[test]
fn test_fetch_labels_spans_id_chunks() {
    let (conn, store) = setup();
    // Enough owners to force more than one IN (...) chunk
    let mut owner_ids = Vec::new();
    for i in 0..620 {
        let id = 100 + i;
        conn.execute(
            "INSERT INTO books (id, title, price) VALUES (?1, ?2, 1.0)",
            rusqlite::params![id, format!("Book {id}")],
        )
        .unwrap();
        store.add_link(&conn, BOOK_AUTHOR, id, 1, None).unwrap();
        owner_ids.push(id);
    }

    let pairs = store.fetch_labels(&conn, BOOK_AUTHOR, &owner_ids).unwrap();
    assert_eq!(pairs.len(), 620);
    assert!(pairs.iter().all(|(_, label)| label == "Toni Morrison"));
}

#[test]
fn test_target_records_sorted_by_label() {
    let (conn, store) = setup();
    store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();
    store.add_link(&conn, BOOK_AUTHOR, 5, 2, None).unwrap();

    let records = store.target_records(&conn, BOOK_AUTHOR, 5).unwrap();
    let labels: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["A.N. Other", "Toni Morrison"]);
}

#[test]
fn test_list_links_by_target() {
    let (conn, store) = setup();
    store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();
    store.add_link(&conn, BOOK_AUTHOR, 6, 1, None).unwrap();

    let owners = store.list_links_by_target(&conn, BOOK_AUTHOR, 1).unwrap();
    assert_eq!(owners, BTreeSet::from([5, 6]));
}

// ---------------------------------------------------------------
// Reference checks
// ---------------------------------------------------------------

#[test]
fn test_entity_exists() {
    let (conn, store) = setup();
    assert!(store.entity_exists(&conn, "book", 5).unwrap());
    assert!(!store.entity_exists(&conn, "book", 404).unwrap());
    assert!(store.entity_exists(&conn, "author", 3).unwrap());
}

#[test]
fn test_missing_references_reports_gaps_sorted() {
    let (conn, store) = setup();
    let ids = BTreeSet::from([1, 2, 50, 3, 99]);
    let missing = store.missing_references(&conn, "author", &ids).unwrap();
    assert_eq!(missing, vec![50, 99]);

    let none = store
        .missing_references(&conn, "author", &BTreeSet::new())
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_unknown_entity_name_is_invalid_input() {
    let (conn, store) = setup();
    let err = store.entity_exists(&conn, "reviewer", 1).unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_INPUT");
}

#[test]
fn test_link_to_missing_target_names_the_target() {
    let (conn, store) = setup();
    let err = store.add_link(&conn, BOOK_AUTHOR, 5, 999, None).unwrap_err();
    assert_eq!(
        err,
        ShelfError::UnknownReference {
            entity: "author".to_string(),
            id: 999,
        }
    );
}

#[test]
fn test_link_from_missing_owner_names_the_owner() {
    let (conn, store) = setup();
    let err = store.add_link(&conn, BOOK_AUTHOR, 888, 1, None).unwrap_err();
    assert_eq!(
        err,
        ShelfError::UnknownReference {
            entity: "book".to_string(),
            id: 888,
        }
    );
}
