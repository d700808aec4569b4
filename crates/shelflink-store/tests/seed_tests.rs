//! End-to-end seed tests: parse from YAML, import, re-import

use std::sync::Arc;

use rusqlite::Connection;
use shelflink_core::ShelfError;
use shelflink_store::catalog::{bookstore_registry, BOOK_AUTHOR, BOOK_LOCATION};
use shelflink_store::seed::{import_seed, parse_seed_file, parse_seed_str};
use shelflink_store::{db, schema, RelationStore};

const SEED_YAML: &str = "
schema_version: 0
authors:
  - id: 1
    name: Toni Morrison
  - id: 2
    name: A.N. Other
genres:
  - id: 7
    name: Fiction
locations:
  - id: 2
    name: Downtown
books:
  - id: 5
    title: Beloved
    price: 11.5
links:
  - relation: book-author
    owner: 5
    target: 1
  - relation: book-author
    owner: 5
    target: 2
  - relation: book-genre
    owner: 5
    target: 7
  - relation: book-location
    owner: 5
    target: 2
    payload: 4
";

fn setup() -> (Connection, RelationStore) {
    let conn = db::open_in_memory().expect("Failed to open in-memory db");
    schema::ensure_schema(&conn).expect("Failed to ensure schema");
    let registry = bookstore_registry().expect("Failed to build registry");
    (conn, RelationStore::new(Arc::new(registry)))
}

#[test]
fn test_import_full_seed() {
    let (conn, store) = setup();
    let seed = parse_seed_str(SEED_YAML, store.registry()).unwrap();

    let summary = import_seed(&conn, &store, &seed).unwrap();
    assert_eq!(summary.entities, 5);
    assert_eq!(summary.links_added, 4);
    assert_eq!(summary.links_existing, 0);
    assert_eq!(summary.digest.len(), 64);

    let authors = store.list_links(&conn, BOOK_AUTHOR, 5).unwrap();
    assert_eq!(authors, std::collections::BTreeSet::from([1, 2]));

    let location_links = store.links_for_owner(&conn, BOOK_LOCATION, 5).unwrap();
    assert_eq!(location_links.len(), 1);
    assert_eq!(location_links[0].payload, Some(4));
}

#[test]
fn test_reimport_counts_existing_links() {
    let (conn, store) = setup();
    let seed = parse_seed_str(SEED_YAML, store.registry()).unwrap();

    import_seed(&conn, &store, &seed).unwrap();
    let second = import_seed(&conn, &store, &seed).unwrap();
    assert_eq!(second.links_added, 0);
    assert_eq!(second.links_existing, 4);
}

#[test]
fn test_reimport_leaves_live_payload_edits_alone() {
    let (conn, store) = setup();
    let seed = parse_seed_str(SEED_YAML, store.registry()).unwrap();
    import_seed(&conn, &store, &seed).unwrap();

    let link_id = store.links_for_owner(&conn, BOOK_LOCATION, 5).unwrap()[0].id;
    store.set_link_payload(&conn, BOOK_LOCATION, link_id, 9).unwrap();

    import_seed(&conn, &store, &seed).unwrap();
    let link = store.get_link(&conn, BOOK_LOCATION, link_id).unwrap();
    assert_eq!(link.payload, Some(9));
}

#[test]
fn test_digest_is_stable_across_imports() {
    let (conn, store) = setup();
    let seed = parse_seed_str(SEED_YAML, store.registry()).unwrap();

    let first = import_seed(&conn, &store, &seed).unwrap();
    let second = import_seed(&conn, &store, &seed).unwrap();
    assert_eq!(first.digest, second.digest);
}

#[test]
fn test_dangling_link_reference_is_unknown_reference() {
    let (conn, store) = setup();
    let yaml = "
schema_version: 0
books:
  - id: 5
    title: Beloved
    price: 11.5
links:
  - relation: book-author
    owner: 5
    target: 99
";
    let seed = parse_seed_str(yaml, store.registry()).unwrap();

    let err = import_seed(&conn, &store, &seed).unwrap_err();
    assert_eq!(
        err,
        ShelfError::UnknownReference {
            entity: "author".to_string(),
            id: 99,
        }
    );
    // Reference checks run before any link insert
    assert!(store.list_links(&conn, BOOK_AUTHOR, 5).unwrap().is_empty());
}

#[test]
fn test_link_may_reference_preexisting_rows() {
    let (conn, store) = setup();
    conn.execute_batch("INSERT INTO authors (id, name) VALUES (42, 'Resident Author');")
        .unwrap();

    let yaml = "
schema_version: 0
books:
  - id: 5
    title: Beloved
    price: 11.5
links:
  - relation: book-author
    owner: 5
    target: 42
";
    let seed = parse_seed_str(yaml, store.registry()).unwrap();
    let summary = import_seed(&conn, &store, &seed).unwrap();
    assert_eq!(summary.links_added, 1);
}

#[test]
fn test_parse_seed_file_reads_from_disk() {
    let (_conn, store) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.yaml");
    std::fs::write(&path, SEED_YAML).unwrap();

    let seed = parse_seed_file(&path, store.registry()).unwrap();
    assert_eq!(seed.entity_count(), 5);
    assert_eq!(seed.links.len(), 4);
}

#[test]
fn test_missing_seed_file_is_seed_invalid() {
    let (_conn, store) = setup();
    let err = parse_seed_file("no/such/seed.yaml", store.registry()).unwrap_err();
    assert_eq!(err.code(), "ERR_SEED_INVALID");
}
