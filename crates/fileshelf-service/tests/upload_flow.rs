//! Integration tests for collision-free filename assignment, run against
//! a real on-disk SQLite catalog.

use std::collections::BTreeSet;

use tempfile::TempDir;

use fileshelf_core::config::{AppConfig, CatalogConfig, DatabaseConfig, logging::LoggingConfig};
use fileshelf_core::error::ErrorKind;
use fileshelf_core::types::pagination::PageRequest;
use fileshelf_entity::file::FileRecord;
use fileshelf_service::{FileService, UploadRequest, UploadedFile};

/// A bootstrapped service over a throwaway catalog file.
struct TestCatalog {
    service: FileService,
    _dir: TempDir,
}

impl TestCatalog {
    async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = AppConfig {
            database: DatabaseConfig {
                url: format!("sqlite:{}", dir.path().join("catalog.db").display()),
                max_connections: 5,
                connect_timeout_seconds: 5,
                busy_timeout_seconds: 5,
            },
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        };
        let service = FileService::bootstrap(&config).await.expect("bootstrap");
        Self { service, _dir: dir }
    }

    async fn upload(&self, filename: &str, owner: &str) -> FileRecord {
        self.service
            .upload(request(filename, owner))
            .await
            .expect("upload")
    }
}

fn request(filename: &str, owner: &str) -> UploadRequest {
    UploadRequest {
        description: format!("upload of {filename}"),
        file: UploadedFile {
            name: filename.to_string(),
            mimetype: "image/jpeg".to_string(),
            payload: "aGVsbG8gd29ybGQ=".to_string(),
        },
        owner: owner.to_string(),
    }
}

#[tokio::test]
async fn test_first_upload_keeps_its_name() {
    let catalog = TestCatalog::new().await;
    let stored = catalog.upload("elvis.jpg", "ann").await;
    assert_eq!(stored.filename, "elvis.jpg");
    assert_eq!(stored.version, 0);
}

#[tokio::test]
async fn test_duplicate_upload_is_renamed() {
    let catalog = TestCatalog::new().await;
    catalog.upload("elvis.jpg", "ann").await;
    let copy = catalog.upload("elvis.jpg", "ann").await;
    assert_eq!(copy.filename, "elvis(1).jpg");
    assert_eq!(copy.version, 1);
}

#[tokio::test]
async fn test_marker_sequence_continues_past_existing_copies() {
    let catalog = TestCatalog::new().await;
    catalog.upload("kitten.jpg", "ann").await;
    catalog.upload("kitten.jpg", "ann").await;
    catalog.upload("kitten.jpg", "ann").await;
    let fourth = catalog.upload("kitten.jpg", "ann").await;
    assert_eq!(fourth.filename, "kitten(3).jpg");
}

#[tokio::test]
async fn test_unmarked_upload_beside_marked_only_family() {
    let catalog = TestCatalog::new().await;
    let marked = catalog.upload("dog(2).jpg", "ann").await;
    assert_eq!(marked.filename, "dog(2).jpg");
    assert_eq!(marked.version, 2);

    // Slot 0 is still free, so the unmarked original keeps its name.
    let original = catalog.upload("dog.jpg", "ann").await;
    assert_eq!(original.filename, "dog.jpg");
    assert_eq!(original.version, 0);
}

#[tokio::test]
async fn test_marked_upload_joins_family_at_its_marker() {
    let catalog = TestCatalog::new().await;
    catalog.upload("dog.jpg", "ann").await;
    catalog.upload("dog.jpg", "ann").await; // dog(1).jpg

    let joined = catalog.upload("dog(2).jpg", "ann").await;
    assert_eq!(joined.filename, "dog(2).jpg");
    assert_eq!(joined.version, 2);

    // The family is now dense, so the next unmarked upload takes slot 3.
    let next = catalog.upload("dog.jpg", "ann").await;
    assert_eq!(next.filename, "dog(3).jpg");
}

#[tokio::test]
async fn test_uploads_interleave_around_a_premarked_name() {
    let catalog = TestCatalog::new().await;
    catalog.upload("dog(2).jpg", "ann").await;

    let original = catalog.upload("dog.jpg", "ann").await;
    assert_eq!(original.filename, "dog.jpg");
    assert_eq!(original.version, 0);

    let marked = catalog.upload("dog(1).jpg", "ann").await;
    assert_eq!(marked.filename, "dog(1).jpg");
    assert_eq!(marked.version, 1);

    // The family holds {0, 1, 2} now, so the next copy is dog(3).jpg.
    let next = catalog.upload("dog.jpg", "ann").await;
    assert_eq!(next.filename, "dog(3).jpg");
    assert_eq!(next.version, 3);
}

#[tokio::test]
async fn test_colliding_marker_starts_a_nested_family() {
    let catalog = TestCatalog::new().await;
    catalog.upload("kitten.jpg", "ann").await;
    catalog.upload("kitten.jpg", "ann").await; // kitten(1).jpg

    let nested = catalog.upload("kitten(1).jpg", "ann").await;
    assert_eq!(nested.filename, "kitten(1)(1).jpg");
    assert_eq!(nested.version, 1);

    let deeper = catalog.upload("kitten(1).jpg", "ann").await;
    assert_eq!(deeper.filename, "kitten(1)(2).jpg");
    assert_eq!(deeper.version, 2);
}

#[tokio::test]
async fn test_owners_do_not_share_families() {
    let catalog = TestCatalog::new().await;
    let anns = catalog.upload("pic.jpg", "ann").await;
    let bobs = catalog.upload("pic.jpg", "bob").await;
    assert_eq!(anns.filename, "pic.jpg");
    assert_eq!(bobs.filename, "pic.jpg");

    let anns_copy = catalog.upload("pic.jpg", "ann").await;
    let bobs_copy = catalog.upload("pic.jpg", "bob").await;
    assert_eq!(anns_copy.filename, "pic(1).jpg");
    assert_eq!(bobs_copy.filename, "pic(1).jpg");
}

#[tokio::test]
async fn test_names_without_extension_are_versioned_too() {
    let catalog = TestCatalog::new().await;
    let first = catalog.upload("README", "ann").await;
    assert_eq!(first.filename, "README");
    let second = catalog.upload("README", "ann").await;
    assert_eq!(second.filename, "README(1)");
}

#[tokio::test]
async fn test_deleted_version_slot_is_reused() {
    let catalog = TestCatalog::new().await;
    catalog.upload("note.txt", "ann").await;
    let middle = catalog.upload("note.txt", "ann").await; // note(1).txt
    catalog.upload("note.txt", "ann").await; // note(2).txt

    assert!(catalog.service.delete(middle.id).await.expect("delete"));

    let refill = catalog.upload("note.txt", "ann").await;
    assert_eq!(refill.filename, "note(1).txt");
    assert_eq!(refill.version, 1);
}

#[tokio::test]
async fn test_missing_fields_fail_validation() {
    let catalog = TestCatalog::new().await;

    let mut no_name = request("x.txt", "ann");
    no_name.file.name.clear();
    let err = catalog.service.upload(no_name).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let mut no_owner = request("x.txt", "ann");
    no_owner.owner.clear();
    let err = catalog.service.upload(no_owner).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let mut no_payload = request("x.txt", "ann");
    no_payload.file.payload.clear();
    let err = catalog.service.upload(no_payload).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Nothing was stored along the way.
    let total = catalog
        .service
        .list_all(PageRequest::default())
        .await
        .expect("list");
    assert_eq!(total.total_items, 0);
}

#[tokio::test]
async fn test_get_and_not_found() {
    let catalog = TestCatalog::new().await;
    let stored = catalog.upload("solo.txt", "ann").await;

    let fetched = catalog.service.get(stored.id).await.expect("get");
    assert_eq!(fetched.filename, "solo.txt");

    let err = catalog.service.get(stored.id + 999).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert!(!catalog.service.delete(stored.id + 999).await.expect("delete miss"));
}

#[tokio::test]
async fn test_listing_is_scoped_and_paged() {
    let catalog = TestCatalog::new().await;
    catalog.upload("a.txt", "ann").await;
    catalog.upload("b.txt", "ann").await;
    catalog.upload("c.txt", "ann").await;
    catalog.upload("d.txt", "bob").await;

    let page = catalog
        .service
        .list("ann", PageRequest::new(1, 2))
        .await
        .expect("list ann");
    assert_eq!(page.total_items, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.has_next);
    assert!(page.items.iter().all(|f| f.owner == "ann"));

    let everything = catalog
        .service
        .list_all(PageRequest::default())
        .await
        .expect("list all");
    assert_eq!(everything.total_items, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_get_distinct_slots() {
    let catalog = TestCatalog::new().await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = catalog.service.clone();
        handles.push(tokio::spawn(async move {
            service.upload(request("burst.png", "ann")).await.expect("upload")
        }));
    }

    let mut versions = BTreeSet::new();
    let mut filenames = BTreeSet::new();
    for handle in handles {
        let record = handle.await.expect("join");
        versions.insert(record.version);
        filenames.insert(record.filename);
    }

    assert_eq!(versions, BTreeSet::from([0, 1, 2, 3]));
    assert_eq!(
        filenames,
        BTreeSet::from([
            "burst.png".to_string(),
            "burst(1).png".to_string(),
            "burst(2).png".to_string(),
            "burst(3).png".to_string(),
        ])
    );
}
