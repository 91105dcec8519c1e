#![allow(dead_code)]

use alphabyte::config::Config;
use alphabyte::{Content, ContentService, ContentStorage, Image};
use tempfile::TempDir;

/// Config pointing at a fresh database file inside `dir`.
pub fn test_config(dir: &TempDir) -> Config {
    Config {
        database_url: format!("sqlite:{}", dir.path().join("alphabyte-test.db").display()),
        ..Config::default()
    }
}

/// Open a schema-initialized storage in a temp dir. Keep the `TempDir` alive
/// for as long as the storage is used.
pub async fn open_storage(cfg: &Config) -> ContentStorage {
    ContentStorage::open(cfg)
        .await
        .expect("failed to open test database")
}

pub async fn setup() -> (TempDir, ContentService) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let storage = open_storage(&test_config(&dir)).await;
    (dir, ContentService::new(storage))
}

pub fn image(url: &str, filename: &str, kind: i32) -> Image {
    Image {
        url: url.to_string(),
        filename: filename.to_string(),
        kind,
    }
}

pub fn sample(id: i64) -> Content {
    Content {
        id,
        title: format!("title {id}"),
        body: format!("body of content {id}"),
        created_at: 1_700_000_000 + id,
        updated_at: 1_700_000_000 + id,
        images: vec![
            image("https://cdn.example/cover.png", "cover.png", 1),
            image("https://cdn.example/inline.jpg", "inline.jpg", 2),
        ],
    }
}

pub async fn image_rows(service: &ContentService, content_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM images WHERE content_id = ?")
        .bind(content_id)
        .fetch_one(service.storage().pool())
        .await
        .expect("failed to count image rows")
}

pub const FAILING_IMAGE_URL: &str = "https://fail.invalid/boom.png";

/// Make every insert of an image with [`FAILING_IMAGE_URL`] abort.
pub async fn install_image_failure(service: &ContentService) {
    sqlx::query(
        r#"CREATE TRIGGER IF NOT EXISTS fail_image_insert
           BEFORE INSERT ON images
           WHEN NEW.url = 'https://fail.invalid/boom.png'
           BEGIN
               SELECT RAISE(ABORT, 'injected image failure');
           END"#,
    )
    .execute(service.storage().pool())
    .await
    .expect("failed to install failure trigger");
}
