//! SQL DDL for initializing the content storage.
//! Every statement is idempotent so it can run on each start.

/// SQLite schema with:
/// - `content.id` supplied by callers, never generated
/// - `images.id` assigned by storage (AUTOINCREMENT, so ids follow insertion order)
/// - `images.content_id` referencing `content(id)` with cascade delete
/// - An index on `images.content_id` for the per-content image lookup
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS content (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_id INTEGER NOT NULL REFERENCES content(id) ON DELETE CASCADE,
    url TEXT NOT NULL,
    filename TEXT NOT NULL,
    type INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_images_content_id ON images(content_id);
"#;
