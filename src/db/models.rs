use crate::types::{Content, Image};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbContent {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbImage {
    pub id: i64,
    pub content_id: i64,
    pub url: String,
    pub filename: String,
    #[sqlx(rename = "type")]
    pub kind: i32,
}

impl DbContent {
    /// Assemble the aggregate from the content row and its image rows.
    pub fn into_content(self, images: Vec<DbImage>) -> Content {
        Content {
            id: self.id,
            title: self.title,
            body: self.body,
            created_at: self.created_at,
            updated_at: self.updated_at,
            images: images.into_iter().map(Image::from).collect(),
        }
    }
}

impl From<&Content> for DbContent {
    fn from(c: &Content) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            body: c.body.clone(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<DbImage> for Image {
    fn from(d: DbImage) -> Self {
        Image {
            url: d.url,
            filename: d.filename,
            kind: d.kind,
        }
    }
}
