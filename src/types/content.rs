use serde::{Deserialize, Serialize};

/// A piece of content together with the images it owns.
///
/// `id` is chosen by the caller; timestamps are epoch seconds and are stored
/// as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// An image attached to a [`Content`]. Storage assigns its row id, which is
/// never exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub filename: String,
    /// Opaque type code; its meaning belongs to the clients.
    #[serde(rename = "type", default)]
    pub kind: i32,
}
