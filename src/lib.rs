pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use db::ContentStorage;
pub use error::AlphabyteError;
pub use service::ContentService;
pub use types::{Content, Image};
