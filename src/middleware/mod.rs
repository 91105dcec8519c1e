pub mod extract;

pub use extract::{ContentBody, ContentId};
