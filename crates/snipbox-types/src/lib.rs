pub mod error;
pub mod models;
pub mod store;

pub use error::ModelError;
pub use models::{Snippet, User};
pub use store::{SnippetStore, UserStore};
