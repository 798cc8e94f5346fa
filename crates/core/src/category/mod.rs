//! Category module

mod model;
mod store;

pub use model::{Category, CategoryDraft, DEFAULT_COLOR, NAME_MAX_LEN};
pub use store::CategoryRepo;
