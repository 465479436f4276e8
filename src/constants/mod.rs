pub mod catalog;
pub mod prompts;

pub use catalog::CatalogKind;
