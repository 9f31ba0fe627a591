pub mod documents;
pub mod templates;
