pub mod audit;
pub mod case;
pub mod document;
pub mod template;
