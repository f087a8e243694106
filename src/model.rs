pub mod catalog;
pub mod document;
pub mod indirection;
pub mod resolver;
pub mod tint;
