// Core modules implementing storage, indexing, and error modeling.
pub mod error;
pub mod index;
pub mod record;
pub mod slot;
pub mod store;
pub mod validate;
