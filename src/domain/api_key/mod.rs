//! API key domain types

mod entity;

pub use entity::ApiKeyRecord;
