pub mod analysis;
pub mod enrich;
pub mod error;
pub mod hump;
pub mod reshape;
pub mod schema;
pub mod types;
