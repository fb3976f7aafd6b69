//! Personnel identity entities.

pub mod model;

pub use model::Personnel;
