//! SeaORM entities.

pub mod credential;
pub mod post;
pub mod profile;
