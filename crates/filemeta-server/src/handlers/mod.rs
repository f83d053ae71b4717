//! HTTP handlers

pub mod analyse;
pub mod health;
pub mod index;

pub use health::health;
pub use index::index;
