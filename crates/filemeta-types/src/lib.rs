//! Filemeta Types - Pure type definitions for the file metadata service
//!
//! This crate contains only plain data types with no async runtime
//! dependencies, shared by the server and any future client.

pub mod metadata;

pub use metadata::*;
