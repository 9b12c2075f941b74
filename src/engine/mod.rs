//! Core engine modules for taskboard.

pub mod collection;
pub mod controller;
pub mod db;
pub mod error;
pub mod import;
pub mod repo;
pub mod resolver;
pub mod sort;
pub mod summary;
pub mod types;
