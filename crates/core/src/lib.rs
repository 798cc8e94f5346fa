//! Core library for Taskboard
//!
//! This crate contains the core business logic, including:
//! - Task management and querying
//! - Category management
//! - CSV export

pub mod category;
pub mod db;
pub mod error;
pub mod export;
pub mod task;

pub use error::{Error, FieldError};
pub type Result<T> = std::result::Result<T, Error>;
