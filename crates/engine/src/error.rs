//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`InvalidAmount`] thrown when an amount or a limit is not acceptable.
//! - [`InvalidFilter`] thrown when a listing window or limit is not acceptable.
//! - [`Database`] thrown when the store is unavailable.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidFilter`]: EngineError::InvalidFilter
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
