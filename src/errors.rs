/*!
 * Error types for the aphorium application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when calling a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Provider could not be reached at all (connection refused, DNS, timeout)
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur when talking to the quote store
#[derive(Error, Debug)]
pub enum StorageError {
    /// The database could not be opened or the connection was lost
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A query or statement failed
    #[error("Query failed: {0}")]
    Query(String),

    /// A row that was expected to exist is missing
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorageError {
    /// Classify an error bubbling out of the connection layer.
    ///
    /// Lock poisoning and open failures count as the store being unavailable;
    /// everything else is a query failure.
    pub fn from_db(error: anyhow::Error) -> Self {
        let message = error.to_string();
        if message.contains("lock") || message.contains("open") {
            StorageError::Unavailable(message)
        } else {
            StorageError::Query(message)
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(error: rusqlite::Error) -> Self {
        StorageError::Query(error.to_string())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a translation provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the quote store
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error in configuration loading or validation
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
