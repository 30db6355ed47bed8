//! Carta: a concurrent site mapper
//!
//! This crate crawls a website from a root address, following hyperlinks
//! within an allow-listed set of hosts up to a bounded depth, and builds a
//! hierarchical map of the visited pages: extracted assets, outgoing links,
//! and links that failed to resolve. Progress streams to the caller while
//! the crawl runs; the final page tree is rendered as JSON or YAML.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for carta operations
#[derive(Debug, Error)]
pub enum CartaError {
    #[error("Invalid root address: {0}")]
    Url(#[from] UrlError),

    #[error("Initial fetch of {url} failed: {message}")]
    RootFetch { url: String, message: String },

    #[error("Crawl finished without fetching any page")]
    NoPages,

    #[error("Report error: {0}")]
    Report(#[from] output::ReportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Root-address validation errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for carta operations
pub type Result<T> = std::result::Result<T, CartaError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{CrawlEvent, CrawlHandle, Crawler, PageNode, PageSnapshot};
pub use output::ReportFormat;
