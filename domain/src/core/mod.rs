//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - structural domain errors
//! - [`string::truncate`] - UTF-8 safe truncation for log previews

pub mod error;
pub mod string;
