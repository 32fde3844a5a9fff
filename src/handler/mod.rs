//! Request handler module
//!
//! Request routing dispatch and the word-cloud endpoint.

pub mod router;
pub mod wordcloud;

// Re-export main entry point
pub use router::handle_request;
