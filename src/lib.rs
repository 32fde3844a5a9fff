//! Word-cloud HTTP service
//!
//! `POST /generate_wordcloud` turns submitted text into a PNG word cloud
//! saved under the configured output directory. The `mockgen` binary seeds a
//! forum backend with synthetic users and posts.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod mockgen;
pub mod server;
pub mod wordcloud;
