//! Logger module
//!
//! Leveled, timestamped log lines for the service:
//! - Server lifecycle logging
//! - Per-phase word-cloud pipeline logging
//! - Access logging with multiple formats
//! - File-based logging with size rotation

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};
pub use writer::Level;

use crate::config::Config;
use crate::wordcloud::WordCloudError;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        writer::Rotation {
            max_bytes: config.logging.max_bytes,
            backup_count: config.logging.backup_count,
        },
        Level::parse(&config.logging.level),
    )
}

/// Reopen log files (SIGUSR1)
pub fn reopen() {
    if let Some(w) = writer::get() {
        match w.reopen() {
            Ok(()) => log_info("Log files reopened"),
            Err(e) => log_error(&format!("Failed to reopen log files: {e}")),
        }
    }
}

fn stamp(level: Level, message: &str) -> String {
    format!(
        "{} [{}] {message}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        level.as_str()
    )
}

/// Leveled write: debug/info go to the info target, warn/error to the error target
fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) if !w.enabled(level) => {}
        Some(w) if level >= Level::Warn => w.write_error(&stamp(level, message)),
        Some(w) => w.write_info(&stamp(level, message)),
        None if level >= Level::Warn => eprintln!("{}", stamp(level, message)),
        None => println!("{}", stamp(level, message)),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}

pub fn log_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info("Word cloud service started");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Endpoint: POST http://{addr}/generate_wordcloud"));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================");
}

pub fn log_shutdown() {
    log_info("Shutdown requested, no longer accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_output_dir_ready(path: &Path) {
    log_info(&format!("Output directory ready: {}", path.display()));
}

pub fn log_wordcloud_received(peer: &str, text_len: usize) {
    log_info(&format!(
        "[WordCloud] Request from {peer}, text length: {text_len} chars"
    ));
}

pub fn log_directory_checked(path: &Path, recreated: bool) {
    if recreated {
        log_warning(&format!(
            "[WordCloud] Output directory was missing and has been recreated: {}",
            path.display()
        ));
    } else {
        log_info(&format!("[WordCloud] Output directory OK: {}", path.display()));
    }
}

pub fn log_words_filtered(kept: usize, distinct: usize) {
    log_debug(&format!(
        "[WordCloud] {kept} words after filtering, {distinct} distinct"
    ));
}

pub fn log_file_written(path: &Path, bytes: usize) {
    log_info(&format!(
        "[WordCloud] Image written: {} ({bytes} bytes)",
        path.display()
    ));
}

pub fn log_file_verified(path: &Path, size: u64) {
    log_info(&format!(
        "[WordCloud] Verified {} on disk, size {size} bytes",
        path.display()
    ));
}

pub fn log_wordcloud_failed(err: &WordCloudError) {
    log_error(&format!("[WordCloud] {:?} error: {err}", err.kind()));
}

pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    write_access(&entry.render(format));
}
