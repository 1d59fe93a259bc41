//! Whole-book acquisition.
//!
//! Downloads every verse of a book for offline reading.
//!
//! # Features
//!
//! - Chapter lengths discovered by probing, with a per-chapter verse ceiling
//! - Strictly sequential requests spaced by a per-host rate limiter
//! - Pending library entry that grows chapter by chapter
//! - Progress events over a channel
//! - One download per `(book, translation)` at a time
//! - All-or-nothing result: a failed download leaves nothing behind

mod engine;
mod error;
mod probe;
pub mod rate_limiter;

pub use engine::{
    AcquisitionEngine, DownloadEvent, DownloadOutcome, DownloadRequest, progress_percent,
};
pub use error::AcquisitionError;
pub use probe::{ChapterProbe, ProbeOutcome, ProbeStep};
pub use rate_limiter::RateLimiter;
