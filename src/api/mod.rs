//! Orchestration API for imagepub.
//!
//! [`publish`] holds the pipeline that the binary drives. It accepts
//! library-owned types and injected clients, and never prints to
//! stdout/stderr or calls `std::process::exit`; push progress goes to the
//! writer supplied by the caller.

mod publish;

pub use publish::{PublishParams, PublishedImages, publish};
