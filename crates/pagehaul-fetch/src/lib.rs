//! Streaming acquisition of page assets.
//!
//! Takes the deduplicated reference set produced by collection, resolves each
//! reference, and brings the payload to disk: data URIs are written directly,
//! network locations are probed for their content type and streamed
//! chunk-by-chunk so large media never sits fully in memory.
//!
//! # Key properties
//!
//! - **Fault isolation**: every failure is caught at the per-reference
//!   boundary and recorded; one bad reference never aborts the batch.
//! - **Collision-safe naming**: a mutex-serialized name planner guarantees no
//!   two references share a destination path, across workers and across runs.
//! - **Bounded concurrency**: downloads run under a semaphore-limited worker
//!   pool with an optional batch deadline; work past the deadline is
//!   abandoned and recorded as timed out.

mod engine;
mod error;
mod http;
mod name;

pub use engine::{AcquireOptions, Acquirer, AcquisitionRecord};
pub use error::{AcquireError, Result};
pub use http::{BoxStream, HttpClient, ProbeInfo, StreamedBody};
pub use name::NamePlanner;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
