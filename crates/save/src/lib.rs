//! Persistence for robot basketball competitions.
//!
//! State is saved as versioned JSON documents: one header for the
//! competition and one document per match. Writes happen in the
//! background and collapse when the same document is saved repeatedly.
//!
//! ## Documents
//!
//! - [`Document`] — Versioned record with step-wise upgrades
//! - [`encode`] / [`decode`] — Stamping and migrating versions
//!
//! ## Storage
//!
//! - [`Storage`] — Async named-blob store
//! - [`Disk`] — Directory of files with atomic replacement
//! - [`Memory`] — In-process store
//! - [`Writer`] — Coalescing background writer
//! - [`Archive`] — Save and load a whole competition
mod archive;
mod document;
mod error;
mod storage;
mod writer;

pub use archive::*;
pub use document::*;
pub use error::*;
pub use storage::*;
pub use writer::*;
