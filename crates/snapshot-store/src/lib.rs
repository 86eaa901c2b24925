//! # Poolshare Snapshot Store
//!
//! This crate is the system's only door to persistent data: it reads the
//! snapshot JSON file exported by the upstream tracker and hands the rest
//! of the application an immutable `Snapshot` value.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** encapsulates all file and format concerns. The
//!   engine never touches I/O; it receives an already-resident snapshot.
//! - **One-Shot Load:** the file is read once and never watched for
//!   changes. The snapshot changes only when the exporter writes a new
//!   file and the process restarts.
//!
//! ## Public API
//!
//! - `load_snapshot`: reads and deserializes the snapshot file.
//! - `StoreError`: the specific error types that can be returned from this
//!   crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use error::StoreError;
pub use store::load_snapshot;
