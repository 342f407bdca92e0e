//! # Repository Module
//!
//! SQL access for the local cache, kept behind small repository types.
//!
//! ```text
//!   LocalSnapshot (source.rs)
//!        │  db.snapshots().get("shared")
//!        ▼
//!   SnapshotRepository ──► SQL ──► SQLite
//! ```
//!
//! - [`snapshot::SnapshotRepository`] - Whole-document inventory snapshots

pub mod snapshot;
