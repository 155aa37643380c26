//! # Storage Layer
//!
//! Contacts are persisted through two layers:
//!
//! - [`backend::StorageBackend`]: raw I/O (the record list and photo blobs).
//!   - [`fs_backend::FsBackend`]: production storage in a data directory
//!   - [`mem_backend::MemBackend`]: in-memory storage for tests
//! - [`record_store::RecordStore`]: every contact operation (lookup by email,
//!   search, create, update, delete) on top of any backend.
//!
//! ## Keys
//!
//! Records are addressed by email, compared case-insensitively. A create is an
//! insert-if-absent decided inside a single `&mut self` call, so as long as one
//! owner holds the store (see [`crate::worker`]) duplicate emails cannot be
//! stored.
//!
//! ## Storage Format
//!
//! For `FsBackend`:
//! ```text
//! <data dir>/
//! ├── contacts.json        # Record list (JSON array, insertion order)
//! └── photos/<uuid>.photo  # Photo blob per record
//! ```
//!
//! Photos are kept out of the record list so the list stays small and
//! human-readable.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;

pub use record_store::{DoctorReport, RecordStore, Upserted};

/// Production store.
pub type FileStore = RecordStore<fs_backend::FsBackend>;

/// Store for tests.
pub type InMemoryStore = RecordStore<mem_backend::MemBackend>;
