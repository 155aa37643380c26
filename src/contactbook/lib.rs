//! # Contactbook Architecture
//!
//! Contactbook is a **UI-agnostic address book library**: a persistent store of
//! contacts keyed by email, and a list model that keeps an in-memory copy of
//! that store in sync for whatever UI sits on top. The `contactbook` binary is
//! one such UI.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)                               │
//! │  - Parses arguments, prints the list and model events       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  List Model (list_model.rs)                                 │
//! │  - Cached list of contacts mirroring the store              │
//! │  - Validates before saving, emits Changed / Error events    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store Worker (worker.rs)                                   │
//! │  - Owns the store on its own thread, runs jobs in order     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore: keyed lookups, search, create/update/delete │
//! │  - StorageBackend: FsBackend (production), MemBackend (test)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `list_model.rs` inward, code never writes to stdout/stderr and never
//! exits the process. Results come back as `Result` values and
//! [`list_model::ModelEvent`]s.
//!
//! ## Testing Strategy
//!
//! 1. **Store** (`store/`): unit tests against `MemBackend`, plus file
//!    backend tests in `tests/`.
//! 2. **Worker and list model**: unit tests driving a real worker over
//!    `MemBackend`, including injected write failures.
//! 3. **CLI**: end-to-end tests of the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`model`]: `Contact` and its stored form `Record`
//! - [`validation`]: Contact form rules
//! - [`store`]: Storage abstraction and implementations
//! - [`worker`]: Background thread that owns the store
//! - [`list_model`]: Cached contact list and its events
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod config;
pub mod error;
pub mod list_model;
pub mod model;
pub mod store;
pub mod validation;
pub mod worker;
