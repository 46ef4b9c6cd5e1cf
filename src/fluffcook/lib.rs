//! # FluffCook Architecture
//!
//! FluffCook is a **UI-agnostic recipe library**: it scrapes or generates
//! recipes through a text-generation service, keeps them in local storage and
//! manages an offline cache of the app's static assets. The CLI is one client
//! of the library, not the application itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns the AppState             │
//! │  - Normalizes inputs (index strings → DisplayIndex)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, returns CmdResult with leveled messages  │
//! └─────────────────────────────────────────────────────────────┘
//!            │                                   │
//!            ▼                                   ▼
//! ┌───────────────────────────┐   ┌─────────────────────────────┐
//! │  State + Storage          │   │  Subsystems                 │
//! │  state.rs, store/         │   │  acquire/ (pipeline)        │
//! │  DataStore: FileStore,    │   │  offline/ (cache manager)   │
//! │  InMemoryStore            │   │  http.rs (transport trait)  │
//! └───────────────────────────┘   └─────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through `tracing`; the binary decides where
//! they end up.
//!
//! ## Testing Strategy
//!
//! Every network seam is a trait ([`http::HttpTransport`],
//! [`acquire::generate::GenerationService`], [`offline::origin::AssetOrigin`],
//! [`offline::storage::CacheStorage`]) with scripted implementations behind
//! the `test_utils` feature, so the pipeline and the cache lifecycle are
//! tested without a network. Storage is tested through `InMemoryStore`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`state`]: The collection, credential and rules, mirrored to storage
//! - [`store`]: Key-value storage abstraction and implementations
//! - [`model`]: Core data types (`Recipe`, `RecipeDraft`, `Mode`)
//! - [`index`]: Display ordering and 1-based display indexes
//! - [`acquire`]: Fetch, clean, generate and validate
//! - [`offline`]: Versioned cache-first asset worker
//! - [`http`]: Outgoing HTTP behind a trait
//! - [`config`]: Configuration management
//! - [`editor`]: External editor integration
//! - [`init`]: Data directory resolution and context setup
//! - [`error`]: Error types

pub mod acquire;
pub mod api;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod http;
pub mod index;
pub mod init;
pub mod model;
pub mod offline;
pub mod state;
pub mod store;
