//! # medroute-core
//!
//! The delegation orchestration runtime for MEDROUTE.
//!
//! This crate provides:
//! - The seam traits (`TextGenerator`, `RecordStore`, `SubjectResolver`,
//!   `ScopePolicy`, `ArgumentVerifier`, `DelegationObserver`)
//! - The static `ToolCatalog` and its directives
//! - The `SubAgentExecutor` that runs one handler per structured call
//! - The `Coordinator` that drives a turn and the `Session` that keeps the
//!   transcript
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medroute_core::{Coordinator, Session, SubAgentExecutor, ToolCatalog};
//! ```

pub mod catalog;
pub mod coordinator;
pub mod executor;
pub mod session;
pub mod traits;

pub use catalog::ToolCatalog;
pub use coordinator::Coordinator;
pub use executor::SubAgentExecutor;
pub use session::Session;
