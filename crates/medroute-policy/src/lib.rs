//! # medroute-policy
//!
//! A TOML-driven data scoping policy for the MEDROUTE runtime.
//!
//! ## Overview
//!
//! This crate provides [`TomlScopePolicy`], which implements the
//! [`ScopePolicy`](medroute_core::traits::ScopePolicy) trait. Each delegable
//! handler gets exactly one rule naming the single record section it may read.
//! A policy that leaves a handler unscoped, scopes one twice, or scopes the
//! coordinator is rejected at load time.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use medroute_policy::TomlScopePolicy;
//!
//! let policy = TomlScopePolicy::hospital()?;
//! // Pass `policy` to `medroute_core::SubAgentExecutor::new(...)`.
//! ```

pub mod engine;
pub mod rule;

pub use engine::{TomlScopePolicy, HOSPITAL_SCOPING_POLICY};
pub use rule::{ScopeConfig, ScopeHandler, ScopeRule};

// ── Tests ─────────────────────────────────────────────────────────────────────
