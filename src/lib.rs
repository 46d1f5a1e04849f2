//! # apiprobe
//!
//! Core engine of an interactive API testing client: a catalog of documented
//! endpoints, a request builder that understands path templates and the
//! `column=operator.value` filter convention, an HTTP executor with a bounded
//! timeout, and a persisted history of past runs.
//!
//! The UI layer that drives this crate lives elsewhere; everything here is
//! plain data and async functions so it can be tested without a frontend.

pub mod builder;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod history;
pub mod http;
pub mod session;
pub mod storage;
