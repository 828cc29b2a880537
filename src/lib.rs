//! RoleReady - resume to job description alignment advisor
//!
//! A client for an LLM-backed advisor that scores a resume against a job
//! description, rewrites it, suggests other roles and drafts a pitch and a
//! LinkedIn profile. A reference backend proxy that talks to Gemini ships
//! alongside the client.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod preferences;
pub mod prompts;
pub mod proxy;
pub mod samples;
pub mod schema;
pub mod state;

pub use error::{Error, ErrorKind, OperationError, Result};
