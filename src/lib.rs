//! KRIS AI gateway - a thin HTTP proxy in front of generative-AI providers
//!
//! Exposes four stateless handlers (3D description, chat title, project
//! documentary, project lessons) that turn a small JSON request into one
//! upstream completion call, plus helpers for the public image endpoint and
//! the topic dialog state.

pub mod ai;
pub mod app;
pub mod error;
pub mod handlers;
pub mod image;
pub mod models;
pub mod prompts;
pub mod proxy;
pub mod server;
pub mod topic;

pub use error::{Error, Result};
