//! # filo-core
//!
//! Core traits and types shared across the FILO client crates.
//!
//! ## Overview
//!
//! This crate provides the foundational pieces the rest of the workspace
//! builds on:
//!
//! - [`ChatMessage`] / [`ChatRole`] - conversation content
//! - [`ChatModel`] - the seam to the generative-language text collaborator
//! - [`FiloError`] / [`Result`] - unified error handling

pub mod content;
pub mod error;
pub mod model;

pub use content::{ChatMessage, ChatRole};
pub use error::{FiloError, Result};
pub use model::ChatModel;
