//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into console-facing APIs.
//! - Keep the presentation layer decoupled from storage details.

pub mod tracker_service;
