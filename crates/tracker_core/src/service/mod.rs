//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store queries into the derived triage views.
//! - Keep API layers decoupled from storage details.

pub mod triage_service;
