//! Emotion annotation over generative models.
//!
//! This crate provides:
//! - Model discovery and priority ordering for a provider credential
//! - Sequential fallback across models with failure classification
//! - Credential management for API keys
//! - Provider trait with a Gemini implementation over `reqwest`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Annotator                       │
//! │   discover ──▶ order ──▶ attempt ──▶ classify      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │          GenerativeProvider (GeminiClient)          │
//! │        GET /models   POST :generateContent          │
//! └─────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────┐
//! │                  CredentialStore                    │
//! │         (System Keyring + Env Fallback)             │
//! └─────────────────────────────────────────────────────┘
//! ```

mod error;
mod types;

pub mod annotate;
pub mod auth;
pub mod providers;

pub use annotate::{Annotation, Annotator, Diagnostic, DiagnosticCategory};
pub use error::{Error, Result};
pub use types::{ModelCategory, ModelDescriptor};
