//! # kb-core
//!
//! Core types, moderation rules, and error types for the knowledge base.
//!
//! This crate provides the foundational types shared across all knowledge base crates:
//! - Entity structs (users, categories, questions, responses)
//! - Moderation status enums and the per-model moderation vocabulary
//! - Visibility rules (`can_view`) and the accept-answer workflow
//! - Authorship helpers for anonymous and user-owned posts
//! - Slug and URL helpers for article permalinks
//! - Alert recipient resolution for new responses
//! - Audit detail sub-types and HTTP/CLI response types
//! - Cross-cutting error types

pub mod alerts;
pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;
pub mod slug;
pub mod visibility;
