//! Core types shared across motree facilities
//!
//! This crate provides the canonical field keys and event names used by both
//! the error facility and the structured logging macros, so that every
//! component reports operations with the same vocabulary.

pub mod schema;
