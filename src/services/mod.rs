// src/services/mod.rs
//! Business logic.

pub mod credential_client;
