// src/models/mod.rs
//! Data structures exchanged with the authorization server.

pub mod credential;
pub mod outcome;
