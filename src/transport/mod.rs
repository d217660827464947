// src/transport/mod.rs
//! Outbound HTTP plumbing.

pub mod http_transport;
