// src/tokens/mod.rs
//! Bearer token issuance.

pub mod voucher;
