//! Hashing and delegated-signature primitives

pub mod hash;
pub mod permit;
