//! Effect interfaces (pure signatures)
//!
//! Collaborators the core calls out to but does not implement. Chains and
//! the factory take these as `&mut dyn` parameters so tests can supply an
//! in-memory implementation and deployments can bind a real ledger.

pub mod token;
