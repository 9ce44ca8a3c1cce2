#![doc = "docpub: CLI for publishing documentation to CDN-backed static hosting."]

//! All publishing logic (registry, resolution, workflow) lives in the
//! `docpub-core` crate. This crate is the CLI surface plus the concrete
//! tool integrations: `aws` for storage sync, `akamai` for cache purge,
//! `gpg` for credential encryption.

pub mod akamai;
pub mod aws;
pub mod cli;
pub mod gpg;
pub mod load_config;
pub mod setup;
