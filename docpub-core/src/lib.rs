#![doc = "docpub-core: core publishing logic for docpub."]

//! This crate contains the site registry, path template rendering, the
//! publish resolver and the publish/promotion workflow. Invoking the real
//! external tools (storage sync, CDN purge, credential encryption) is not
//! included here; the binary crate implements the traits in [`contract`].
//!
//! # Usage
//! Add this as a dependency for all registry, resolution and workflow code.

pub mod contract;
pub mod publish;
pub mod registry;
pub mod resolve;
pub mod template;
