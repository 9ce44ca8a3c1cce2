//! Publish resolver: turns a document name, environment and document config
//! into the concrete storage destinations and public URLs, one per path
//! template, in template declaration order.

use thiserror::Error;

use crate::registry::{ConfigurationError, Environment, Registry};
use crate::template::{render, DocConfig, TemplateError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Storage locations a document publishes to in the given environment.
/// Output order matches template declaration order; during publish it is
/// the propagation order.
pub fn resolve_destinations(
    registry: &Registry,
    document: &str,
    environment: Environment,
    config: &DocConfig,
) -> Result<Vec<String>, ResolveError> {
    let doc = registry.lookup(document)?;
    let site = doc.sites.get(environment);
    doc.path_templates
        .iter()
        .map(|template| {
            let path = render(template, config)?;
            Ok(format!("{}/{}", site.storage_url, path))
        })
        .collect()
}

/// The user-facing URLs for the same templates, rendered against the site's
/// public base URL.
pub fn resolve_urls(
    registry: &Registry,
    document: &str,
    environment: Environment,
    config: &DocConfig,
) -> Result<Vec<String>, ResolveError> {
    let doc = registry.lookup(document)?;
    let site = doc.sites.get(environment);
    doc.path_templates
        .iter()
        .map(|template| {
            let path = render(template, config)?;
            Ok(format!("{}/{}/index.html", site.base_url, path))
        })
        .collect()
}
