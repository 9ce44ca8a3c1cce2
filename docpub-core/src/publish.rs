//! Publish workflow: orchestrates storage sync and cache purge for the
//! resolved destinations of a document, in order, and reports the
//! resulting public URLs.
//!
//! Two operations:
//!   - [`Publisher::publish`]: ship a freshly built local tree to the
//!     staging (or, when forced, production) destinations. The first
//!     destination is filled from the local filesystem; the remaining ones
//!     are fanned out bucket to bucket so a single upload serves every
//!     published path alias.
//!   - [`Publisher::sync_to_prod`]: promote already-published staging
//!     content to production, one bucket-to-bucket sync per path template.
//!
//! Both are strictly linear: each step blocks until the collaborator
//! finishes, and the first failure aborts the rest. There is no rollback;
//! re-running after a partial failure is safe because every sync is a
//! mirror operation.
//!
//! Dry-run is a single execution-mode flag held here and consulted at
//! every collaborator invocation point: the intended call is logged, the
//! call itself is skipped, and the step reports success.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use crate::contract::{CachePurge, CollaboratorError, StorageSync, SyncRequest};
use crate::registry::{ConfigurationError, Environment, Registry};
use crate::resolve::{resolve_destinations, resolve_urls, ResolveError};
use crate::template::{DocConfig, TemplateError};

/// Whether collaborator calls actually execute or are only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Live,
    DryRun,
}

impl ExecutionMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, ExecutionMode::DryRun)
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("{tool} failed: {source}")]
    Collaborator {
        tool: &'static str,
        #[source]
        source: CollaboratorError,
    },
}

impl From<ResolveError> for PublishError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Configuration(e) => PublishError::Configuration(e),
            ResolveError::Template(e) => PublishError::Template(e),
        }
    }
}

/// Outcome of a completed (or dry-run) workflow operation.
#[derive(Debug)]
pub struct PublishReport {
    /// Storage destinations, in propagation order.
    pub destinations: Vec<String>,
    /// Public URLs for user-facing reporting, same order.
    pub urls: Vec<String>,
}

/// Orchestrates publish and promotion against injected collaborators.
pub struct Publisher<'a, S, P> {
    registry: &'a Registry,
    storage: S,
    cdn: P,
    mode: ExecutionMode,
    tool_dry_run: bool,
}

impl<'a, S, P> Publisher<'a, S, P>
where
    S: StorageSync,
    P: CachePurge,
{
    pub fn new(registry: &'a Registry, storage: S, cdn: P, mode: ExecutionMode) -> Self {
        Self {
            registry,
            storage,
            cdn,
            mode,
            tool_dry_run: false,
        }
    }

    /// Forward the storage tool's native dry-run flag on every sync.
    pub fn tool_dry_run(mut self, enabled: bool) -> Self {
        self.tool_dry_run = enabled;
        self
    }

    /// Publishes a locally built tree to every destination of `document`
    /// in `environment`, then purges the site's CDN cache.
    pub async fn publish(
        &self,
        document: &str,
        environment: Environment,
        local_source: &Path,
        config: &DocConfig,
    ) -> Result<PublishReport, PublishError> {
        info!(
            document,
            environment = %environment,
            source = %local_source.display(),
            "publish: start"
        );
        let destinations = resolve_destinations(self.registry, document, environment, config)?;
        let site = self.registry.site(document, environment)?;

        // The first sync ships the local build; subsequent destinations are
        // filled bucket to bucket from the previous one.
        let mut source = local_source.display().to_string();
        for destination in &destinations {
            self.sync_step(&source, destination, &site.storage_profile)
                .await?;
            source = destination.clone();
        }
        self.purge_step(&site.cpcode).await?;

        let urls = resolve_urls(self.registry, document, environment, config)?;
        for url in &urls {
            info!(url = %url, "published");
        }
        info!(document, "publish: done");
        Ok(PublishReport { destinations, urls })
    }

    /// Promotes already-published staging content to production: one
    /// bucket-to-bucket sync per path template, then a production purge.
    pub async fn sync_to_prod(
        &self,
        document: &str,
        config: &DocConfig,
    ) -> Result<PublishReport, PublishError> {
        info!(document, "sync-to-prod: start");
        let sources = resolve_destinations(self.registry, document, Environment::Pre, config)?;
        let destinations =
            resolve_destinations(self.registry, document, Environment::Prod, config)?;
        let prod = self.registry.site(document, Environment::Prod)?;

        for (source, destination) in sources.iter().zip(&destinations) {
            self.sync_step(source, destination, &prod.storage_profile)
                .await?;
        }
        self.purge_step(&prod.cpcode).await?;

        let urls = resolve_urls(self.registry, document, Environment::Prod, config)?;
        for url in &urls {
            info!(url = %url, "published");
        }
        info!(document, "sync-to-prod: done");
        Ok(PublishReport { destinations, urls })
    }

    async fn sync_step(
        &self,
        source: &str,
        destination: &str,
        profile: &str,
    ) -> Result<(), PublishError> {
        info!(
            source,
            destination,
            profile,
            dry_run = self.mode.is_dry_run(),
            "sync"
        );
        if self.mode.is_dry_run() {
            return Ok(());
        }
        let request = SyncRequest {
            source: source.to_string(),
            destination: destination.to_string(),
            profile: profile.to_string(),
            tool_dry_run: self.tool_dry_run,
        };
        self.storage.sync(request).await.map_err(|e| {
            error!(error = ?e, source, destination, "sync failed");
            PublishError::Collaborator {
                tool: "storage sync",
                source: e,
            }
        })
    }

    async fn purge_step(&self, cpcode: &str) -> Result<(), PublishError> {
        info!(cpcode, dry_run = self.mode.is_dry_run(), "purge");
        if self.mode.is_dry_run() {
            return Ok(());
        }
        self.cdn.purge(cpcode).await.map_err(|e| {
            error!(error = ?e, cpcode, "purge failed");
            PublishError::Collaborator {
                tool: "cache purge",
                source: e,
            }
        })
    }
}
