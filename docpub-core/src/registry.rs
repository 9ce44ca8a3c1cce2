use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Deployment environment selector: the staging site or the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Pre,
    Prod,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Pre => "pre",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre" => Ok(Environment::Pre),
            "prod" => Ok(Environment::Prod),
            other => Err(ConfigurationError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Static configuration errors: the registry does not know the name asked for.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown document '{0}'")]
    UnknownDocument(String),
    #[error("unknown environment '{0}', expected 'pre' or 'prod'")]
    UnknownEnvironment(String),
}

/// Publishing endpoints for one site in one environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// Public base URL readers see, e.g. `https://docs.oneapi.com`.
    pub base_url: String,
    /// Storage location the sync tool writes to, e.g. `s3://oneapi.com/docs`.
    pub storage_url: String,
    /// CDN cache-purge identifier (Akamai cpcode).
    pub cpcode: String,
    /// Credential profile the storage tool authenticates with.
    pub storage_profile: String,
}

/// The pre/prod pair of [`Site`] records for one site. The two records are
/// independent; nothing is derived from one to the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitePair {
    pub pre: Site,
    pub prod: Site,
}

impl SitePair {
    pub fn get(&self, environment: Environment) -> &Site {
        match environment {
            Environment::Pre => &self.pre,
            Environment::Prod => &self.prod,
        }
    }
}

/// A publishable document: which site it lives on and the destination path
/// templates it publishes to. Template order is significant; it is the
/// propagation order during publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub sites: SitePair,
    pub path_templates: Vec<String>,
}

/// Static lookup table mapping document names to their definitions.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    documents: BTreeMap<String, Document>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, document: Document) {
        self.documents.insert(name.into(), document);
    }

    pub fn lookup(&self, name: &str) -> Result<&Document, ConfigurationError> {
        self.documents
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownDocument(name.to_string()))
    }

    /// The site record a document publishes to in the given environment.
    pub fn site(
        &self,
        name: &str,
        environment: Environment,
    ) -> Result<&Site, ConfigurationError> {
        Ok(self.lookup(name)?.sites.get(environment))
    }

    pub fn trace_loaded(&self) {
        info!(documents = self.documents.len(), "Loaded site registry");
        debug!(?self, "Site registry (full debug)");
    }

    /// The compiled-in production data set.
    pub fn builtin() -> Self {
        let docs_sites = SitePair {
            pre: Site {
                base_url: "https://docs.pre.oneapi.com".to_string(),
                storage_url: "s3://pre.oneapi.com/docs".to_string(),
                cpcode: "1081245".to_string(),
                storage_profile: "oneapi-docs".to_string(),
            },
            prod: Site {
                base_url: "https://docs.oneapi.com".to_string(),
                storage_url: "s3://oneapi.com/docs".to_string(),
                cpcode: "1081797".to_string(),
                storage_profile: "oneapi-docs".to_string(),
            },
        };
        let spec_sites = SitePair {
            pre: Site {
                base_url: "https://spec.pre.oneapi.com".to_string(),
                storage_url: "s3://pre.oneapi.com/spec".to_string(),
                cpcode: "1081244".to_string(),
                storage_profile: "oneapi-spec".to_string(),
            },
            prod: Site {
                base_url: "https://spec.oneapi.com".to_string(),
                storage_url: "s3://oneapi.com/spec".to_string(),
                cpcode: "1081242".to_string(),
                storage_profile: "oneapi-spec".to_string(),
            },
        };

        let mut registry = Registry::new();
        registry.insert(
            "dpcpp",
            Document {
                sites: docs_sites,
                path_templates: vec!["versions/latest/dpcpp".to_string()],
            },
        );
        registry.insert(
            "oneapi-spec",
            Document {
                sites: spec_sites,
                path_templates: vec![
                    "versions/latest".to_string(),
                    "versions/$version".to_string(),
                ],
            },
        );
        registry
    }
}
