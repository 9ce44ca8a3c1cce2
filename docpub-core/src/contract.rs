//! Capability interfaces for the external tools the workflow drives.
//!
//! The core never invokes a tool itself: storage sync, CDN purge and
//! credential handling are reached through the traits below. The binary
//! crate provides the real implementations (aws, akamai, gpg); tests use
//! the generated mocks.
//!
//! All methods are async and return a boxed error at the capability
//! boundary; the workflow tags failures with the tool name. The traits are
//! annotated for `mockall` so consumers can generate deterministic mocks
//! (exported behind the `test-export-mocks` feature, on by default).

use async_trait::async_trait;

/// Error type shared by all collaborator capabilities.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// One mirror-sync request against the storage tool.
///
/// `source` and `destination` are either local directories or storage URLs;
/// the tool treats the transfer as a destructive one-way mirror (files
/// absent from the source are deleted at the destination).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub source: String,
    pub destination: String,
    /// Credential profile to authenticate the transfer with.
    pub profile: String,
    /// Forwarded to the tool's own dry-run flag; the call still executes.
    pub tool_dry_run: bool,
}

/// One-way mirror synchronisation between two locations. The core does not
/// implement any diffing itself.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait StorageSync: Send + Sync {
    async fn sync(&self, request: SyncRequest) -> Result<(), CollaboratorError>;
}

/// CDN cache invalidation scoped to one cache identifier.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait CachePurge: Send + Sync {
    async fn purge(&self, cpcode: &str) -> Result<(), CollaboratorError>;
}

/// Encryption and decryption of stored credential files. `name` is the
/// plaintext file name; implementations derive the encrypted blob name
/// from it.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn encrypt(&self, name: &str, passphrase: &str) -> Result<(), CollaboratorError>;

    async fn decrypt(&self, name: &str, passphrase: &str) -> Result<(), CollaboratorError>;
}
