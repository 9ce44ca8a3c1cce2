//! CDN cache purge over the Akamai CLI: `akamai purge delete --cpcode`,
//! authenticated with the decrypted edgerc credentials file.

use std::path::PathBuf;
use std::process::Command;

use async_trait::async_trait;
use docpub_core::contract::{CachePurge, CollaboratorError};
use tracing::{error, info};

pub struct AkamaiCachePurge {
    edgerc_file: PathBuf,
    binary: PathBuf,
}

impl AkamaiCachePurge {
    /// The binary is expected at `./akamai`, where [`crate::setup`]
    /// installs it.
    pub fn new(edgerc_file: PathBuf) -> Self {
        Self {
            edgerc_file,
            binary: PathBuf::from("./akamai"),
        }
    }
}

#[async_trait]
impl CachePurge for AkamaiCachePurge {
    async fn purge(&self, cpcode: &str) -> Result<(), CollaboratorError> {
        info!(cpcode, "akamai purge");

        let status = Command::new(&self.binary)
            .arg("purge")
            .arg("--edgerc")
            .arg(&self.edgerc_file)
            .args(["delete", "--cpcode"])
            .arg(cpcode)
            .status();

        match status {
            Ok(status) if status.success() => {
                info!(cpcode, "akamai purge completed");
                Ok(())
            }
            Ok(status) => {
                error!(cpcode, "akamai purge exited with non-zero code: {}", status);
                Err(format!("akamai purge exited with {status}").into())
            }
            Err(e) => {
                error!(error = ?e, "Failed to launch akamai process");
                Err(Box::new(e))
            }
        }
    }
}
