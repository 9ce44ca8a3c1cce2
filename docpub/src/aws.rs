//! Storage sync over the `aws` CLI: `aws s3 sync --delete` with a
//! dedicated shared-credentials file and a per-site profile.

use std::path::PathBuf;
use std::process::Command;

use async_trait::async_trait;
use docpub_core::contract::{CollaboratorError, StorageSync, SyncRequest};
use tracing::{error, info};

pub struct AwsStorageSync {
    credentials_file: PathBuf,
}

impl AwsStorageSync {
    pub fn new(credentials_file: PathBuf) -> Self {
        Self { credentials_file }
    }
}

#[async_trait]
impl StorageSync for AwsStorageSync {
    async fn sync(&self, request: SyncRequest) -> Result<(), CollaboratorError> {
        info!(
            source = %request.source,
            destination = %request.destination,
            profile = %request.profile,
            tool_dry_run = request.tool_dry_run,
            "aws s3 sync"
        );

        let mut command = Command::new("aws");
        command
            .env("AWS_SHARED_CREDENTIALS_FILE", &self.credentials_file)
            .arg("--profile")
            .arg(&request.profile)
            .args(["s3", "sync"]);
        if request.tool_dry_run {
            command.arg("--dryrun");
        }
        command
            .arg("--delete")
            .arg(&request.source)
            .arg(&request.destination);

        match command.status() {
            Ok(status) if status.success() => {
                info!(
                    destination = %request.destination,
                    "aws s3 sync completed"
                );
                Ok(())
            }
            Ok(status) => {
                error!(
                    destination = %request.destination,
                    "aws s3 sync exited with non-zero code: {}", status
                );
                Err(format!("aws s3 sync exited with {status}").into())
            }
            Err(e) => {
                error!(error = ?e, "Failed to launch aws process");
                Err(Box::new(e))
            }
        }
    }
}
