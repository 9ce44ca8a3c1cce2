//! Credential encryption over `gpg`: symmetric AES256 blobs stored next to
//! the plaintext files, passphrase supplied on fd 0 so it never appears in
//! the process list.
//!
//! Unlike the workflow collaborators, this store is also invoked directly
//! by CLI commands, so it holds the execution mode itself and suppresses
//! the gpg calls on a dry run.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use async_trait::async_trait;
use docpub_core::contract::{CollaboratorError, CredentialStore};
use docpub_core::publish::ExecutionMode;
use tracing::{error, info};

pub struct GpgCredentialStore {
    directory: PathBuf,
    mode: ExecutionMode,
}

impl GpgCredentialStore {
    pub fn new(directory: PathBuf, mode: ExecutionMode) -> Self {
        Self { directory, mode }
    }

    fn run_with_passphrase(
        command: &mut Command,
        passphrase: &str,
    ) -> Result<(), CollaboratorError> {
        let mut child = command.stdin(Stdio::piped()).spawn().map_err(|e| {
            error!(error = ?e, "Failed to launch gpg process");
            Box::new(e) as CollaboratorError
        })?;
        let mut stdin = child.stdin.take().ok_or("gpg stdin unavailable")?;
        stdin.write_all(passphrase.as_bytes())?;
        drop(stdin);

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            error!("gpg exited with non-zero code: {}", status);
            Err(format!("gpg exited with {status}").into())
        }
    }
}

#[async_trait]
impl CredentialStore for GpgCredentialStore {
    async fn encrypt(&self, name: &str, passphrase: &str) -> Result<(), CollaboratorError> {
        let plaintext = self.directory.join(name);
        let encrypted = self.directory.join(format!("{name}.gpg"));
        info!(file = name, dry_run = self.mode.is_dry_run(), "gpg encrypt");
        if self.mode.is_dry_run() {
            return Ok(());
        }

        // gpg refuses to overwrite in batch mode; clear any stale blob.
        if encrypted.exists() {
            fs::remove_file(&encrypted)?;
        }
        let mut command = Command::new("gpg");
        command
            .args([
                "--batch",
                "--passphrase-fd",
                "0",
                "--symmetric",
                "--cipher-algo",
                "AES256",
            ])
            .arg(&plaintext);
        Self::run_with_passphrase(&mut command, passphrase)
    }

    async fn decrypt(&self, name: &str, passphrase: &str) -> Result<(), CollaboratorError> {
        let plaintext = self.directory.join(name);
        let encrypted = self.directory.join(format!("{name}.gpg"));
        info!(file = name, dry_run = self.mode.is_dry_run(), "gpg decrypt");
        if self.mode.is_dry_run() {
            return Ok(());
        }

        let mut command = Command::new("gpg");
        command
            .args(["--yes", "--batch", "--passphrase-fd", "0", "--decrypt"])
            .arg("--output")
            .arg(&plaintext)
            .arg(&encrypted);
        Self::run_with_passphrase(&mut command, passphrase)
    }
}
