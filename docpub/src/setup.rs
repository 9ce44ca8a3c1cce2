//! Environment bootstrap: decrypt the stored credentials, then download
//! and install the pinned Akamai CLI release with its purge subcommand.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use docpub_core::contract::CredentialStore;
use docpub_core::publish::ExecutionMode;
use tracing::info;

use crate::cli::{CREDENTIAL_FILES, PASSPHRASE_VAR};
use crate::gpg::GpgCredentialStore;

const AKAMAI_CLI_URL: &str =
    "https://github.com/akamai/cli/releases/download/1.1.5/akamai-1.1.5-linuxamd64";

pub async fn run(credentials_dir: &Path, mode: ExecutionMode) -> Result<()> {
    let passphrase = std::env::var(PASSPHRASE_VAR)
        .with_context(|| format!("{PASSPHRASE_VAR} must be set for setup"))?;
    let store = GpgCredentialStore::new(credentials_dir.to_path_buf(), mode);
    for file in CREDENTIAL_FILES {
        store
            .decrypt(file, &passphrase)
            .await
            .map_err(|e| anyhow::anyhow!("decrypting {file} failed: {e}"))?;
    }

    // A stale CLI state directory turns `akamai install` interactive.
    if let Ok(home) = std::env::var("HOME") {
        let state_dir = Path::new(&home).join(".akamai-cli");
        info!(path = %state_dir.display(), dry_run = mode.is_dry_run(), "removing akamai cli state");
        if !mode.is_dry_run() {
            let _ = fs::remove_dir_all(&state_dir);
        }
    }

    info!(url = AKAMAI_CLI_URL, dry_run = mode.is_dry_run(), "downloading akamai cli");
    if mode.is_dry_run() {
        info!("dry run: skipping akamai cli download and install");
        return Ok(());
    }

    let response = reqwest::get(AKAMAI_CLI_URL)
        .await
        .context("failed to download the akamai cli")?
        .error_for_status()
        .context("akamai cli download returned an error status")?;
    let bytes = response
        .bytes()
        .await
        .context("failed to read the akamai cli download")?;
    fs::write("akamai", &bytes).context("failed to write the akamai binary")?;

    let mut permissions = fs::metadata("akamai")?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions("akamai", permissions)?;
    info!(bytes = bytes.len(), "installed akamai binary");

    // First run asks three yes/no configuration questions; decline them all.
    let mut child = Command::new("./akamai")
        .stdin(Stdio::piped())
        .spawn()
        .context("failed to launch akamai first run")?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(b"n\nn\nn\n")?;
    }
    let _ = child.wait();

    let status = Command::new("./akamai")
        .args(["install", "purge", "--force"])
        .status()
        .context("failed to launch akamai install")?;
    anyhow::ensure!(status.success(), "akamai install purge exited with {status}");
    info!("akamai purge command installed");
    Ok(())
}
