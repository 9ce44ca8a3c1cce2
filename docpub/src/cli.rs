//! CLI surface for docpub: command parsing, argument validation and
//! subcommand routing.
//!
//! All publishing logic lives in `docpub-core`; this module is strictly
//! CLI glue. The async [`run`] entrypoint is public so integration tests
//! can invoke the CLI programmatically.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use docpub_core::contract::CredentialStore;
use docpub_core::publish::{ExecutionMode, Publisher};
use docpub_core::registry::{Environment, Registry};

use crate::akamai::AkamaiCachePurge;
use crate::aws::AwsStorageSync;
use crate::gpg::GpgCredentialStore;
use crate::load_config::load_doc_config;
use crate::setup;

/// Credential files the publish tooling needs, stored GPG-encrypted next
/// to the binary and decrypted in place before any sync or purge.
pub const CREDENTIAL_FILES: [&str; 2] = ["aws-credentials.txt", "akamai-credentials.txt"];

/// Environment variable holding the credential passphrase for
/// non-interactive decryption.
pub const PASSPHRASE_VAR: &str = "DOCPUB_PASSPHRASE";

/// CLI for docpub: publish documentation builds and promote them to production.
#[derive(Parser)]
#[clap(
    name = "docpub",
    version,
    about = "Publish documentation builds to S3-backed sites behind an Akamai CDN"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Log every external call without executing any of them
    #[clap(long, global = true)]
    pub dry_run: bool,

    /// Pass the storage tool's own --dryrun flag (the call still runs)
    #[clap(long, global = true)]
    pub aws_dry_run: bool,

    /// Enable debug-level logging
    #[clap(long, global = true)]
    pub verbose: bool,

    /// Directory holding the (encrypted) credential files
    #[clap(long, global = true, default_value = "credentials")]
    pub credentials_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish a locally built document tree to its staging destinations
    Publish {
        /// Document name from the site registry
        #[clap(long)]
        doc: String,
        /// Path to the built HTML tree to upload
        #[clap(long)]
        html: PathBuf,
        /// Path to a JSON file of template variables (flat string map)
        #[clap(long)]
        doc_cfg: Option<PathBuf>,
        /// Publish straight to the production site instead of staging
        #[clap(long)]
        prod: bool,
    },
    /// Promote already-published staging content to production
    SyncToProd {
        /// Document name from the site registry
        #[clap(long)]
        doc: String,
        /// Path to a JSON file of template variables (flat string map)
        #[clap(long)]
        doc_cfg: Option<PathBuf>,
    },
    /// Decrypt credentials and install the Akamai CLI with its purge command
    Setup,
    /// Encrypt the plaintext credential files (prompts for a passphrase)
    EncryptCredentials,
    /// Decrypt the credential files using the passphrase from DOCPUB_PASSPHRASE
    DecryptCredentials,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let registry = Registry::builtin();
    registry.trace_loaded();
    let mode = if cli.dry_run {
        ExecutionMode::DryRun
    } else {
        ExecutionMode::Live
    };

    match cli.command {
        Commands::Publish {
            doc,
            html,
            doc_cfg,
            prod,
        } => {
            let config = load_doc_config(doc_cfg.as_deref())?;
            let environment = if prod {
                Environment::Prod
            } else {
                Environment::Pre
            };
            let publisher = Publisher::new(
                &registry,
                AwsStorageSync::new(cli.credentials_dir.join(CREDENTIAL_FILES[0])),
                AkamaiCachePurge::new(cli.credentials_dir.join(CREDENTIAL_FILES[1])),
                mode,
            )
            .tool_dry_run(cli.aws_dry_run);
            let report = publisher.publish(&doc, environment, &html, &config).await?;
            for url in &report.urls {
                println!("Published at {url}");
            }
            Ok(())
        }
        Commands::SyncToProd { doc, doc_cfg } => {
            let config = load_doc_config(doc_cfg.as_deref())?;
            let publisher = Publisher::new(
                &registry,
                AwsStorageSync::new(cli.credentials_dir.join(CREDENTIAL_FILES[0])),
                AkamaiCachePurge::new(cli.credentials_dir.join(CREDENTIAL_FILES[1])),
                mode,
            )
            .tool_dry_run(cli.aws_dry_run);
            let report = publisher.sync_to_prod(&doc, &config).await?;
            for url in &report.urls {
                println!("Published at {url}");
            }
            Ok(())
        }
        Commands::Setup => setup::run(&cli.credentials_dir, mode).await,
        Commands::EncryptCredentials => {
            print!("enter passphrase: ");
            io::stdout().flush()?;
            let mut passphrase = String::new();
            io::stdin().read_line(&mut passphrase)?;
            let passphrase = passphrase.trim_end_matches(['\r', '\n']);

            let store = GpgCredentialStore::new(cli.credentials_dir.clone(), mode);
            for file in CREDENTIAL_FILES {
                store
                    .encrypt(file, passphrase)
                    .await
                    .map_err(|e| anyhow::anyhow!("encrypting {file} failed: {e}"))?;
            }
            Ok(())
        }
        Commands::DecryptCredentials => {
            let passphrase = std::env::var(PASSPHRASE_VAR)
                .with_context(|| format!("{PASSPHRASE_VAR} must be set to decrypt credentials"))?;
            let store = GpgCredentialStore::new(cli.credentials_dir.clone(), mode);
            for file in CREDENTIAL_FILES {
                store
                    .decrypt(file, &passphrase)
                    .await
                    .map_err(|e| anyhow::anyhow!("decrypting {file} failed: {e}"))?;
            }
            Ok(())
        }
    }
}
