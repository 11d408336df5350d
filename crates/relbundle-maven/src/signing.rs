//! Detached OpenPGP signatures via `gpg`.
//!
//! The armored private key from `SIGNING_KEY` is imported into a throwaway
//! keyring, so the operator's own `~/.gnupg` is never touched. The
//! passphrase is handed over through a file inside that keyring directory
//! rather than on the command line.

use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;

use relbundle_core::config::SigningConfig;
use relbundle_util::errors::ReleaseError;
use relbundle_util::fs::{file_name_string, list_files};
use relbundle_util::hash::ChecksumAlgorithm;
use relbundle_util::process::CommandBuilder;

use crate::collect::{signature_path, SIGNATURE_EXT};

/// Files in `dir` that still need a detached signature.
///
/// Signatures and checksum sidecars are never signed themselves.
pub fn unsigned_files(dir: &Path) -> miette::Result<Vec<PathBuf>> {
    let files = list_files(dir).map_err(ReleaseError::Io)?;
    Ok(files
        .into_iter()
        .filter(|f| {
            let name = file_name_string(f);
            !name.ends_with(&format!(".{SIGNATURE_EXT}"))
                && !ChecksumAlgorithm::is_sidecar_name(&name)
                && !signature_path(f).exists()
        })
        .collect())
}

/// Arguments for `gpg` to write `<file>.asc` next to `file`.
pub fn detach_sign_args(home: &Path, file: &Path, passphrase_file: Option<&Path>) -> Vec<String> {
    let mut args = vec![
        "--batch".to_string(),
        "--yes".to_string(),
        "--homedir".to_string(),
        home.display().to_string(),
    ];
    if let Some(pass) = passphrase_file {
        args.extend([
            "--pinentry-mode".to_string(),
            "loopback".to_string(),
            "--passphrase-file".to_string(),
            pass.display().to_string(),
        ]);
    }
    args.extend([
        "--armor".to_string(),
        "--detach-sign".to_string(),
        "--output".to_string(),
        signature_path(file).display().to_string(),
        file.display().to_string(),
    ]);
    args
}

/// Sign every unsigned artifact in `dir`, returning the signatures written.
pub fn sign_missing(dir: &Path, signing: &SigningConfig) -> miette::Result<Vec<PathBuf>> {
    let targets = unsigned_files(dir)?;
    if targets.is_empty() {
        return Ok(Vec::new());
    }
    let key = signing.key.as_ref().ok_or_else(|| ReleaseError::Configuration {
        message: "SIGNING_KEY is not set; it is required to sign artifacts".to_string(),
    })?;

    let home = tempfile::tempdir().map_err(ReleaseError::Io)?;
    let key_file = home.path().join("signing-key.asc");
    std::fs::write(&key_file, key.expose_secret()).map_err(ReleaseError::Io)?;

    let gnupg_home = home.path().display().to_string();
    CommandBuilder::new(&signing.gpg)
        .env("GNUPGHOME", &gnupg_home)
        .args(["--batch", "--homedir", &gnupg_home])
        .arg("--import")
        .arg(key_file.display().to_string())
        .exec_checked()?;

    let passphrase_file = match &signing.password {
        Some(password) => {
            let path = home.path().join("passphrase");
            std::fs::write(&path, password.expose_secret()).map_err(ReleaseError::Io)?;
            Some(path)
        }
        None => None,
    };

    let mut written = Vec::with_capacity(targets.len());
    for file in targets {
        CommandBuilder::new(&signing.gpg)
            .env("GNUPGHOME", &gnupg_home)
            .args(detach_sign_args(home.path(), &file, passphrase_file.as_deref()))
            .exec_checked()?;
        tracing::debug!("Signed {}", file.display());
        written.push(signature_path(&file));
    }
    Ok(written)
}
