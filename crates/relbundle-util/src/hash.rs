use std::fmt;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use sha1::{Digest, Sha1};

/// Digest algorithms required for Maven repository sidecar files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
}

impl ChecksumAlgorithm {
    /// Every algorithm a sidecar is written for, in write order.
    pub const ALL: [ChecksumAlgorithm; 2] = [ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha1];

    /// File extension of the sidecar, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha1 => "sha1",
        }
    }

    /// Length of the lowercase hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            ChecksumAlgorithm::Md5 => 32,
            ChecksumAlgorithm::Sha1 => 40,
        }
    }

    /// Whether `name` already carries one of the checksum sidecar suffixes.
    pub fn is_sidecar_name(name: &str) -> bool {
        Self::ALL
            .iter()
            .any(|algo| name.ends_with(&format!(".{}", algo.extension())))
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumAlgorithm::Md5 => write!(f, "MD5"),
            ChecksumAlgorithm::Sha1 => write!(f, "SHA-1"),
        }
    }
}

/// Compute the digest of a byte slice, returning a lowercase hex string.
pub fn checksum(data: &[u8], algo: ChecksumAlgorithm) -> String {
    match algo {
        ChecksumAlgorithm::Md5 => hex_digest::<Md5>(data),
        ChecksumAlgorithm::Sha1 => hex_digest::<Sha1>(data),
    }
}

/// Compute the digest of a file, returning a lowercase hex string.
pub fn checksum_file(path: &Path, algo: ChecksumAlgorithm) -> std::io::Result<String> {
    match algo {
        ChecksumAlgorithm::Md5 => hex_digest_reader::<Md5>(path),
        ChecksumAlgorithm::Sha1 => hex_digest_reader::<Sha1>(path),
    }
}

fn hex_digest<D: Digest>(data: &[u8]) -> String {
    let mut hasher = D::new();
    hasher.update(data);
    to_hex(&hasher.finalize())
}

fn hex_digest_reader<D: Digest>(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = D::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
