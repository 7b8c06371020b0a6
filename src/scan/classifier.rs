//! Sensitivity classification for filesystem entries
//!
//! Classification is name-based and pure. A second, content-based pass exists for
//! files whose names only *suggest* configuration (`*.json`, `*.toml`, `settings*`, ...):
//! the head of the file is scanned for credential-looking tokens. That pass fails
//! open, so an unreadable or binary file is never escalated.

use regex::Regex;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

/// Well-known sensitive file and directory names, compared case-insensitively.
pub const SENSITIVE_NAMES: &[&str] = &[
    ".ssh",
    ".gnupg",
    ".aws",
    ".azure",
    ".gcloud",
    ".kube",
    ".docker",
    ".netrc",
    ".npmrc",
    ".pypirc",
    ".pgpass",
    ".git-credentials",
    ".password-store",
    ".vault-token",
    ".htpasswd",
    ".my.cnf",
    "known_hosts",
    "authorized_keys",
    "credentials",
    "credentials.json",
    "secrets.json",
    "secrets.yml",
    "secrets.yaml",
    "terraform.tfstate",
    "wallet.dat",
    "keychain",
    ".bash_history",
    ".zsh_history",
];

/// Prefix shared by dotenv files (`.env`, `.env.local`, `.env.production`, ...).
pub const ENV_FILE_PREFIX: &str = ".env";

/// Private key, certificate and keystore extensions.
pub const SENSITIVE_EXTENSIONS: &[&str] = &[
    "pem", "key", "p12", "pfx", "jks", "keystore", "crt", "cer", "der", "p8", "ppk", "kdbx",
    "gpg", "asc",
];

/// Substrings that mark a name as sensitive wherever they appear.
pub const SENSITIVE_KEYWORDS: &[&str] = &[
    "secret",
    "credential",
    "password",
    "passwd",
    "token",
    "private_key",
    "privatekey",
    "api_key",
    "apikey",
    "access_key",
];

/// Extensions that make a file a candidate for content scanning.
const CONTENT_CANDIDATE_EXTENSIONS: &[&str] = &[
    "json",
    "yaml",
    "yml",
    "toml",
    "ini",
    "conf",
    "cfg",
    "properties",
    "xml",
];

/// Name prefixes that make a file a candidate for content scanning.
const CONTENT_CANDIDATE_PREFIXES: &[&str] = &["config", "settings"];

/// Lowercased tokens that escalate a candidate file when found in its content.
const CONTENT_KEYWORDS: &[&str] = &[
    "api_key",
    "apikey",
    "secret_key",
    "access_token",
    "auth_token",
    "client_secret",
    "password",
    "private_key",
    "-----begin",
];

/// How much of a candidate file is read for the content heuristic.
pub const CONTENT_SCAN_BYTES: usize = 8 * 1024;

static LONG_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[:=]\s*["']?[A-Za-z0-9]{32,}["']?"#).expect("long token regex is valid")
});

/// Result of classifying one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub sensitive: bool,
    /// Human readable rule that matched; empty when not sensitive.
    pub reason: String,
}

impl Classification {
    fn flagged(reason: impl Into<String>) -> Self {
        Self {
            sensitive: true,
            reason: reason.into(),
        }
    }

    fn clear() -> Self {
        Self::default()
    }
}

/// Classify an entry by its name. The rules only look at the final component;
/// the path is taken so callers can pass the entry as they found it.
pub fn classify(name: &str, _full_path: &Path) -> Classification {
    let lower = name.to_lowercase();

    if SENSITIVE_NAMES.iter().any(|n| *n == lower) {
        return Classification::flagged("Known sensitive file or directory");
    }

    if is_env_file(&lower) {
        return Classification::flagged("Environment variables file");
    }

    if let Some(ext) = extension_of(&lower) {
        if SENSITIVE_EXTENSIONS.contains(&ext) {
            return Classification::flagged(format!("Private key or certificate (.{})", ext));
        }
    }

    if let Some(keyword) = SENSITIVE_KEYWORDS.iter().find(|k| lower.contains(*k)) {
        return Classification::flagged(format!("Name contains '{}'", keyword));
    }

    if lower.starts_with("id_") && !lower.ends_with(".pub") {
        return Classification::flagged("SSH private key");
    }

    if lower.starts_with("serviceaccountkey") && lower.ends_with(".json") {
        return Classification::flagged("Service account key");
    }

    Classification::clear()
}

/// Classify an entry found on disk, escalating config-like files whose content
/// looks like it carries credentials.
pub fn classify_entry(
    name: &str,
    full_path: &Path,
    is_directory: bool,
    content_scan: bool,
) -> Classification {
    let by_name = classify(name, full_path);
    if by_name.sensitive || is_directory || !content_scan {
        return by_name;
    }

    if is_content_candidate(name) && content_looks_sensitive(full_path) {
        return Classification::flagged("Contains credential-like content");
    }

    by_name
}

/// `.env` itself or `.env.<anything>`.
pub fn is_env_file(lower_name: &str) -> bool {
    lower_name == ENV_FILE_PREFIX
        || lower_name
            .strip_prefix(ENV_FILE_PREFIX)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Secondary, non-exact pattern: names that suggest configuration but are not
/// sensitive by themselves.
pub fn is_content_candidate(name: &str) -> bool {
    let lower = name.to_lowercase();

    if let Some(ext) = extension_of(&lower) {
        if CONTENT_CANDIDATE_EXTENSIONS.contains(&ext) {
            return true;
        }
    }

    if CONTENT_CANDIDATE_PREFIXES
        .iter()
        .any(|p| lower.starts_with(p))
    {
        return true;
    }

    // .npmrc-style dotfiles
    lower.starts_with('.') && lower.ends_with("rc") && lower.len() > 3
}

/// Read the head of `path` and look for credential-like content.
///
/// Returns false for anything that is not a regular file or cannot be read or
/// decoded as text. Opening a FIFO or device would block the walk.
pub fn content_looks_sensitive(path: &Path) -> bool {
    let is_regular = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_file());
    if !is_regular {
        return false;
    }

    let Ok(file) = File::open(path) else {
        return false;
    };

    let mut buf = Vec::with_capacity(CONTENT_SCAN_BYTES);
    if file
        .take(CONTENT_SCAN_BYTES as u64)
        .read_to_end(&mut buf)
        .is_err()
    {
        return false;
    }

    text_looks_sensitive(&buf)
}

/// Content heuristic over raw bytes.
pub fn text_looks_sensitive(bytes: &[u8]) -> bool {
    if bytes.contains(&0) {
        return false;
    }

    // A multi-byte character cut at the read boundary is not a reason to give up,
    // so only the valid prefix is scanned.
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return false,
    };

    let lower = text.to_lowercase();
    CONTENT_KEYWORDS.iter().any(|k| lower.contains(k)) || LONG_TOKEN_RE.is_match(text)
}

pub(crate) fn extension_of(lower_name: &str) -> Option<&str> {
    let (stem, ext) = lower_name.rsplit_once('.')?;
    if stem.is_empty() {
        // ".pem" is a hidden file named pem, not an extension
        return None;
    }
    Some(ext)
}
