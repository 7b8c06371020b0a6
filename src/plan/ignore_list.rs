//! The `.clawignore` file: a categorized list of paths and globs the gateway must not see

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use crate::scan::classifier::{extension_of, is_env_file, SENSITIVE_EXTENSIONS};

const HEADER: &str = "\
# clawcage ignore list
# Paths and patterns hidden from the OpenClaw gateway.
# Lines starting with '#' are comments. Manage with `clawcage ignore`.
";

/// Directories and files that hold key material rather than passwords or tokens.
const KEY_NAMES: &[&str] = &[".ssh", ".gnupg", "authorized_keys", "known_hosts"];

const CREDENTIAL_NAMES: &[&str] = &[
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
];

const SECRET_KEYWORDS: &[&str] = &["secret", "token", "api_key", "apikey", "access_key"];

const DATA_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3", "sql", "csv", "tfstate", "dat"];

const CONFIG_EXTENSIONS: &[&str] = &[
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

/// Section of the ignore file. Declaration order is the order sections are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Secrets,
    Credentials,
    Keys,
    Config,
    Data,
    Custom,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Secrets,
        Category::Credentials,
        Category::Keys,
        Category::Config,
        Category::Data,
        Category::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Secrets => "secrets",
            Category::Credentials => "credentials",
            Category::Keys => "keys",
            Category::Config => "config",
            Category::Data => "data",
            Category::Custom => "custom",
        }
    }

    /// Pick a section from the last path segment of `pattern`.
    pub fn of(pattern: &str) -> Self {
        let name = pattern
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(pattern)
            .to_lowercase();

        let ext = extension_of(&name);

        if KEY_NAMES.contains(&name.as_str())
            || ext.is_some_and(|e| SENSITIVE_EXTENSIONS.contains(&e))
            || (name.starts_with("id_") && !name.ends_with(".pub"))
            || name.contains("private_key")
            || name.contains("privatekey")
            || name.starts_with("serviceaccountkey")
        {
            return Category::Keys;
        }

        if CREDENTIAL_NAMES.contains(&name.as_str())
            || name.contains("credential")
            || name.contains("passw")
        {
            return Category::Credentials;
        }

        if is_env_file(&name) || SECRET_KEYWORDS.iter().any(|k| name.contains(k)) {
            return Category::Secrets;
        }

        if ext.is_some_and(|e| DATA_EXTENSIONS.contains(&e))
            || name.ends_with("_history")
            || name == "keychain"
        {
            return Category::Data;
        }

        if ext.is_some_and(|e| CONFIG_EXTENSIONS.contains(&e))
            || name.starts_with("config")
            || name.starts_with("settings")
            || (name.starts_with('.') && name.ends_with("rc") && name.len() > 3)
        {
            return Category::Config;
        }

        Category::Custom
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patterns grouped by [`Category`], each group sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    sections: BTreeMap<Category, BTreeSet<String>>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for pattern in patterns {
            list.insert(pattern);
        }
        list
    }

    /// Add a pattern. Blank input is ignored. Returns true if it was new.
    pub fn insert(&mut self, pattern: impl Into<String>) -> bool {
        let pattern = pattern.into().trim().to_string();
        if pattern.is_empty() || self.contains(&pattern) {
            return false;
        }
        self.sections
            .entry(Category::of(&pattern))
            .or_default()
            .insert(pattern)
    }

    pub fn remove(&mut self, pattern: &str) -> bool {
        let category = Category::of(pattern);
        let Some(section) = self.sections.get_mut(&category) else {
            return false;
        };
        let removed = section.remove(pattern);
        if section.is_empty() {
            self.sections.remove(&category);
        }
        removed
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.sections
            .get(&Category::of(pattern))
            .is_some_and(|s| s.contains(pattern))
    }

    pub fn section(&self, category: Category) -> Option<&BTreeSet<String>> {
        self.sections.get(&category)
    }

    /// Categories that hold at least one pattern, in file order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.sections.keys().copied()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.sections.values().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Union with previously written patterns, dropping any old entry that now names
    /// a mounted path.
    pub fn merge_previous<'a>(
        &mut self,
        previous: impl IntoIterator<Item = &'a String>,
        mounted: &[impl AsRef<Path>],
    ) {
        for pattern in previous {
            let stale = mounted.iter().any(|m| Path::new(pattern) == m.as_ref());
            if stale {
                tracing::debug!("Dropping stale ignore entry {}", pattern);
                continue;
            }
            self.insert(pattern.as_str());
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        for (category, patterns) in &self.sections {
            out.push('\n');
            out.push_str(&format!("# {}\n", category));
            for pattern in patterns {
                out.push_str(pattern);
                out.push('\n');
            }
        }
        out
    }
}

/// Patterns in an ignore file, skipping comments and blank lines.
pub fn parse(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
