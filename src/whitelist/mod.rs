//! Trusted-domain whitelist: exact or dot-suffix hostname match, no wildcards.

mod domains;

pub use domains::BUILTIN_DOMAINS;

use crate::config::WhitelistConfig;
use std::collections::HashSet;
use tracing::warn;
use url::Url;

/// Immutable after construction; share behind `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    domains: HashSet<String>,
}

fn normalize_entry(raw: &str) -> Option<String> {
    let d = raw.trim().trim_end_matches('.').to_ascii_lowercase();
    let bare = !d.is_empty() && !d.contains(|c: char| c == '/' || c == ':' || c.is_whitespace());
    bare.then_some(d)
}

impl Whitelist {
    /// Build from bare domain strings. Entries with a scheme, port, path or whitespace are
    /// dropped with a warning.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut domains = HashSet::new();
        for e in entries {
            match normalize_entry(e.as_ref()) {
                Some(d) => {
                    domains.insert(d);
                }
                None => warn!(
                    entry = e.as_ref(),
                    "ignoring whitelist entry that is not a bare domain"
                ),
            }
        }
        Self { domains }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_DOMAINS.iter())
    }

    pub fn from_config(config: &WhitelistConfig) -> Self {
        let builtin: &[&str] = if config.builtin { BUILTIN_DOMAINS } else { &[] };
        Self::new(
            builtin
                .iter()
                .map(|s| s.to_string())
                .chain(config.extra_domains.iter().cloned()),
        )
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains.contains(&domain.to_ascii_lowercase())
    }

    /// The entry a URL's host matched, walking from the full host up through its
    /// parent domains. `None` when nothing matches or the URL does not parse.
    pub fn matching_entry(&self, url: &str) -> Option<&str> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        let mut candidate = host.as_str();
        loop {
            if let Some(d) = self.domains.get(candidate) {
                return Some(d.as_str());
            }
            let (_, parent) = candidate.split_once('.')?;
            candidate = parent;
        }
    }

    /// True when the host equals an entry or ends with `"." + entry`. Fails closed.
    pub fn is_whitelisted(&self, url: &str) -> bool {
        self.matching_entry(url).is_some()
    }
}
