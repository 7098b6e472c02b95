//! URL-only signals: derived from the lexical structure of the URL, no I/O.

use super::{FeatureKey, FeatureVector, Signal};
use crate::error::MalformedUrlError;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Known link-shortener hosts, matched as substrings of the hostname.
pub const SHORTENERS: [&str; 7] = [
    "bit.ly", "goo.gl", "tinyurl", "t.co", "ow.ly", "buff.ly", "adf.ly",
];

const SHORT_URL_MAX: usize = 54;
const LONG_URL_MIN: usize = 76;

static DOTTED_QUAD: OnceLock<Regex> = OnceLock::new();

fn dotted_quad() -> &'static Regex {
    DOTTED_QUAD.get_or_init(|| {
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("dotted-quad pattern")
    })
}

/// The 19 URL-derived and placeholder signals. Page keys are not part of this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlFeatures {
    vector: FeatureVector,
}

impl UrlFeatures {
    /// Value for a URL or placeholder key; `None` for page keys.
    pub fn get(&self, key: FeatureKey) -> Option<Signal> {
        (!key.is_page()).then(|| self.vector.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, Signal)> + '_ {
        self.vector.iter().filter(|(k, _)| !k.is_page())
    }

    /// Full-width vector with page slots at the -1 default.
    pub fn into_vector(self) -> FeatureVector {
        self.vector
    }
}

fn length_signal(len: usize) -> Signal {
    if len < SHORT_URL_MAX {
        Signal::Benign
    } else if len < LONG_URL_MIN {
        Signal::Neutral
    } else {
        Signal::Suspicious
    }
}

fn subdomain_signal(host: &str) -> Signal {
    let extra_labels = host.split('.').count() as isize - 2;
    match extra_labels {
        0 => Signal::Benign,
        1 => Signal::Neutral,
        _ => Signal::Suspicious,
    }
}

fn ssl_signal(https: bool, host: &str) -> Signal {
    let spoofed = host.contains("http") || host.contains("www-");
    match (https, spoofed) {
        (true, false) => Signal::Benign,
        (true, true) => Signal::Neutral,
        (false, _) => Signal::Suspicious,
    }
}

/// Extract the URL-derived signals. Pure: the same input always yields the same output.
pub fn extract_url_features(input: &str) -> Result<UrlFeatures, MalformedUrlError> {
    let parsed = Url::parse(input).map_err(|source| MalformedUrlError {
        input: input.to_string(),
        source,
    })?;
    let host = parsed.host_str().unwrap_or_default();
    let host_lower = host.to_ascii_lowercase();

    let mut v = FeatureVector::new();
    v.set(FeatureKey::HavingIpAddress, Signal::flag(dotted_quad().is_match(host)));
    v.set(FeatureKey::UrlLength, length_signal(input.chars().count()));
    v.set(
        FeatureKey::ShortiningService,
        Signal::flag(SHORTENERS.iter().any(|s| host.contains(s))),
    );
    v.set(FeatureKey::HavingAtSymbol, Signal::flag(input.contains('@')));
    v.set(
        FeatureKey::DoubleSlashRedirecting,
        Signal::flag(parsed.path().contains("//")),
    );
    v.set(FeatureKey::PrefixSuffix, Signal::flag(host.contains('-')));
    v.set(FeatureKey::HavingSubDomain, subdomain_signal(host));
    v.set(FeatureKey::SslFinalState, ssl_signal(parsed.scheme() == "https", host));
    v.set(
        FeatureKey::Port,
        Signal::flag(parsed.port().is_some_and(|p| p != 80 && p != 443)),
    );
    v.set(FeatureKey::HttpsToken, Signal::flag(host_lower.contains("https")));

    Ok(UrlFeatures { vector: v })
}
