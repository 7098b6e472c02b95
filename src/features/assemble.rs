//! Merge URL and page signals into the canonical 30-key vector.

use super::{extract_url_features, FeatureKey, FeatureVector, PageFeatures};
use crate::error::MalformedUrlError;
use tracing::debug;

/// Build the full vector. Never fails: a malformed URL leaves every URL key at -1 and
/// missing page signals stay at -1.
pub fn assemble(url: &str, page: Option<&PageFeatures>) -> FeatureVector {
    let (vector, err) = assemble_checked(url, page);
    if let Some(e) = err {
        debug!(error = %e, "URL features unavailable; using defaults");
    }
    vector
}

/// Same as [`assemble`], also returning the URL parse error when there was one, so
/// callers can tell "no URL signal" apart from measured -1 values.
pub fn assemble_checked(
    url: &str,
    page: Option<&PageFeatures>,
) -> (FeatureVector, Option<MalformedUrlError>) {
    let (mut vector, err) = match extract_url_features(url) {
        Ok(f) => (f.into_vector(), None),
        Err(e) => (FeatureVector::new(), Some(e)),
    };
    if let Some(pf) = page {
        for key in FeatureKey::PAGE {
            if let Some(v) = pf.get(key) {
                vector.set(key, v);
            }
        }
    }
    (vector, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Signal, FEATURE_COUNT};

    #[test]
    fn malformed_url_and_no_page_yields_all_defaults() {
        let (v, err) = assemble_checked("::::", None);
        assert!(err.is_some());
        assert_eq!(v.iter().count(), FEATURE_COUNT);
        assert_eq!(v, FeatureVector::new());
    }

    #[test]
    fn keys_always_in_schema_order() {
        for input in ["https://example.com", "", "http://192.168.1.1/login"] {
            let keys: Vec<FeatureKey> = assemble(input, None).iter().map(|(k, _)| k).collect();
            assert_eq!(keys, FeatureKey::ALL.to_vec());
        }
    }

    #[test]
    fn page_signals_override_defaults_only_where_present() {
        let mut pf = PageFeatures::new();
        pf.insert(FeatureKey::Iframe, Signal::Suspicious).unwrap();
        pf.insert(FeatureKey::Sfh, Signal::Neutral).unwrap();
        let v = assemble("http://192.168.1.1/login", Some(&pf));
        assert_eq!(v.get(FeatureKey::Iframe), Signal::Suspicious);
        assert_eq!(v.get(FeatureKey::Sfh), Signal::Neutral);
        assert_eq!(v.get(FeatureKey::Favicon), Signal::Benign);
        assert_eq!(v.get(FeatureKey::HavingIpAddress), Signal::Suspicious);
        assert_eq!(v.get(FeatureKey::SslFinalState), Signal::Suspicious);
    }

    #[test]
    fn page_signals_survive_malformed_url() {
        let mut pf = PageFeatures::new();
        pf.insert(FeatureKey::Redirect, Signal::Suspicious).unwrap();
        let v = assemble("not a url", Some(&pf));
        assert_eq!(v.get(FeatureKey::Redirect), Signal::Suspicious);
        assert_eq!(v.get(FeatureKey::UrlLength), Signal::Benign);
    }
}
