//! One check end to end: internal-page guard → whitelist → assemble → classify → counters.

use crate::classifier::{self, Classifier};
use crate::config::CheckerConfig;
use crate::error::{CheckError, SetupError};
use crate::features::{assemble, FeatureVector, PageFeatures};
use crate::storage::{CounterKey, CounterStore, MemoryCounters, SqliteCounters};
use crate::verdict::Verdict;
use crate::whitelist::Whitelist;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};
use url::Url;
use uuid::Uuid;

/// Browser-internal schemes that can't be meaningfully checked.
const INTERNAL_PREFIXES: [&str; 5] = [
    "chrome://",
    "chrome-extension://",
    "edge://",
    "moz-extension://",
    "about:",
];

/// One URL plus the page signals a DOM-capable host extracted for it, if any.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub url: String,
    pub page: Option<PageFeatures>,
}

impl CheckRequest {
    pub fn url_only(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            page: None,
        }
    }
}

/// Outcome of one check, ready to hand to the host or log as a JSON line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub id: String,
    pub url: String,
    pub checked_at: DateTime<Utc>,
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Vector sent to the classifier; absent for whitelisted URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
}

pub fn is_internal_page(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    INTERNAL_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Trim and default the scheme to `https` unless the input is already an absolute URL
/// with a host. Scheme case is left as given; the URL parser lowercases it.
pub fn normalize_url(input: &str) -> String {
    let s = input.trim();
    match Url::parse(s) {
        Ok(u) if u.has_host() => s.to_string(),
        _ => format!("https://{}", s),
    }
}

pub struct Checker {
    whitelist: Arc<Whitelist>,
    classifier: Arc<dyn Classifier>,
    counters: Option<Arc<dyn CounterStore>>,
    workers: usize,
}

impl Checker {
    pub fn new(whitelist: Arc<Whitelist>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            whitelist,
            classifier,
            counters: None,
            workers: 1,
        }
    }

    pub fn with_counters(mut self, counters: Arc<dyn CounterStore>) -> Self {
        self.counters = Some(counters);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Wire whitelist, classifier and counters from configuration.
    pub fn from_config(config: &CheckerConfig) -> Result<Self, SetupError> {
        let whitelist = Arc::new(Whitelist::from_config(&config.whitelist));
        let classifier = classifier::from_config(&config.classifier)?;
        let counters: Arc<dyn CounterStore> = match &config.counters.path {
            Some(path) => Arc::new(SqliteCounters::open(path)?),
            None => Arc::new(MemoryCounters::new()),
        };
        info!(
            whitelist = whitelist.len(),
            workers = config.batch.workers,
            "checker ready"
        );
        Ok(Self::new(whitelist, classifier)
            .with_counters(counters)
            .with_workers(config.batch.workers))
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    pub fn counters(&self) -> Option<&Arc<dyn CounterStore>> {
        self.counters.as_ref()
    }

    fn bump(&self, key: CounterKey) {
        if let Some(c) = &self.counters {
            if let Err(e) = c.increment(key) {
                warn!(counter = key.as_str(), error = %e, "counter update failed");
            }
        }
    }

    /// Check one URL. Classifier failures surface as errors so the caller can offer a
    /// retry instead of showing a made-up verdict.
    pub fn check(&self, url: &str, page: Option<&PageFeatures>) -> Result<CheckReport, CheckError> {
        if is_internal_page(url) {
            return Err(CheckError::InternalPage(url.trim().to_string()));
        }
        let url = normalize_url(url);
        let span = info_span!("check", url = %url);
        let _guard = span.enter();

        let (verdict, features) = match self.whitelist.matching_entry(&url) {
            Some(entry) => {
                debug!(entry, "whitelisted");
                (Verdict::whitelisted(), None)
            }
            None => {
                let vector = assemble(&url, page);
                (self.classifier.classify(&vector)?, Some(vector))
            }
        };

        self.bump(CounterKey::SitesChecked);
        if verdict.is_phishing {
            self.bump(CounterKey::ThreatsBlocked);
            info!(confidence = ?verdict.confidence, "phishing detected");
        }

        Ok(CheckReport {
            id: Uuid::new_v4().to_string(),
            url,
            checked_at: Utc::now(),
            verdict,
            features,
        })
    }

    /// Check independent URLs on up to `workers` threads. Results keep input order.
    pub fn check_batch(&self, requests: &[CheckRequest]) -> Vec<Result<CheckReport, CheckError>> {
        if requests.is_empty() {
            return Vec::new();
        }
        let chunk = requests.len().div_ceil(self.workers.min(requests.len()));
        std::thread::scope(|s| {
            let handles: Vec<_> = requests
                .chunks(chunk)
                .map(|part| {
                    s.spawn(move || {
                        part.iter()
                            .map(|r| self.check(&r.url, r.page.as_ref()))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StaticClassifier;
    use crate::features::{FeatureKey, Signal};

    fn checker(phishing: bool) -> (Checker, Arc<StaticClassifier>, Arc<MemoryCounters>) {
        let classifier = Arc::new(StaticClassifier::new(phishing));
        let counters = Arc::new(MemoryCounters::new());
        let c = Checker::new(Arc::new(Whitelist::builtin()), classifier.clone())
            .with_counters(counters.clone());
        (c, classifier, counters)
    }

    #[test]
    fn normalizes_bare_hosts() {
        assert_eq!(normalize_url(" example.com/x "), "https://example.com/x");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("httpbin.org/get"), "https://httpbin.org/get");
        assert_eq!(normalize_url("localhost:8080/x"), "https://localhost:8080/x");
        assert_eq!(normalize_url("HTTPS://www.google.com/"), "HTTPS://www.google.com/");
    }

    #[test]
    fn bare_host_starting_with_http_keeps_url_signals() {
        let (c, classifier, _) = checker(false);
        let r = c.check("https-paypal-login.com/signin", None).unwrap();
        assert_eq!(r.url, "https://https-paypal-login.com/signin");
        let v = r.features.unwrap();
        assert_eq!(v.get(FeatureKey::PrefixSuffix), Signal::Suspicious);
        assert_eq!(v.get(FeatureKey::HttpsToken), Signal::Suspicious);
        assert_eq!(v.get(FeatureKey::SslFinalState), Signal::Neutral);
        assert_eq!(classifier.calls(), 1);
    }

    #[test]
    fn uppercase_scheme_still_whitelisted() {
        let (c, classifier, _) = checker(true);
        let r = c.check("HTTPS://www.google.com/", None).unwrap();
        assert_eq!(r.verdict, Verdict::whitelisted());
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn internal_pages_rejected() {
        let (c, classifier, _) = checker(true);
        assert!(matches!(c.check("chrome://settings", None), Err(CheckError::InternalPage(_))));
        assert!(matches!(c.check("about:blank", None), Err(CheckError::InternalPage(_))));
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn whitelisted_skips_classifier() {
        let (c, classifier, counters) = checker(true);
        let r = c.check("https://www.google.com/search?q=test", None).unwrap();
        assert_eq!(r.verdict, Verdict::whitelisted());
        assert!(r.features.is_none());
        assert_eq!(classifier.calls(), 0);
        assert_eq!(counters.get(CounterKey::SitesChecked).unwrap(), 1);
        assert_eq!(counters.get(CounterKey::ThreatsBlocked).unwrap(), 0);
    }

    #[test]
    fn phishing_verdict_bumps_both_counters() {
        let (c, classifier, counters) = checker(true);
        let r = c.check("http://192.168.1.1/login", None).unwrap();
        assert!(r.verdict.is_phishing);
        assert_eq!(classifier.calls(), 1);
        assert_eq!(counters.get(CounterKey::SitesChecked).unwrap(), 1);
        assert_eq!(counters.get(CounterKey::ThreatsBlocked).unwrap(), 1);
    }

    #[test]
    fn batch_preserves_order() {
        let (c, classifier, _) = checker(false);
        let c = c.with_workers(3);
        let reqs: Vec<CheckRequest> = (0..10)
            .map(|i| CheckRequest::url_only(format!("http://host{}.example.net/", i)))
            .chain(std::iter::once(CheckRequest::url_only("chrome://newtab")))
            .collect();
        let out = c.check_batch(&reqs);
        assert_eq!(out.len(), 11);
        for (i, r) in out.iter().take(10).enumerate() {
            assert_eq!(r.as_ref().unwrap().url, format!("http://host{}.example.net/", i));
        }
        assert!(out[10].is_err());
        assert_eq!(classifier.calls(), 10);
    }
}
