//! Classifier seam: anything that turns a feature vector into a verdict.

mod remote;
mod response;

pub use remote::RemoteClassifier;
pub use response::{parser_for, MarkerParser, ResponseParser, TableParser, PREDICTION_COLUMN};

use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use crate::features::FeatureVector;
use crate::verdict::Verdict;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::warn;

pub trait Classifier: Send + Sync {
    fn classify(&self, vector: &FeatureVector) -> Result<Verdict, ClassifierError>;
}

/// Fixed answer, no I/O. Used when no endpoint is configured.
#[derive(Debug, Default)]
pub struct StaticClassifier {
    phishing: bool,
    calls: AtomicUsize,
}

impl StaticClassifier {
    pub fn new(phishing: bool) -> Self {
        Self {
            phishing,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of vectors classified so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Classifier for StaticClassifier {
    fn classify(&self, _vector: &FeatureVector) -> Result<Verdict, ClassifierError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(Verdict::from_prediction(self.phishing))
    }
}

/// Remote classifier when an endpoint is configured, otherwise an offline one that never flags.
pub fn from_config(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>, ClassifierError> {
    if config.endpoint.is_none() {
        warn!("no classifier endpoint; verdicts will never flag phishing");
        return Ok(Arc::new(StaticClassifier::new(false)));
    }
    Ok(Arc::new(RemoteClassifier::new(config)?))
}
