//! phishguard — heuristic phishing checks for URLs and page snapshots.
//!
//! Modular structure:
//! - [`whitelist`] — Trusted-domain short-circuit
//! - [`features`] — URL and page signal extraction, fixed-order feature vector
//! - [`classifier`] — Remote model client and response parsing
//! - [`checker`] — End-to-end check and batch scanning
//! - [`storage`] — Sites-checked / threats-blocked counters
//! - [`logging`] — Structured JSON logging

pub mod checker;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod storage;
pub mod verdict;
pub mod whitelist;

pub use checker::{CheckReport, CheckRequest, Checker};
pub use classifier::{Classifier, RemoteClassifier, StaticClassifier};
pub use config::CheckerConfig;
pub use error::{CheckError, ClassifierError, MalformedUrlError, PageExtractionError};
pub use features::{assemble, FeatureKey, FeatureVector, PageFeatures, PageSnapshot, Signal};
pub use logging::StructuredLogger;
pub use storage::{CounterKey, CounterStore};
pub use verdict::{Confidence, Verdict};
pub use whitelist::Whitelist;
