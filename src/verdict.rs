//! Binary decision plus confidence, as shown to the user.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_phishing: bool,
    pub confidence: Confidence,
    pub whitelisted: bool,
}

impl Verdict {
    /// Trusted domain: safe with high confidence, classifier not consulted.
    pub fn whitelisted() -> Self {
        Self {
            is_phishing: false,
            confidence: Confidence::High,
            whitelisted: true,
        }
    }

    /// Model answer: a phishing label is reported with high confidence, anything else low.
    pub fn from_prediction(is_phishing: bool) -> Self {
        Self {
            is_phishing,
            confidence: if is_phishing {
                Confidence::High
            } else {
                Confidence::Low
            },
            whitelisted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_follows_prediction() {
        assert_eq!(Verdict::from_prediction(true).confidence, Confidence::High);
        assert_eq!(Verdict::from_prediction(false).confidence, Confidence::Low);
        assert!(!Verdict::from_prediction(true).whitelisted);
    }

    #[test]
    fn serializes_like_the_extension() {
        let json = serde_json::to_string(&Verdict::whitelisted()).unwrap();
        assert_eq!(json, r#"{"isPhishing":false,"confidence":"High","whitelisted":true}"#);
    }
}
