//! HTTP client for the model-serving endpoint: uploads the vector as a one-row CSV
//! file and reads the predicted label out of the response.

use super::response::{parser_for, ResponseParser};
use super::Classifier;
use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, ClassifierUnavailableError};
use crate::features::FeatureVector;
use crate::verdict::Verdict;
use reqwest::blocking::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct RemoteClassifier {
    client: reqwest::blocking::Client,
    predict_url: String,
    file_name: String,
    parser: Box<dyn ResponseParser>,
}

impl RemoteClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| ClassifierError::Client("no classifier endpoint configured".into()))?
            .trim_end_matches('/');
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Client(e.to_string()))?;
        Ok(Self {
            client,
            predict_url: format!("{}{}", endpoint, config.predict_path),
            file_name: config.upload_file_name.clone(),
            parser: parser_for(config),
        })
    }

    /// Swap the response parser, e.g. once the service documents a structured format.
    pub fn with_parser(mut self, parser: Box<dyn ResponseParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    fn upload(&self, csv: String) -> Result<String, ClassifierUnavailableError> {
        let part = Part::bytes(csv.into_bytes())
            .file_name(self.file_name.clone())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);
        let res = self.client.post(&self.predict_url).multipart(form).send()?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(ClassifierUnavailableError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res.text()?)
    }
}

impl Classifier for RemoteClassifier {
    fn classify(&self, vector: &FeatureVector) -> Result<Verdict, ClassifierError> {
        debug!(url = %self.predict_url, row = %vector.data_line(), "classifier request");
        let body = self.upload(vector.to_csv()).map_err(|e| {
            warn!(url = %self.predict_url, error = %e, "classifier unavailable");
            e
        })?;
        let is_phishing = self.parser.parse(&body)?;
        info!(is_phishing, "classifier verdict");
        Ok(Verdict::from_prediction(is_phishing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_required() {
        let config = ClassifierConfig {
            endpoint: None,
            ..ClassifierConfig::default()
        };
        assert!(matches!(RemoteClassifier::new(&config), Err(ClassifierError::Client(_))));
    }

    #[test]
    fn predict_url_joins_without_double_slash() {
        let config = ClassifierConfig {
            endpoint: Some("http://127.0.0.1:9/".into()),
            ..ClassifierConfig::default()
        };
        let c = RemoteClassifier::new(&config).unwrap();
        assert_eq!(c.predict_url(), "http://127.0.0.1:9/predict");
    }
}
