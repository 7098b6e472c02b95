//! Remote classifier against a local axum stand-in for the model service.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::post;
use axum::Router;
use phishguard::{
    checker::Checker,
    classifier::{Classifier, RemoteClassifier, TableParser},
    config::{ClassifierConfig, ResponseFormat},
    error::{ClassifierError, ClassifierUnavailableError, ResponseParseError},
    features::{assemble, header_line},
    whitelist::Whitelist,
};
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

const PHISHING_TABLE: &str = r#"<table border="1" class="dataframe">
  <thead><tr><th></th><th>having_IP_Address</th><th>predicted_column</th></tr></thead>
  <tbody><tr><th>0</th><td>1</td><td>1</td></tr></tbody>
</table>"#;

const BENIGN_TABLE: &str = r#"<table border="1" class="dataframe">
  <thead><tr><th></th><th>having_IP_Address</th><th>predicted_column</th></tr></thead>
  <tbody><tr><th>0</th><td>1</td><td>0</td></tr></tbody>
</table>"#;

/// One multipart field as the service received it.
#[derive(Debug, Clone)]
struct Upload {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: &'static str,
    uploads: Arc<Mutex<Vec<Upload>>>,
}

async fn predict(
    State(reply): State<Reply>,
    mut multipart: Multipart,
) -> (StatusCode, Html<&'static str>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let body = field.text().await.unwrap_or_default();
        reply.uploads.lock().unwrap().push(Upload {
            field: name,
            file_name,
            content_type,
            body,
        });
    }
    (reply.status, Html(reply.body))
}

/// `POST /predict` answering with a fixed status and body; lives as long as the value.
struct FakeModel {
    endpoint: String,
    uploads: Arc<Mutex<Vec<Upload>>>,
    _runtime: Runtime,
}

impl FakeModel {
    fn start(status: StatusCode, body: &'static str) -> Self {
        let runtime = Runtime::new().unwrap();
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().route("/predict", post(predict)).with_state(Reply {
            status,
            body,
            uploads: uploads.clone(),
        });
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let endpoint = format!("http://{}/", listener.local_addr().unwrap());
        runtime.spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            endpoint,
            uploads,
            _runtime: runtime,
        }
    }

    fn config(&self, format: ResponseFormat) -> ClassifierConfig {
        ClassifierConfig {
            endpoint: Some(self.endpoint.clone()),
            response_format: format,
            timeout_secs: 5,
            ..ClassifierConfig::default()
        }
    }

    fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[test]
fn uploads_vector_as_csv_file() {
    let model = FakeModel::start(StatusCode::OK, PHISHING_TABLE);
    let classifier = RemoteClassifier::new(&model.config(ResponseFormat::Marker)).unwrap();
    let vector = assemble("http://192.168.1.1/login", None);
    assert!(classifier.classify(&vector).unwrap().is_phishing);

    let uploads = model.uploads();
    assert_eq!(uploads.len(), 1);
    let file = &uploads[0];
    assert_eq!(file.field, "file");
    assert_eq!(file.file_name.as_deref(), Some("check.csv"));
    assert_eq!(file.content_type.as_deref(), Some("text/csv"));
    assert_eq!(file.body, vector.to_csv());
    assert!(file.body.starts_with(&header_line()));
    assert!(!file.body.ends_with('\n'));
}

#[test]
fn table_format_reads_benign_label() {
    let model = FakeModel::start(StatusCode::OK, BENIGN_TABLE);
    let classifier = RemoteClassifier::new(&model.config(ResponseFormat::Table)).unwrap();
    let verdict = classifier.classify(&assemble("http://203.0.113.9/", None)).unwrap();
    assert!(!verdict.is_phishing);
}

#[test]
fn injected_parser_replaces_configured_one() {
    // Marker sniffing would flag this body: the IP cell also reads ">1<".
    let model = FakeModel::start(StatusCode::OK, BENIGN_TABLE);
    let classifier = RemoteClassifier::new(&model.config(ResponseFormat::Marker))
        .unwrap()
        .with_parser(Box::new(TableParser::new(1)));
    let verdict = classifier.classify(&assemble("http://203.0.113.9/", None)).unwrap();
    assert!(!verdict.is_phishing);
}

#[test]
fn injected_parser_errors_surface() {
    let model = FakeModel::start(StatusCode::OK, "<p>model says hi</p>");
    let classifier = RemoteClassifier::new(&model.config(ResponseFormat::Marker))
        .unwrap()
        .with_parser(Box::new(TableParser::new(1)));
    assert!(matches!(
        classifier.classify(&assemble("http://203.0.113.9/", None)),
        Err(ClassifierError::ResponseParse(ResponseParseError::MissingColumn(_)))
    ));
}

#[test]
fn server_error_is_unavailable() {
    let model = FakeModel::start(StatusCode::INTERNAL_SERVER_ERROR, "model offline");
    let classifier: Arc<dyn Classifier> =
        Arc::new(RemoteClassifier::new(&model.config(ResponseFormat::Marker)).unwrap());
    let checker = Checker::new(Arc::new(Whitelist::builtin()), classifier);
    let err = checker.check("http://192.168.1.1/login", None).unwrap_err();
    assert!(err.is_unavailable());
}

#[test]
fn status_error_carries_code_and_body() {
    let model = FakeModel::start(StatusCode::SERVICE_UNAVAILABLE, "warming up");
    let classifier = RemoteClassifier::new(&model.config(ResponseFormat::Marker)).unwrap();
    match classifier.classify(&assemble("http://192.168.1.1/", None)) {
        Err(ClassifierError::Unavailable(ClassifierUnavailableError::Status { status, body })) => {
            assert_eq!(status, 503);
            assert_eq!(body, "warming up");
        }
        other => panic!("unexpected {:?}", other.map(|v| v.is_phishing)),
    }
}

#[test]
fn unreachable_endpoint_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let config = ClassifierConfig {
        endpoint: Some(endpoint),
        timeout_secs: 5,
        ..ClassifierConfig::default()
    };
    let classifier = RemoteClassifier::new(&config).unwrap();
    assert!(matches!(
        classifier.classify(&assemble("http://192.168.1.1/", None)),
        Err(ClassifierError::Unavailable(ClassifierUnavailableError::Transport(_)))
    ));
}
