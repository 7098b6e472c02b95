//! Turning the classifier's response body into a phishing / not-phishing label.
//!
//! The service renders its prediction as an HTML table with no documented schema.
//! [`MarkerParser`] reproduces the extension's substring check; [`TableParser`] reads the
//! predicted cell out of the table and is the one to prefer once the format is pinned down.

use crate::config::{ClassifierConfig, ResponseFormat};
use crate::error::ResponseParseError;
use scraper::{Html, Selector};
use std::sync::OnceLock;

pub const PREDICTION_COLUMN: &str = "predicted_column";

struct TableSelectors {
    header_row: Selector,
    body_row: Selector,
    cells: Selector,
}

static TABLE_SELECTORS: OnceLock<TableSelectors> = OnceLock::new();

fn table_selectors() -> &'static TableSelectors {
    TABLE_SELECTORS.get_or_init(|| {
        let sel = |css: &str| Selector::parse(css).expect("static selector");
        TableSelectors {
            header_row: sel("thead tr"),
            body_row: sel("tbody tr"),
            cells: sel("th, td"),
        }
    })
}

pub trait ResponseParser: Send + Sync {
    /// `Ok(true)` when the response says the phishing label was predicted.
    fn parse(&self, body: &str) -> Result<bool, ResponseParseError>;
}

/// Phishing iff the body mentions the prediction column and contains `>{label}<`.
#[derive(Debug, Clone)]
pub struct MarkerParser {
    marker: String,
    strict: bool,
}

impl MarkerParser {
    pub fn new(phishing_label: i64, strict: bool) -> Self {
        Self {
            marker: format!(">{}<", phishing_label),
            strict,
        }
    }
}

impl Default for MarkerParser {
    fn default() -> Self {
        Self::new(1, false)
    }
}

impl ResponseParser for MarkerParser {
    fn parse(&self, body: &str) -> Result<bool, ResponseParseError> {
        let has_column = body.contains(PREDICTION_COLUMN);
        if !has_column && self.strict {
            return Err(ResponseParseError::MissingMarker);
        }
        Ok(has_column && body.contains(&self.marker))
    }
}

#[derive(Debug, Clone)]
pub struct TableParser {
    column: String,
    phishing_label: i64,
}

impl TableParser {
    pub fn new(phishing_label: i64) -> Self {
        Self {
            column: PREDICTION_COLUMN.to_string(),
            phishing_label,
        }
    }
}

fn parse_label(cell: &str) -> Option<i64> {
    cell.parse::<i64>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn cell_texts(row: scraper::ElementRef<'_>, cells: &Selector) -> Vec<String> {
    row.select(cells)
        .map(|c| c.text().collect::<String>().trim().to_string())
        .collect()
}

impl ResponseParser for TableParser {
    fn parse(&self, body: &str) -> Result<bool, ResponseParseError> {
        let doc = Html::parse_document(body);
        let s = table_selectors();

        let column = doc
            .select(&s.header_row)
            .next()
            .map(|r| cell_texts(r, &s.cells))
            .and_then(|h| h.iter().position(|c| *c == self.column))
            .ok_or_else(|| ResponseParseError::MissingColumn(self.column.clone()))?;

        let row = doc
            .select(&s.body_row)
            .next()
            .map(|r| cell_texts(r, &s.cells))
            .ok_or(ResponseParseError::MissingRow)?;
        let cell = row.get(column).ok_or(ResponseParseError::MissingRow)?;
        let label = parse_label(cell)
            .ok_or_else(|| ResponseParseError::InvalidPrediction(cell.clone()))?;
        Ok(label == self.phishing_label)
    }
}

/// Parser selected by configuration.
pub fn parser_for(config: &ClassifierConfig) -> Box<dyn ResponseParser> {
    match config.response_format {
        ResponseFormat::Marker => Box::new(MarkerParser::new(
            config.phishing_label,
            config.strict_response,
        )),
        ResponseFormat::Table => Box::new(TableParser::new(config.phishing_label)),
    }
}
