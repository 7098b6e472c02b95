//! phishguard entrypoint: checks each URL given on the command line (or one per stdin
//! line) and prints one JSON report per URL. `--page <file>` attaches a saved HTML
//! snapshot to the URL that follows it.

use phishguard::{
    checker::{normalize_url, CheckRequest, Checker},
    config::CheckerConfig,
    features::{try_extract_page_features, PageSnapshot},
    logging::StructuredLogger,
    storage::CounterKey,
};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

fn page_for(url: &str, path: &Path) -> Option<phishguard::PageFeatures> {
    let html = match std::fs::read_to_string(path) {
        Ok(h) => h,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read page snapshot");
            return None;
        }
    };
    match PageSnapshot::parse(url, &html) {
        Ok(snapshot) => try_extract_page_features(&snapshot),
        Err(e) => {
            warn!(error = %e, "page snapshot rejected");
            None
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Vec<CheckRequest>, String> {
    let mut requests = Vec::new();
    let mut pending_page: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        if arg == "--page" {
            let path = args.next().ok_or("--page needs a file argument")?;
            pending_page = Some(PathBuf::from(path));
            continue;
        }
        let page = pending_page
            .take()
            .and_then(|p| page_for(&normalize_url(&arg), &p));
        requests.push(CheckRequest { url: arg, page });
    }
    if pending_page.is_some() {
        return Err("--page must be followed by a URL".into());
    }
    Ok(requests)
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("PHISHGUARD_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("phishguard.json"));
    let config = CheckerConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    let mut requests = parse_args(std::env::args().skip(1))?;
    if requests.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if !line.trim().is_empty() {
                requests.push(CheckRequest::url_only(line.trim()));
            }
        }
    }
    info!(count = requests.len(), config = ?config_path, "phishguard starting");

    let checker = Checker::from_config(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;
    for (req, result) in requests.iter().zip(checker.check_batch(&requests)) {
        match result {
            Ok(report) => StructuredLogger::emit_json(&report, &mut out)?,
            Err(e) => {
                failures += 1;
                error!(
                    url = %req.url,
                    error = %e,
                    unavailable = e.is_unavailable(),
                    "check failed"
                );
            }
        }
    }

    if let Some(counters) = checker.counters() {
        info!(
            sites_checked = counters.get(CounterKey::SitesChecked)?,
            threats_blocked = counters.get(CounterKey::ThreatsBlocked)?,
            failures,
            "phishguard done"
        );
    }
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
