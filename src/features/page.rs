//! DOM-derived signals. Each compares the page's own host with the hosts of the
//! resources, links and form targets the document references.

use super::{FeatureKey, PageFeatures, Signal};
use crate::error::PageExtractionError;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::warn;
use url::Url;

/// (low, high) cut points for the external-resource ratios.
const REQUEST_URL_CUTS: (f64, f64) = (0.22, 0.61);
const ANCHOR_CUTS: (f64, f64) = (0.31, 0.67);
const LINKS_IN_TAGS_CUTS: (f64, f64) = (0.17, 0.81);

struct Selectors {
    favicon: Selector,
    media: Selector,
    anchor: Selector,
    tag_links: Selector,
    form: Selector,
    meta: Selector,
    script: Selector,
    iframe: Selector,
    root_handlers: Selector,
}

static SELECTORS: OnceLock<Selectors> = OnceLock::new();

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

fn selectors() -> &'static Selectors {
    SELECTORS.get_or_init(|| Selectors {
        favicon: sel(r#"link[rel*="icon"]"#),
        media: sel("img, video, audio"),
        anchor: sel("a"),
        tag_links: sel("meta, script[src], link[href]"),
        form: sel("form"),
        meta: sel("meta[http-equiv]"),
        script: sel("script"),
        iframe: sel("iframe"),
        root_handlers: sel("html[oncontextmenu], body[oncontextmenu]"),
    })
}

/// A page URL with its parsed document, as handed over by a DOM-capable host.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: Url,
    pub document: Html,
}

impl PageSnapshot {
    pub fn new(url: Url, document: Html) -> Self {
        Self { url, document }
    }

    /// Parse `html` as the document served at `url`.
    pub fn parse(url: &str, html: &str) -> Result<Self, PageExtractionError> {
        let url = Url::parse(url).map_err(|source| PageExtractionError::InvalidPageUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self::new(url, Html::parse_document(html)))
    }
}

/// Host a reference points at after resolving against the page URL.
/// `None` when the reference cannot be resolved at all.
fn resolved_host(base: &Url, reference: &str) -> Option<Option<String>> {
    base.join(reference)
        .ok()
        .map(|u| u.host_str().map(str::to_string))
}

fn is_foreign(base: &Url, page_host: &str, reference: &str) -> Option<bool> {
    resolved_host(base, reference).map(|h| h.as_deref() != Some(page_host))
}

fn non_empty<'a>(el: &ElementRef<'a>, attr: &str) -> Option<&'a str> {
    el.value().attr(attr).filter(|v| !v.is_empty())
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Three-way bucket as deployed: the `high` test runs after `low`, so with
/// `high > low` the neutral bucket is never produced.
fn bucket(ratio: f64, (low, high): (f64, f64)) -> Signal {
    if ratio > low {
        Signal::Suspicious
    } else if ratio > high {
        Signal::Neutral
    } else {
        Signal::Benign
    }
}

fn compact_lower(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn blocks_context_menu(handler: &str) -> bool {
    let h = compact_lower(handler);
    h.contains("returnfalse") || h.contains("preventdefault")
}

fn script_blocks_context_menu(script: &str) -> bool {
    let s = compact_lower(script);
    s.contains("document.oncontextmenu=")
        || s.contains("window.oncontextmenu=")
        || ((s.contains("addeventlistener('contextmenu'")
            || s.contains("addeventlistener(\"contextmenu\""))
            && s.contains("preventdefault"))
}

fn favicon_signal(
    doc: &Html,
    base: &Url,
    host: &str,
) -> Result<Signal, PageExtractionError> {
    let Some(link) = doc.select(&selectors().favicon).next() else {
        return Ok(Signal::Suspicious);
    };
    let href = link.value().attr("href").unwrap_or_default();
    match is_foreign(base, host, href) {
        Some(foreign) => Ok(Signal::flag(foreign)),
        None => Err(PageExtractionError::UnresolvableFavicon {
            href: href.to_string(),
        }),
    }
}

fn request_url_signal(doc: &Html, base: &Url, host: &str) -> Signal {
    let mut total = 0;
    let mut external = 0;
    for el in doc.select(&selectors().media) {
        total += 1;
        let src = el.value().attr("src").unwrap_or_default();
        if is_foreign(base, host, src) == Some(true) {
            external += 1;
        }
    }
    bucket(ratio(external, total), REQUEST_URL_CUTS)
}

fn anchor_signal(doc: &Html, base: &Url, host: &str) -> Signal {
    let mut total = 0;
    let mut suspicious = 0;
    for a in doc.select(&selectors().anchor) {
        total += 1;
        let flagged = match non_empty(&a, "href") {
            None | Some("#") => true,
            Some(href) if href.starts_with("javascript:") => true,
            Some(href) => is_foreign(base, host, href) == Some(true),
        };
        if flagged {
            suspicious += 1;
        }
    }
    bucket(ratio(suspicious, total), ANCHOR_CUTS)
}

fn links_in_tags_signal(doc: &Html, base: &Url, host: &str) -> Signal {
    let mut total = 0;
    let mut external = 0;
    for tag in doc.select(&selectors().tag_links) {
        total += 1;
        let reference = non_empty(&tag, "src")
            .or_else(|| non_empty(&tag, "href"))
            .or_else(|| {
                (tag.value().name() == "meta")
                    .then(|| non_empty(&tag, "content"))
                    .flatten()
            });
        if let Some(r) = reference {
            if is_foreign(base, host, r) == Some(true) {
                external += 1;
            }
        }
    }
    bucket(ratio(external, total), LINKS_IN_TAGS_CUTS)
}

fn form_signals(doc: &Html, base: &Url, host: &str) -> (Signal, Signal) {
    let mut suspicious_form = false;
    let mut mails = false;
    for form in doc.select(&selectors().form) {
        let action = form.value().attr("action");
        if action.is_some_and(|a| a.starts_with("mailto:")) {
            mails = true;
        }
        let flagged = match action {
            None | Some("") | Some("about:blank") => true,
            Some(a) => is_foreign(base, host, a).unwrap_or(true),
        };
        suspicious_form |= flagged;
    }
    (Signal::flag(suspicious_form), Signal::flag(mails))
}

fn redirect_signal(doc: &Html) -> Signal {
    Signal::flag(doc.select(&selectors().meta).any(|m| {
        m.value()
            .attr("http-equiv")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
    }))
}

fn mouseover_signal(doc: &Html) -> Signal {
    Signal::flag(doc.select(&selectors().anchor).any(|a| {
        non_empty(&a, "onmouseover")
            .or_else(|| non_empty(&a, "onmouseout"))
            .is_some_and(|h| h.contains("window.status") || h.contains("location"))
    }))
}

fn script_texts(doc: &Html) -> impl Iterator<Item = String> + '_ {
    doc.select(&selectors().script).map(|s| s.text().collect::<String>())
}

fn right_click_signal(doc: &Html) -> Signal {
    let by_attr = doc.select(&selectors().root_handlers).any(|el| {
        el.value()
            .attr("oncontextmenu")
            .is_some_and(blocks_context_menu)
    });
    Signal::flag(by_attr || script_texts(doc).any(|s| script_blocks_context_menu(&s)))
}

fn popup_signal(doc: &Html) -> Signal {
    Signal::flag(script_texts(doc).any(|s| s.contains("window.open") || s.contains("popup")))
}

fn iframe_signal(doc: &Html) -> Signal {
    Signal::flag(doc.select(&selectors().iframe).next().is_some())
}

/// Inspect the snapshot and derive all 11 page signals. Fails as a whole rather than
/// returning a partial map.
pub fn extract_page_features(page: &PageSnapshot) -> Result<PageFeatures, PageExtractionError> {
    let base = &page.url;
    let host = base
        .host_str()
        .ok_or_else(|| PageExtractionError::MissingHost(base.to_string()))?;
    let doc = &page.document;

    let mut pf = PageFeatures::new();
    pf.put(FeatureKey::Favicon, favicon_signal(doc, base, host)?);
    pf.put(FeatureKey::RequestUrl, request_url_signal(doc, base, host));
    pf.put(FeatureKey::UrlOfAnchor, anchor_signal(doc, base, host));
    pf.put(FeatureKey::LinksInTags, links_in_tags_signal(doc, base, host));
    let (sfh, email) = form_signals(doc, base, host);
    pf.put(FeatureKey::Sfh, sfh);
    pf.put(FeatureKey::SubmittingToEmail, email);
    pf.put(FeatureKey::Redirect, redirect_signal(doc));
    pf.put(FeatureKey::OnMouseover, mouseover_signal(doc));
    pf.put(FeatureKey::RightClick, right_click_signal(doc));
    pf.put(FeatureKey::PopUpWidnow, popup_signal(doc));
    pf.put(FeatureKey::Iframe, iframe_signal(doc));
    Ok(pf)
}

/// Like [`extract_page_features`], but a failure is logged and means "no page signal".
pub fn try_extract_page_features(page: &PageSnapshot) -> Option<PageFeatures> {
    match extract_page_features(page) {
        Ok(pf) => Some(pf),
        Err(e) => {
            warn!(url = %page.url, error = %e, "page feature extraction failed");
            None
        }
    }
}
