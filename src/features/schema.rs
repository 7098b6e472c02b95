//! Training schema: the 30 feature keys in the exact column order the model was fit on.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FEATURE_COUNT: usize = 30;
pub const PAGE_FEATURE_COUNT: usize = 11;

/// Ternary signal value. `-1` doubles as the "unknown" marker when a signal can't be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i8")]
pub enum Signal {
    #[default]
    Benign,
    Neutral,
    Suspicious,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Benign => -1,
            Signal::Neutral => 0,
            Signal::Suspicious => 1,
        }
    }

    /// `Suspicious` when `flag` holds, `Benign` otherwise.
    pub fn flag(flag: bool) -> Self {
        if flag {
            Signal::Suspicious
        } else {
            Signal::Benign
        }
    }
}

impl From<Signal> for i8 {
    fn from(s: Signal) -> i8 {
        s.as_i8()
    }
}

impl TryFrom<i64> for Signal {
    type Error = SchemaError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Signal::Benign),
            0 => Ok(Signal::Neutral),
            1 => Ok(Signal::Suspicious),
            other => Err(SchemaError::InvalidValue(other)),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// Where a feature's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSource {
    /// Lexical structure of the URL.
    Url,
    /// Parsed page document.
    Page,
    /// No local signal source; always -1.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum FeatureKey {
    HavingIpAddress,
    UrlLength,
    ShortiningService,
    HavingAtSymbol,
    DoubleSlashRedirecting,
    PrefixSuffix,
    HavingSubDomain,
    SslFinalState,
    DomainRegisterationLength,
    Favicon,
    Port,
    HttpsToken,
    RequestUrl,
    UrlOfAnchor,
    LinksInTags,
    Sfh,
    SubmittingToEmail,
    AbnormalUrl,
    Redirect,
    OnMouseover,
    RightClick,
    PopUpWidnow,
    Iframe,
    AgeOfDomain,
    DnsRecord,
    WebTraffic,
    PageRank,
    GoogleIndex,
    LinksPointingToPage,
    StatisticalReport,
}

impl FeatureKey {
    /// Schema order. Position in this array is the column index.
    pub const ALL: [FeatureKey; FEATURE_COUNT] = [
        FeatureKey::HavingIpAddress,
        FeatureKey::UrlLength,
        FeatureKey::ShortiningService,
        FeatureKey::HavingAtSymbol,
        FeatureKey::DoubleSlashRedirecting,
        FeatureKey::PrefixSuffix,
        FeatureKey::HavingSubDomain,
        FeatureKey::SslFinalState,
        FeatureKey::DomainRegisterationLength,
        FeatureKey::Favicon,
        FeatureKey::Port,
        FeatureKey::HttpsToken,
        FeatureKey::RequestUrl,
        FeatureKey::UrlOfAnchor,
        FeatureKey::LinksInTags,
        FeatureKey::Sfh,
        FeatureKey::SubmittingToEmail,
        FeatureKey::AbnormalUrl,
        FeatureKey::Redirect,
        FeatureKey::OnMouseover,
        FeatureKey::RightClick,
        FeatureKey::PopUpWidnow,
        FeatureKey::Iframe,
        FeatureKey::AgeOfDomain,
        FeatureKey::DnsRecord,
        FeatureKey::WebTraffic,
        FeatureKey::PageRank,
        FeatureKey::GoogleIndex,
        FeatureKey::LinksPointingToPage,
        FeatureKey::StatisticalReport,
    ];

    /// The DOM-derived keys, in schema order.
    pub const PAGE: [FeatureKey; PAGE_FEATURE_COUNT] = [
        FeatureKey::Favicon,
        FeatureKey::RequestUrl,
        FeatureKey::UrlOfAnchor,
        FeatureKey::LinksInTags,
        FeatureKey::Sfh,
        FeatureKey::SubmittingToEmail,
        FeatureKey::Redirect,
        FeatureKey::OnMouseover,
        FeatureKey::RightClick,
        FeatureKey::PopUpWidnow,
        FeatureKey::Iframe,
    ];

    /// Column index in the training schema.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name, spelled exactly as in the training data.
    pub fn name(self) -> &'static str {
        match self {
            FeatureKey::HavingIpAddress => "having_IP_Address",
            FeatureKey::UrlLength => "URL_Length",
            FeatureKey::ShortiningService => "Shortining_Service",
            FeatureKey::HavingAtSymbol => "having_At_Symbol",
            FeatureKey::DoubleSlashRedirecting => "double_slash_redirecting",
            FeatureKey::PrefixSuffix => "Prefix_Suffix",
            FeatureKey::HavingSubDomain => "having_Sub_Domain",
            FeatureKey::SslFinalState => "SSLfinal_State",
            FeatureKey::DomainRegisterationLength => "Domain_registeration_length",
            FeatureKey::Favicon => "Favicon",
            FeatureKey::Port => "port",
            FeatureKey::HttpsToken => "HTTPS_token",
            FeatureKey::RequestUrl => "Request_URL",
            FeatureKey::UrlOfAnchor => "URL_of_Anchor",
            FeatureKey::LinksInTags => "Links_in_tags",
            FeatureKey::Sfh => "SFH",
            FeatureKey::SubmittingToEmail => "Submitting_to_email",
            FeatureKey::AbnormalUrl => "Abnormal_URL",
            FeatureKey::Redirect => "Redirect",
            FeatureKey::OnMouseover => "on_mouseover",
            FeatureKey::RightClick => "RightClick",
            FeatureKey::PopUpWidnow => "popUpWidnow",
            FeatureKey::Iframe => "Iframe",
            FeatureKey::AgeOfDomain => "age_of_domain",
            FeatureKey::DnsRecord => "DNSRecord",
            FeatureKey::WebTraffic => "web_traffic",
            FeatureKey::PageRank => "Page_Rank",
            FeatureKey::GoogleIndex => "Google_Index",
            FeatureKey::LinksPointingToPage => "Links_pointing_to_page",
            FeatureKey::StatisticalReport => "Statistical_report",
        }
    }

    pub fn source(self) -> FeatureSource {
        match self {
            FeatureKey::Favicon
            | FeatureKey::RequestUrl
            | FeatureKey::UrlOfAnchor
            | FeatureKey::LinksInTags
            | FeatureKey::Sfh
            | FeatureKey::SubmittingToEmail
            | FeatureKey::Redirect
            | FeatureKey::OnMouseover
            | FeatureKey::RightClick
            | FeatureKey::PopUpWidnow
            | FeatureKey::Iframe => FeatureSource::Page,
            FeatureKey::DomainRegisterationLength
            | FeatureKey::AbnormalUrl
            | FeatureKey::AgeOfDomain
            | FeatureKey::DnsRecord
            | FeatureKey::WebTraffic
            | FeatureKey::PageRank
            | FeatureKey::GoogleIndex
            | FeatureKey::LinksPointingToPage
            | FeatureKey::StatisticalReport => FeatureSource::Unknown,
            _ => FeatureSource::Url,
        }
    }

    pub fn is_page(self) -> bool {
        self.source() == FeatureSource::Page
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureKey {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureKey::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| SchemaError::UnknownKey(s.to_string()))
    }
}

impl TryFrom<String> for FeatureKey {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FeatureKey> for &'static str {
    fn from(k: FeatureKey) -> &'static str {
        k.name()
    }
}

/// Header line of the CSV upload: all column names in schema order.
pub fn header_line() -> String {
    FeatureKey::ALL
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_order_matches_index() {
        for (i, k) in FeatureKey::ALL.iter().enumerate() {
            assert_eq!(k.index(), i, "{} out of place", k);
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for k in FeatureKey::ALL {
            assert_eq!(k.name().parse::<FeatureKey>().unwrap(), k);
        }
        assert!("having_ip_address".parse::<FeatureKey>().is_err());
    }

    #[test]
    fn source_partition_sizes() {
        let count = |src| FeatureKey::ALL.iter().filter(|k| k.source() == src).count();
        assert_eq!(count(FeatureSource::Url), 10);
        assert_eq!(count(FeatureSource::Page), PAGE_FEATURE_COUNT);
        assert_eq!(count(FeatureSource::Unknown), 9);
        assert!(FeatureKey::PAGE.iter().all(|k| k.is_page()));
    }

    #[test]
    fn header_starts_and_ends_with_schema_edges() {
        let h = header_line();
        assert!(h.starts_with("having_IP_Address,URL_Length,"));
        assert!(h.ends_with(",Statistical_report"));
        assert_eq!(h.split(',').count(), FEATURE_COUNT);
    }

    #[test]
    fn signal_rejects_out_of_range() {
        assert_eq!(Signal::try_from(-1).unwrap(), Signal::Benign);
        assert!(Signal::try_from(2).is_err());
        let s: Signal = serde_json::from_str("0").unwrap();
        assert_eq!(s, Signal::Neutral);
        assert_eq!(serde_json::to_string(&Signal::Suspicious).unwrap(), "1");
    }
}
