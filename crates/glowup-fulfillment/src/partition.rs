//! Eligibility split of order lines, decided before any browser launches.

use url::Url;

use crate::model::OrderItem;

/// Order lines split by whether the supported retailer sells them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub eligible: Vec<OrderItem>,
    pub ineligible: Vec<OrderItem>,
}

impl Partition {
    pub fn split(items: &[OrderItem], domain: &str) -> Self {
        let (eligible, ineligible) = items
            .iter()
            .cloned()
            .partition(|item| is_retailer_url(&item.url, domain));
        Self { eligible, ineligible }
    }

    /// Comma-separated names of the ineligible lines.
    pub fn ineligible_names(&self) -> String {
        self.ineligible
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Whether `url` is an http(s) URL on `domain` or one of its subdomains.
///
/// Matching is on the parsed host, so `ulta.com.evil.net` and
/// `notulta.com` do not qualify for `ulta.com`.
pub fn is_retailer_url(url: &str, domain: &str) -> bool {
    let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }

    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    match parsed.host_str() {
        Some(host) => {
            let host = host.trim_end_matches('.').to_ascii_lowercase();
            host == domain || host.ends_with(&format!(".{}", domain))
        }
        None => false,
    }
}
