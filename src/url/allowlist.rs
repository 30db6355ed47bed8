use std::collections::HashSet;
use url::Url;

use super::extract_host;

/// The set of hosts a crawl is permitted to fetch from
///
/// Always contains the root address's own host; additional hosts come from
/// configuration. Membership is by exact, lowercase host comparison. Links
/// whose host is outside the set are dropped before a fetch is issued; they
/// are never recorded as broken, since the crawl never attempts them.
#[derive(Debug, Clone)]
pub struct Allowlist {
    hosts: HashSet<String>,
}

impl Allowlist {
    /// Builds an allow-list from the root URL plus extra domains
    pub fn new(root: &Url, extra: &[String]) -> Self {
        let mut hosts: HashSet<String> = extra.iter().map(|d| d.trim().to_lowercase()).collect();
        hosts.retain(|h| !h.is_empty());

        if let Some(host) = extract_host(root) {
            hosts.insert(host);
        }

        Self { hosts }
    }

    /// Returns true if the URL's host is a member of the allow-list
    pub fn permits(&self, url: &Url) -> bool {
        match extract_host(url) {
            Some(host) => self.hosts.contains(&host),
            None => false,
        }
    }

    /// Number of allowed hosts
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
