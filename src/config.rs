//! Crawl configuration

/// Default ceiling on simultaneous fetches
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Configuration for a single crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The root address to start crawling from
    pub root: String,

    /// Maximum number of hops from the root; `None` means unbounded,
    /// `Some(0)` crawls the root page only
    pub max_depth: Option<u32>,

    /// Extra hosts allowed in addition to the root's own host
    pub domains: Vec<String>,

    /// Ceiling on simultaneous fetches
    pub concurrency: usize,
}

impl CrawlConfig {
    /// Creates a configuration with default depth, domains, and concurrency
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            max_depth: None,
            domains: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_max_depth(mut self, depth: Option<u32>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_domains(mut self, domains: Vec<String>) -> Self {
        self.domains = domains;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("https://example.com/");
        assert_eq!(config.root, "https://example.com/");
        assert_eq!(config.max_depth, None);
        assert!(config.domains.is_empty());
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_builder_chain() {
        let config = CrawlConfig::new("https://example.com/")
            .with_max_depth(Some(2))
            .with_domains(vec!["cdn.example.com".to_string()])
            .with_concurrency(8);

        assert_eq!(config.max_depth, Some(2));
        assert_eq!(config.domains, vec!["cdn.example.com".to_string()]);
        assert_eq!(config.concurrency, 8);
    }
}
