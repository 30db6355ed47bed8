//! Concurrent site crawling
//!
//! Submodules split the work into fetching, HTML extraction, content
//! deduplication, tree assembly, and session bookkeeping; the coordinator
//! ties them together. [`Crawler`] and [`CrawlHandle`] are the public
//! entry points.

mod coordinator;
mod dedup;
mod extractor;
mod fetcher;
mod session;
mod tree;

pub use coordinator::{CrawlHandle, Crawler};
pub use extractor::AssetMap;
pub use fetcher::FetchError;
pub use session::{CrawlEvent, PageSnapshot};
pub use tree::PageNode;
