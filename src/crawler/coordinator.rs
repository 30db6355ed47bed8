//! Crawl orchestration
//!
//! The coordinator owns everything a crawl shares across fetch tasks: the
//! HTTP client, the host allowlist, the content fingerprint store, the page
//! tree, and the session that tracks outstanding work. Each discovered link
//! becomes its own spawned task, throttled by a semaphore rather than a
//! worker pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

use crate::config::CrawlConfig;
use crate::crawler::dedup::DedupStore;
use crate::crawler::extractor;
use crate::crawler::fetcher::{self, FetchedPage};
use crate::crawler::session::{CrawlEvent, PageSnapshot, Session};
use crate::crawler::tree::{NodeId, PageData, PageNode, TreeBuilder};
use crate::url::{validate_root, Allowlist};
use crate::{CartaError, Result};

/// Everything shared between the spawned fetch tasks of one crawl
#[derive(Debug)]
struct CrawlState {
    client: reqwest::Client,
    root_url: String,
    allowlist: Allowlist,
    max_depth: Option<u32>,
    semaphore: Arc<Semaphore>,
    dedup: DedupStore,
    tree: TreeBuilder,
    session: Session,
    cancelled: AtomicBool,
    root_failure: Mutex<Option<String>>,
}

impl CrawlState {
    /// True when a page fetched at `depth` may have its links followed
    fn within_depth(&self, depth: u32) -> bool {
        match self.max_depth {
            Some(limit) => depth < limit,
            None => true,
        }
    }
}

/// A single fetch waiting to run: where to go and where the result attaches
struct FetchTask {
    url: Url,
    parent: Option<NodeId>,
    depth: u32,
}

/// A configured crawler, ready to start
#[derive(Debug)]
pub struct Crawler {
    state: Arc<CrawlState>,
    root: Url,
    events: UnboundedReceiver<CrawlEvent>,
}

impl Crawler {
    /// Validates the root URL and assembles the shared crawl state
    ///
    /// Fails early on a root that is not an absolute http(s) URL, before any
    /// network traffic happens.
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let root = validate_root(&config.root)?;
        let allowlist = Allowlist::new(&root, &config.domains);
        let client = fetcher::build_http_client()?;
        let (session, events) = Session::new();

        let state = Arc::new(CrawlState {
            client,
            root_url: root.to_string(),
            allowlist,
            max_depth: config.max_depth,
            semaphore: Arc::new(Semaphore::new(config.concurrency.max(1))),
            dedup: DedupStore::new(),
            tree: TreeBuilder::new(),
            session,
            cancelled: AtomicBool::new(false),
            root_failure: Mutex::new(None),
        });

        Ok(Self { state, root, events })
    }

    /// Dispatches the root fetch and hands back the running crawl
    pub fn start(self) -> CrawlHandle {
        dispatch(
            &self.state,
            FetchTask {
                url: self.root,
                parent: None,
                depth: 0,
            },
        );

        CrawlHandle {
            events: self.events,
            state: self.state,
        }
    }
}

/// Handle on a crawl in flight
///
/// Stream events with [`next_event`](CrawlHandle::next_event) until it
/// returns `None`, then call [`finish`](CrawlHandle::finish) for the
/// assembled tree. `finish` alone also works; it drains silently.
pub struct CrawlHandle {
    events: UnboundedReceiver<CrawlEvent>,
    state: Arc<CrawlState>,
}

impl CrawlHandle {
    /// Next progress event, or `None` once the crawl has completed
    pub async fn next_event(&mut self) -> Option<CrawlEvent> {
        self.events.recv().await
    }

    /// Requests a stop: no further links are followed, in-flight fetches
    /// drain normally
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    /// Waits for all outstanding fetches and returns the finished tree
    pub async fn finish(mut self) -> Result<PageNode> {
        while self.events.recv().await.is_some() {}

        if let Some(message) = self.state.root_failure.lock().unwrap().take() {
            return Err(CartaError::RootFetch {
                url: self.state.root_url.clone(),
                message,
            });
        }

        self.state.tree.root_page().ok_or(CartaError::NoPages)
    }
}

/// Accounts for a task and spawns it
///
/// `task_started` runs before the spawn so the session counter can never hit
/// zero while dispatched work has yet to run.
fn dispatch(state: &Arc<CrawlState>, task: FetchTask) {
    state.session.task_started();
    let state = Arc::clone(state);
    tokio::spawn(run_fetch(state, task));
}

async fn run_fetch(state: Arc<CrawlState>, task: FetchTask) {
    let _permit = match state.semaphore.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            state.session.task_finished();
            return;
        }
    };

    debug!(url = %task.url, depth = task.depth, "fetching");

    match fetcher::fetch_url(&state.client, task.url.as_str()).await {
        Ok(page) => process_page(&state, &task, page),
        Err(err) => {
            warn!(url = %task.url, error = %err, "fetch failed");
            match task.parent {
                Some(parent) => state.tree.record_broken(parent, task.url.as_str()),
                None => {
                    let mut failure = state.root_failure.lock().unwrap();
                    *failure = Some(err.to_string());
                }
            }
            state.session.emit(CrawlEvent::Failure {
                url: task.url.to_string(),
                error: err.to_string(),
            });
        }
    }

    state.session.task_finished();
}

fn process_page(state: &Arc<CrawlState>, task: &FetchTask, page: FetchedPage) {
    let digest = DedupStore::fingerprint(&page.body);
    if !state.dedup.try_record(digest) {
        // Same content already mapped under another URL, drop quietly
        debug!(url = %task.url, "duplicate content, skipping");
        return;
    }

    let html = String::from_utf8_lossy(&page.body);
    let extracted = extractor::extract(&html, &page.final_url);

    let node = state.tree.attach(
        PageData {
            url: task.url.to_string(),
            title: extracted.title.clone(),
            assets: extracted.assets,
            links: extracted.links.clone(),
        },
        task.parent,
    );

    state.session.emit(CrawlEvent::Page(PageSnapshot {
        url: task.url.to_string(),
        title: extracted.title,
        link_count: extracted.links.len(),
    }));

    if !state.within_depth(task.depth) || state.cancelled.load(Ordering::SeqCst) {
        return;
    }

    for link in &extracted.links {
        let Ok(child) = Url::parse(link) else {
            continue;
        };
        if !state.allowlist.permits(&child) {
            continue;
        }
        dispatch(
            state,
            FetchTask {
                url: child,
                parent: Some(node),
                depth: task.depth + 1,
            },
        );
    }
}
