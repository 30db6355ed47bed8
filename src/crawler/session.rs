//! Crawl session accounting and the progress stream
//!
//! One `Session` lives for the duration of a crawl. It tracks how many fetch
//! tasks are outstanding and owns the sending half of the progress channel.
//! The counter, the closed flag, and the sender sit behind a single mutex:
//! an emission checks the flag and sends inside the same critical section
//! that closure uses, so no event can ever race past the close.

use std::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Condensed view of a page, delivered while the crawl is in progress
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub link_count: usize,
}

/// One unit of streamed crawl output
///
/// Either a completed page or a fetch failure, never both. Events arrive in
/// completion order, which is not deterministic across runs.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    Page(PageSnapshot),
    Failure { url: String, error: String },
}

#[derive(Debug)]
struct SessionInner {
    outstanding: usize,
    closed: bool,
    events: Option<UnboundedSender<CrawlEvent>>,
}

/// Shared per-crawl state: outstanding-task counter plus progress sender
#[derive(Debug)]
pub struct Session {
    inner: Mutex<SessionInner>,
}

impl Session {
    /// Creates a session and the receiving half of its progress stream
    pub fn new() -> (Self, UnboundedReceiver<CrawlEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            inner: Mutex::new(SessionInner {
                outstanding: 0,
                closed: false,
                events: Some(tx),
            }),
        };
        (session, rx)
    }

    /// Accounts for a fetch task about to be dispatched
    ///
    /// Must be called before the task is spawned, so the counter can never
    /// observe zero while work remains queued.
    pub fn task_started(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.outstanding += 1;
    }

    /// Emits a progress event unless the stream has already closed
    pub fn emit(&self, event: CrawlEvent) {
        let inner = self.inner.lock().unwrap();
        if inner.closed {
            return;
        }
        if let Some(tx) = &inner.events {
            // Receiver may have been dropped by an uninterested caller
            let _ = tx.send(event);
        }
    }

    /// Accounts for a completed fetch task, closing the stream at zero
    ///
    /// Closing drops the sender, which ends the receiver's drain loop. The
    /// transition happens exactly once.
    pub fn task_finished(&self) {
        let mut inner = self.inner.lock().unwrap();
        debug_assert!(inner.outstanding > 0, "task_finished without task_started");
        inner.outstanding = inner.outstanding.saturating_sub(1);

        if inner.outstanding == 0 && !inner.closed {
            inner.closed = true;
            inner.events.take();
        }
    }

    /// Number of dispatched but not yet completed fetch tasks
    pub fn outstanding(&self) -> usize {
        self.inner.lock().unwrap().outstanding
    }

    /// True once the progress stream has been closed
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    #[test]
    fn test_stream_closes_when_counter_reaches_zero() {
        let (session, mut rx) = Session::new();

        session.task_started();
        session.task_started();
        assert_eq!(session.outstanding(), 2);

        session.task_finished();
        assert!(!session.is_closed());

        session.task_finished();
        assert!(session.is_closed());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn test_events_delivered_before_close() {
        let (session, mut rx) = Session::new();
        session.task_started();

        session.emit(CrawlEvent::Page(PageSnapshot {
            url: "https://a/".to_string(),
            title: "a".to_string(),
            link_count: 0,
        }));
        session.task_finished();

        match rx.try_recv() {
            Ok(CrawlEvent::Page(snapshot)) => assert_eq!(snapshot.url, "https://a/"),
            other => panic!("expected page event, got {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn test_no_event_after_close() {
        let (session, mut rx) = Session::new();
        session.task_started();
        session.task_finished();
        assert!(session.is_closed());

        session.emit(CrawlEvent::Failure {
            url: "https://a/".to_string(),
            error: "late".to_string(),
        });

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn test_emit_survives_dropped_receiver() {
        let (session, rx) = Session::new();
        session.task_started();
        drop(rx);

        session.emit(CrawlEvent::Failure {
            url: "https://a/".to_string(),
            error: "nobody listening".to_string(),
        });
        session.task_finished();
    }
}
