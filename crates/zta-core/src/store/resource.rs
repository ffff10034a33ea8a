// ── Sequenced resource state ──
//
// Holds one remotely-owned value plus its request bookkeeping. Every fetch
// takes a ticket with a monotonically increasing sequence number; a result
// is applied only if its number is higher than the last applied one, so
// overlapping fetches resolve by issue order rather than arrival order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::trace;

/// Everything a presentation layer needs to render one resource.
#[derive(Debug)]
pub struct ResourceView<T> {
    /// Last successfully applied value. `None` until the first success.
    pub data: Option<Arc<T>>,
    /// Requests issued and not yet settled.
    pub in_flight: usize,
    /// Message of the most recent failure. Cleared by the next success.
    pub error: Option<String>,
    /// Wall-clock time of the last applied success.
    pub last_updated: Option<DateTime<Utc>>,
    /// Set after a successful mutation until the next applied fetch.
    pub stale: bool,
    /// Sequence number of the last applied (or superseded) result.
    pub applied_seq: u64,
    /// Remote entries left out of `data` because they did not decode.
    pub skipped: usize,
}

impl<T> ResourceView<T> {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

impl<T> Clone for ResourceView<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            in_flight: self.in_flight,
            error: self.error.clone(),
            last_updated: self.last_updated,
            stale: self.stale,
            applied_seq: self.applied_seq,
            skipped: self.skipped,
        }
    }
}

impl<T> Default for ResourceView<T> {
    fn default() -> Self {
        Self {
            data: None,
            in_flight: 0,
            error: None,
            last_updated: None,
            stale: false,
            applied_seq: 0,
            skipped: 0,
        }
    }
}

/// Owner of one resource's view. Writes go through tickets; reads are
/// cheap clones of the current [`ResourceView`].
pub(crate) struct ResourceState<T: Send + Sync + 'static> {
    issued: AtomicU64,
    /// Last sequence number issued before the most recent mutation. Only
    /// fetches issued after it can clear `stale`.
    stale_after: AtomicU64,
    view: watch::Sender<ResourceView<T>>,
}

impl<T: Send + Sync + 'static> ResourceState<T> {
    pub(crate) fn new() -> Self {
        let (view, _) = watch::channel(ResourceView::default());
        Self {
            issued: AtomicU64::new(0),
            stale_after: AtomicU64::new(0),
            view,
        }
    }

    /// Issue a ticket for a new request and mark it in flight.
    pub(crate) fn begin(&self) -> Ticket<'_, T> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.send_modify(|view| view.in_flight += 1);
        Ticket {
            state: self,
            seq,
            settled: false,
        }
    }

    pub(crate) fn view(&self) -> ResourceView<T> {
        self.view.borrow().clone()
    }

    pub(crate) fn data(&self) -> Option<Arc<T>> {
        self.view.borrow().data.clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ResourceView<T>> {
        self.view.subscribe()
    }

    /// Record a successful mutation: the held value no longer reflects
    /// the gateway until a fetch issued after this call lands.
    pub(crate) fn mark_stale(&self) {
        self.view.send_modify(|view| {
            self.stale_after
                .store(self.issued.load(Ordering::SeqCst), Ordering::SeqCst);
            view.stale = true;
            view.error = None;
        });
    }

    /// Record a failure that is not tied to a fetch ticket.
    pub(crate) fn report_error(&self, message: String) {
        self.view.send_modify(|view| view.error = Some(message));
    }

    /// Supersede every request issued so far. Their results will be
    /// discarded when they arrive.
    pub(crate) fn detach(&self) {
        self.view.send_modify(|view| {
            view.applied_seq = view.applied_seq.max(self.issued.load(Ordering::SeqCst));
        });
    }

    /// Returns `true` if the outcome was applied.
    fn settle(&self, seq: u64, outcome: Option<Result<(Arc<T>, usize), String>>) -> bool {
        let mut applied = false;
        self.view.send_modify(|view| {
            view.in_flight = view.in_flight.saturating_sub(1);

            let Some(outcome) = outcome else {
                return;
            };
            if seq <= view.applied_seq {
                trace!(seq, applied_seq = view.applied_seq, "discarding superseded result");
                return;
            }

            view.applied_seq = seq;
            applied = true;
            match outcome {
                Ok((data, skipped)) => {
                    view.data = Some(data);
                    view.skipped = skipped;
                    view.error = None;
                    if seq > self.stale_after.load(Ordering::SeqCst) {
                        view.stale = false;
                    }
                    view.last_updated = Some(Utc::now());
                }
                Err(message) => view.error = Some(message),
            }
        });
        applied
    }
}

/// One outstanding request. Dropping it unsettled (e.g. the calling future
/// was cancelled) only clears the in-flight mark.
pub(crate) struct Ticket<'a, T: Send + Sync + 'static> {
    state: &'a ResourceState<T>,
    seq: u64,
    settled: bool,
}

impl<T: Send + Sync + 'static> Ticket<'_, T> {
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    /// Apply a successful result. Returns `false` if it was superseded.
    pub(crate) fn succeed(self, data: Arc<T>) -> bool {
        self.succeed_partial(data, 0)
    }

    /// Like [`succeed`](Self::succeed), noting how many remote entries
    /// were dropped while decoding `data`.
    pub(crate) fn succeed_partial(mut self, data: Arc<T>, skipped: usize) -> bool {
        self.settled = true;
        self.state.settle(self.seq, Some(Ok((data, skipped))))
    }

    /// Record a failure. The held value is kept. Returns `false` if it
    /// was superseded.
    pub(crate) fn fail(mut self, message: String) -> bool {
        self.settled = true;
        self.state.settle(self.seq, Some(Err(message)))
    }
}

impl<T: Send + Sync + 'static> Drop for Ticket<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.settle(self.seq, None);
        }
    }
}
