//! Async driver for the table state machine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::Applied;
use super::TableSnapshot;
use super::TableState;
use crate::api::query::Column;
use crate::api::query::PageRequest;
use crate::api::query::PageResponse;
use crate::api::query::SortKey;
use crate::api::query::wire;
use crate::error::ApiError;
use crate::error::Error;
use crate::error::ProtocolError;
use crate::store::RecordStore;

/// Default bound on one table round trip.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default quiescence window for coalescing search keystrokes.
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// An event delivered to the controller's owner.
#[derive(Debug)]
pub enum TableEvent {
    /// A request settled: its response arrived, failed, or timed out.
    Response {
        /// Token of the request this result belongs to.
        draw: u64,
        /// The decoded page or the error that ended the round trip.
        result: Result<PageResponse, Error>,
    },
    /// A debounced search input went quiet and should now be applied.
    SearchSettled {
        /// Sequence number of the keystroke that started the window.
        seq: u64,
        /// The search text as of that keystroke.
        text: String,
    },
}

/// Drives one [`TableState`] against a [`RecordStore`].
///
/// Each issued request runs as a spawned task bounded by the configured
/// timeout; settled results come back through an event channel and are
/// applied by draw token, so an out-of-order response for a superseded
/// request can never overwrite a newer page. Superseded fetches are not
/// aborted - their results are simply dropped on arrival.
///
/// # Example
///
/// ```ignore
/// let mut controller = TableController::new(store, columns);
/// controller.mount();
/// controller.settle().await;
/// let snapshot = controller.snapshot();
/// ```
pub struct TableController<S> {
    store: Arc<S>,
    state: TableState,
    timeout: Duration,
    debounce: Duration,
    events_tx: mpsc::UnboundedSender<TableEvent>,
    events_rx: mpsc::UnboundedReceiver<TableEvent>,
    search_seq: u64,
    pending_search: Option<CancellationToken>,
}

impl<S: RecordStore + 'static> TableController<S> {
    /// Creates a controller for a table with the given column list.
    pub fn new(store: S, columns: Vec<Column>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store: Arc::new(store),
            state: TableState::new(columns),
            timeout: DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            events_tx,
            events_rx,
            search_seq: 0,
            pending_search: None,
        }
    }

    /// Sets the bound on one round trip.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the search quiescence window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// The underlying state machine.
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// A borrowed view of the table for rendering.
    pub fn snapshot(&self) -> TableSnapshot<'_> {
        self.state.snapshot()
    }

    /// Returns `true` while a request is in flight or a search window is
    /// still open.
    pub fn busy(&self) -> bool {
        self.state.in_flight().is_some() || self.pending_search.is_some()
    }

    // =========================================================================
    // User actions
    // =========================================================================

    /// Issues the initial request.
    pub fn mount(&mut self) {
        let request = self.state.mount();
        self.dispatch(request);
    }

    /// Re-issues a request for the current state.
    pub fn refresh(&mut self) {
        let request = self.state.refresh();
        self.dispatch(request);
    }

    /// Retries after an error.
    pub fn retry(&mut self) {
        let request = self.state.retry();
        self.dispatch(request);
    }

    /// Jumps to an arbitrary record offset.
    pub fn goto_offset(&mut self, offset: u64) {
        let request = self.state.goto_offset(offset);
        self.dispatch(request);
    }

    /// Advances one page. Returns `false` when already on the last known
    /// page.
    pub fn next_page(&mut self) -> bool {
        match self.state.next_page() {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Steps back one page. Returns `false` when already on the first.
    pub fn prev_page(&mut self) -> bool {
        match self.state.prev_page() {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Changes the page size and resets to the first page.
    pub fn set_page_size(&mut self, page_size: u64) -> Result<(), ProtocolError> {
        let request = self.state.set_page_size(page_size)?;
        self.dispatch(request);
        Ok(())
    }

    /// Cycles the sort on one column and resets to the first page.
    pub fn toggle_sort(&mut self, column: usize) -> Result<(), ProtocolError> {
        let request = self.state.toggle_sort(column)?;
        self.dispatch(request);
        Ok(())
    }

    /// Replaces the full sort directive list and resets to the first page.
    pub fn set_order(&mut self, order: Vec<SortKey>) -> Result<(), ProtocolError> {
        let request = self.state.set_order(order)?;
        self.dispatch(request);
        Ok(())
    }

    /// Records a search keystroke.
    ///
    /// Keystrokes within the quiescence window coalesce into a single
    /// request: each call cancels the previous window and opens a new one.
    /// The request is issued when [`TableEvent::SearchSettled`] for the
    /// newest keystroke is handled.
    pub fn search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(previous) = self.pending_search.take() {
            previous.cancel();
        }
        self.search_seq += 1;
        let seq = self.search_seq;

        let token = CancellationToken::new();
        self.pending_search = Some(token.clone());
        let tx = self.events_tx.clone();
        let debounce = self.debounce;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(debounce) => {
                    let _ = tx.send(TableEvent::SearchSettled { seq, text });
                }
            }
        });
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Waits for the next controller event.
    pub async fn recv_event(&mut self) -> Option<TableEvent> {
        self.events_rx.recv().await
    }

    /// Feeds one event into the state machine.
    ///
    /// Returns the application outcome for settled responses, `None` for
    /// events that only advance internal bookkeeping.
    pub fn handle_event(&mut self, event: TableEvent) -> Option<Applied> {
        match event {
            TableEvent::Response { draw, result } => Some(self.state.apply(draw, result)),
            TableEvent::SearchSettled { seq, text } => {
                if seq != self.search_seq {
                    return None;
                }
                self.pending_search = None;
                if let Some(request) = self.state.set_search(text) {
                    self.dispatch(request);
                }
                None
            }
        }
    }

    /// Pumps events until nothing is in flight and no search window is
    /// open. Returns immediately when already settled.
    pub async fn settle(&mut self) {
        while self.busy() {
            match self.recv_event().await {
                Some(event) => {
                    self.handle_event(event);
                }
                None => return,
            }
        }
    }

    fn dispatch(&mut self, request: PageRequest) {
        let params = match wire::encode_request(&request, self.state.columns()) {
            Ok(params) => params,
            Err(error) => {
                let _ = self.events_tx.send(TableEvent::Response {
                    draw: request.draw,
                    result: Err(error.into()),
                });
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let tx = self.events_tx.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, store.fetch_table(&params)).await {
                Ok(Ok(raw)) => wire::decode_response(raw, &request).map_err(Error::from),
                Ok(Err(error)) => Err(error),
                Err(_) => Err(ApiError::Timeout(timeout).into()),
            };
            let _ = tx.send(TableEvent::Response {
                draw: request.draw,
                result,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::controller::ErrorKind;
    use crate::controller::Phase;
    use crate::model::Record;
    use crate::store::MemoryStore;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Business Name"),
            Column::new("Owner Name"),
            Column::new("City"),
            Column::new("State"),
            Column::new("Mobile Number"),
        ]
    }

    fn seeded_store(n: usize) -> MemoryStore {
        let records = (0..n)
            .map(|i| {
                Record::new()
                    .set("Business Name", format!("Biz {i:02}"))
                    .set("Owner Name", if i == 7 { "Acme Holdings" } else { "Owner" })
                    .set("City", "Austin")
                    .set("State", "TX")
            })
            .collect();
        MemoryStore::new(records)
    }

    /// Serves from an inner store, answering one draw slowly.
    struct DelayStore {
        inner: MemoryStore,
        slow_draw: u64,
    }

    #[async_trait]
    impl RecordStore for DelayStore {
        async fn fetch_table(&self, params: &[(String, String)]) -> Result<Value, Error> {
            let draw: u64 = params
                .iter()
                .find(|(name, _)| name == "draw")
                .and_then(|(_, value)| value.parse().ok())
                .unwrap_or(0);
            let delay = if draw == self.slow_draw {
                Duration::from_millis(400)
            } else {
                Duration::from_millis(10)
            };
            tokio::time::sleep(delay).await;
            self.inner.fetch_table(params).await
        }
    }

    /// Counts fetches into an inner store.
    struct CountingStore {
        inner: MemoryStore,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for CountingStore {
        async fn fetch_table(&self, params: &[(String, String)]) -> Result<Value, Error> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_table(params).await
        }
    }

    /// Never answers within any reasonable bound.
    struct HangingStore;

    #[async_trait]
    impl RecordStore for HangingStore {
        async fn fetch_table(&self, _params: &[(String, String)]) -> Result<Value, Error> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn mount_commits_first_page() {
        let mut controller = TableController::new(seeded_store(25), columns());
        controller.mount();
        controller.settle().await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.rows.len(), 10);
        assert_eq!(snapshot.records_filtered, Some(25));
        assert_eq!(snapshot.records_total, Some(25));
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_order_responses_commit_only_the_newest() {
        let store = DelayStore {
            inner: seeded_store(30),
            slow_draw: 1,
        };
        let mut controller = TableController::new(store, columns());

        controller.mount();
        controller.set_page_size(25).unwrap();

        // The second request's response arrives first and commits.
        let event = controller.recv_event().await.unwrap();
        assert_eq!(controller.handle_event(event), Some(Applied::Committed));
        assert_eq!(controller.snapshot().rows.len(), 25);

        // The first request's response arrives late and is dropped.
        let event = controller.recv_event().await.unwrap();
        assert_eq!(controller.handle_event(event), Some(Applied::Stale));
        assert_eq!(controller.snapshot().rows.len(), 25);
        assert_eq!(controller.snapshot().phase, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_coalesce_into_one_request() {
        let store = CountingStore {
            inner: seeded_store(25),
            fetches: AtomicUsize::new(0),
        };
        let mut controller = TableController::new(store, columns());

        controller.search("a");
        controller.search("ac");
        controller.search("acme");
        controller.settle().await;

        assert_eq!(controller.store.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state().search(), "acme");
        assert_eq!(controller.snapshot().records_filtered, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn round_trip_timeout_surfaces_as_error() {
        let mut controller = TableController::new(HangingStore, columns())
            .with_timeout(Duration::from_secs(5));

        controller.mount();
        controller.settle().await;

        assert_eq!(
            controller.snapshot().phase,
            Phase::Error(ErrorKind::Timeout)
        );
    }

    #[tokio::test]
    async fn search_then_page_through_results() {
        let mut controller = TableController::new(seeded_store(25), columns());
        controller.mount();
        controller.settle().await;

        controller.search("biz");
        controller.settle().await;
        assert_eq!(controller.snapshot().records_filtered, Some(25));
        assert_eq!(controller.snapshot().offset, 0);

        assert!(controller.next_page());
        controller.settle().await;
        assert_eq!(controller.snapshot().offset, 10);
        assert_eq!(controller.snapshot().rows.len(), 10);
        assert_eq!(
            controller.snapshot().rows[0].get_str("Business Name"),
            Some("Biz 10")
        );
    }
}
