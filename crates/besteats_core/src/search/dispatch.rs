//! Background search execution.
//!
//! # Responsibility
//! - Run [`PlaceSearchClient::search`] on the tokio runtime.
//! - Bound each search with a timeout.
//! - Hand completions back to the single consumer over a channel.
//!
//! # Invariants
//! - At most one search task is in flight; dispatching a new ticket aborts
//!   the previous task.
//! - Completions carry their ticket so the consumer can apply the
//!   supersession rule; aborting is an optimization, not the ordering
//!   guarantee.

use crate::config::SearchConfig;
use crate::model::place::Place;
use crate::search::client::{
    PlaceSearchClient, SearchError, SearchRequest, SearchResult, SearchTicket,
};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Finished search, ready for `apply_search`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCompletion {
    pub ticket: SearchTicket,
    pub result: SearchResult<Vec<Place>>,
}

/// Spawns searches and forwards their completions.
pub struct SearchDispatcher<C> {
    client: Arc<C>,
    radius_m: u32,
    page_size: u32,
    timeout: Duration,
    completions: mpsc::UnboundedSender<SearchCompletion>,
    in_flight: Option<JoinHandle<()>>,
}

impl<C> SearchDispatcher<C>
where
    C: PlaceSearchClient + Send + Sync + 'static,
{
    /// Creates a dispatcher and the receiver its completions arrive on.
    pub fn new(
        client: Arc<C>,
        config: &SearchConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SearchCompletion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let dispatcher = Self {
            client,
            radius_m: config.radius_m,
            page_size: config.page_size,
            timeout: config.timeout(),
            completions,
            in_flight: None,
        };
        (dispatcher, receiver)
    }

    /// Starts a search for `ticket`, aborting any search still in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, ticket: SearchTicket) {
        self.cancel();

        let client = Arc::clone(&self.client);
        let completions = self.completions.clone();
        let timeout = self.timeout;
        let request = SearchRequest {
            origin: ticket.origin,
            category: ticket.category,
            radius_m: self.radius_m,
            page_size: self.page_size,
        };

        info!(
            "event=search_dispatch module=search status=start seq={} category={}",
            ticket.seq, ticket.category
        );
        self.in_flight = Some(tokio::spawn(async move {
            let started_at = Instant::now();
            let result = match tokio::time::timeout(timeout, client.search(&request)).await {
                Ok(result) => result,
                Err(_) => Err(SearchError::Timeout(timeout)),
            };
            match &result {
                Ok(places) => info!(
                    "event=search_dispatch module=search status=ok seq={} count={} duration_ms={}",
                    ticket.seq,
                    places.len(),
                    started_at.elapsed().as_millis()
                ),
                Err(err) => warn!(
                    "event=search_dispatch module=search status=error seq={} duration_ms={} error={}",
                    ticket.seq,
                    started_at.elapsed().as_millis(),
                    err
                ),
            }
            if completions.send(SearchCompletion { ticket, result }).is_err() {
                debug!(
                    "event=search_dispatch module=search status=dropped seq={} reason=receiver_closed",
                    ticket.seq
                );
            }
        }));
    }

    /// Aborts the in-flight search, if any. Its completion is never sent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("event=search_cancel module=search status=ok");
            }
            handle.abort();
        }
    }
}

impl<C> Drop for SearchDispatcher<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
