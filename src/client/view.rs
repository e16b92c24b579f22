use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientError, EventsClient, Filters, ValidationErrors};
use crate::events::LogEntry;

/// Result of one `load_events` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// Superseded by a newer load or cancelled by `cleanup`.
    Cancelled,
    Failed(String),
}

#[derive(Debug, Default)]
struct ViewState {
    events: Vec<LogEntry>,
    loading: bool,
    error: Option<String>,
    in_flight: Option<CancellationToken>,
    generation: u64,
}

/// Event table state: the last loaded events, the loading flag and the
/// last error. Starting a load cancels whichever load is still running.
#[derive(Debug, Clone)]
pub struct EventsView {
    client: EventsClient,
    state: Arc<RwLock<ViewState>>,
}

impl EventsView {
    pub fn new(client: EventsClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(ViewState::default())),
        }
    }

    pub async fn events(&self) -> Vec<LogEntry> {
        self.state.read().await.events.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Validate and load. Invalid filters never reach the network.
    pub async fn submit(&self, filters: &Filters) -> Result<LoadOutcome, ValidationErrors> {
        filters.validate()?;
        Ok(self.load_events(filters).await)
    }

    /// Clear every filter and reload.
    pub async fn reset(&self) -> LoadOutcome {
        self.load_events(&Filters::default()).await
    }

    pub async fn load_events(&self, filters: &Filters) -> LoadOutcome {
        let token = CancellationToken::new();
        let generation = {
            let mut state = self.state.write().await;
            if let Some(previous) = state.in_flight.replace(token.clone()) {
                tracing::debug!("Cancelling previous request");
                previous.cancel();
            }
            state.generation += 1;
            state.loading = true;
            state.error = None;
            state.generation
        };

        let result = self.client.fetch_events(filters, &token).await;
        self.finish(generation, result).await
    }

    /// Record the result of load `generation`. Only the most recent load
    /// may touch the view; an older one reports itself as cancelled.
    async fn finish(
        &self,
        generation: u64,
        result: Result<Vec<LogEntry>, ClientError>,
    ) -> LoadOutcome {
        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!("Discarding result of superseded load");
            return LoadOutcome::Cancelled;
        }

        let outcome = match result {
            Ok(events) => {
                let count = events.len();
                state.events = events;
                LoadOutcome::Loaded(count)
            }
            Err(ClientError::Cancelled) => LoadOutcome::Cancelled,
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Failed to fetch events: {message}");
                state.error = Some(message.clone());
                state.events.clear();
                LoadOutcome::Failed(message)
            }
        };

        state.loading = false;
        state.in_flight = None;
        outcome
    }

    /// Cancel the running load, if any.
    pub async fn cleanup(&self) {
        if let Some(token) = self.state.read().await.in_flight.as_ref() {
            token.cancel();
        }
    }

    pub async fn render(&self) -> String {
        let state = self.state.read().await;
        render_table(&state.events, state.loading, state.error.as_deref())
    }
}

const HEADERS: [&str; 4] = ["Timestamp", "User ID", "Event Type", "Original Line"];

/// Render the event table as plain text.
pub fn render_table(events: &[LogEntry], loading: bool, error: Option<&str>) -> String {
    let mut output = String::new();

    if let Some(error) = error {
        output.push_str(&format!("Error: {error}\n\n"));
    } else if !loading {
        let plural = if events.len() == 1 { "" } else { "s" };
        output.push_str(&format!("{} event{plural} found\n\n", events.len()));
    }

    let rows: Vec<[String; 4]> = events
        .iter()
        .map(|e| {
            [
                e.timestamp.clone(),
                e.user_id.to_string(),
                e.event_type.clone(),
                e.original_line.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 4]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    output.push_str(&format_row(HEADERS));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&format!("{}\n", rule.join("-+-")));

    for row in &rows {
        output.push_str(&format_row([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ]));
    }

    if events.is_empty() && !loading && error.is_none() {
        output.push_str("No events to display\n");
    }

    output
}
