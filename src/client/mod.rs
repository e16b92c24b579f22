mod api;
mod filters;
mod view;

pub use api::{ClientError, EventsClient};
pub use filters::{FieldError, Filters, FormField, ValidationErrors};
pub use view::{EventsView, LoadOutcome, render_table};

use anyhow::Result;

/// Run one query against a running server and print the table to stdout.
/// Ctrl-C cancels the request in flight.
pub async fn run_query(api_url: &str, filters: Filters) -> Result<()> {
    let view = EventsView::new(EventsClient::new(api_url)?);

    let cancel_on_ctrl_c = {
        let view = view.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received Ctrl+C, cancelling request");
                view.cleanup().await;
            }
        })
    };

    let outcome = view.submit(&filters).await;
    cancel_on_ctrl_c.abort();

    match outcome? {
        LoadOutcome::Loaded(count) => {
            tracing::debug!("Loaded {count} events");
            print!("{}", view.render().await);
            Ok(())
        }
        LoadOutcome::Cancelled => {
            tracing::info!("Request cancelled");
            Ok(())
        }
        LoadOutcome::Failed(message) => {
            print!("{}", view.render().await);
            anyhow::bail!(message)
        }
    }
}
