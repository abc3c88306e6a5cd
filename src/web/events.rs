//! Server-Sent Events (SSE) endpoint for catalog changes
//!
//! Forwards store events to browsers so open listings can refetch after an
//! admin edit.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::catalog::CatalogEvent;
use crate::web::server::AppState;

/// First event on every stream
#[derive(Debug, Serialize)]
struct Connected {
    subscribers: usize,
    version: &'static str,
}

fn to_sse(event: &CatalogEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_default();
    Event::default().event(event.name()).data(data)
}

/// SSE endpoint handler - `/api/events`
pub async fn api_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.store.events().subscribe();
    let subscribers = state.store.events().subscriber_count();
    debug!(subscribers, "SSE client connected");

    let event_stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => Some(Ok::<_, Infallible>(to_sse(&event))),
        // Lagged receivers skip ahead; clients refetch on the next event
        Err(_) => None,
    });

    let connected = Connected {
        subscribers,
        version: env!("CARGO_PKG_VERSION"),
    };
    let initial_data = serde_json::to_string(&connected).unwrap_or_default();
    let initial = futures::stream::once(async move {
        Ok(Event::default().event("connected").data(initial_data))
    });

    Sse::new(initial.chain(event_stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
