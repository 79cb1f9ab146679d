//! Server-Sent Events support
//!
//! The stream owns the session guard, so the session lives exactly as long
//! as the tab stays connected.

use super::types::{InitPayload, SnapshotResponse};
use crate::session::{SessionGuard, SessionSnapshot};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Init event followed by one snapshot event per session change
pub fn sse_stream(
    init: InitPayload,
    broadcast_rx: tokio::sync::broadcast::Receiver<SessionSnapshot>,
    guard: SessionGuard,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(json_event("init", &init)) });

    let snapshots = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(snapshot) => Some(Ok(json_event(
            "snapshot",
            &SnapshotResponse::from(&snapshot),
        ))),
        Err(_) => None, // Skip lagged snapshots; the next one is complete anyway
    });

    let combined = init.chain(snapshots).map(move |event| {
        tracing::trace!(session_id = guard.id(), "SSE event");
        event
    });

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn json_event<T: Serialize>(event_type: &str, payload: &T) -> Event {
    let data = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    Event::default().event(event_type).data(data)
}
