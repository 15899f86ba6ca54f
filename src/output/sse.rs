//! Server-Sent Events for real-time scene updates

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use super::SceneEvent;
use crate::AppState;

/// Create an SSE stream of `pose` and `text` events
pub fn create_scene_stream(
    app_state: Arc<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app_state.subscribe_scene();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => scene_to_event(&event).map(Ok),
        Err(_) => None, // Skip lagged messages
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Convert a scene event to an SSE event
fn scene_to_event(event: &SceneEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(data) => Some(Event::default().event(event.kind()).data(data)),
        Err(e) => {
            tracing::warn!("Failed to encode scene event: {}", e);
            None
        }
    }
}
