//! Encoding of the relayed term feed as `text/event-stream`.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::{Stream, StreamExt};
use http::HeaderName;
use http::header::CACHE_CONTROL;
use serde::Serialize;
use serde_json::json;

use super::dto::StreamedTermDto;
use crate::domain::FeedItem;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// One `data:` event per term; a failure becomes a final `{"error": ..}` event.
pub fn feed_item_event(item: FeedItem) -> Event {
    match item {
        FeedItem::Term(term) => data_event(&StreamedTermDto::from(term)),
        FeedItem::Failed(message) => data_event(&json!({ "error": message })),
    }
}

fn data_event<T: Serialize>(payload: &T) -> Event {
    match serde_json::to_string(payload) {
        Ok(data) => Event::default().data(data),
        Err(e) => Event::default().data(json!({ "error": e.to_string() }).to_string()),
    }
}

/// SSE response with caching and proxy buffering disabled.
pub fn feed_response<S>(feed: S) -> Response
where
    S: Stream<Item = FeedItem> + Send + 'static,
{
    let events = feed.map(|item| Ok::<_, Infallible>(feed_item_event(item)));
    (
        [(CACHE_CONTROL, "no-cache"), (X_ACCEL_BUFFERING, "no")],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
        .into_response()
}
