use crate::errors::IntoErrorResponse;
use crate::events::{EventSubscription, TableEvent};
use crate::table::TableService;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use warp::http;
use warp::reply::{self, Response};
use warp::sse;
use warp::Reply;

/// Streams table events to an observer. The first event is always the
/// current state, so late joiners and spectators start in sync.
pub async fn stream_events(table: Arc<TableService>) -> Response {
    let (state, subscription) = match table.observe() {
        Ok(observed) => observed,
        Err(err) => return err.into_http_response(),
    };

    let initial = tokio_stream::once(Ok(render_event(TableEvent::StateUpdated { state })));
    let stream = initial.chain(subscription_stream(subscription));
    let keep_alive = sse::keep_alive()
        .interval(Duration::from_secs(15))
        .text(":keep-alive\n");

    let reply = sse::reply(keep_alive.stream(stream));
    reply::with_header(reply, http::header::CACHE_CONTROL, "no-cache").into_response()
}

fn subscription_stream(
    subscription: EventSubscription,
) -> impl tokio_stream::Stream<Item = Result<sse::Event, Infallible>> {
    let mut subscription = subscription;
    let (_, placeholder_rx) = mpsc::channel(1);
    let receiver = std::mem::replace(&mut subscription.receiver, placeholder_rx);

    // the subscription unsubscribes on drop, so it lives as long as the stream
    ReceiverStream::new(receiver).map(move |event| {
        let _keep_alive = &subscription;
        Ok(render_event(event))
    })
}

fn render_event(event: TableEvent) -> sse::Event {
    let name = event.kind();
    match serde_json::to_string(&event) {
        Ok(json) => sse::Event::default().event(name).data(json),
        Err(err) => {
            let fallback = serde_json::json!({
                "type": "error",
                "message": format!("failed to serialize table event: {err}")
            })
            .to_string();
            sse::Event::default().event("error").data(fallback)
        }
    }
}
