use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::api::KronkClient;
use crate::event::{ApiResult, AppEvent, Event};

/// Loads the descendants of a status in the background.
///
/// At most one fetch is live: starting a new one or calling
/// [`cancel`](Self::cancel) aborts the previous request, and nothing is
/// delivered for it.
#[derive(Debug, Default)]
pub struct ReplyFetcher {
    in_flight: Option<CancellationToken>,
}

impl ReplyFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch(
        &mut self,
        client: Arc<Mutex<KronkClient>>,
        sender: mpsc::UnboundedSender<Event>,
        status_id: String,
        generation: u64,
    ) {
        self.cancel();
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(%status_id, generation, "reply fetch cancelled");
                    return;
                }
                result = async {
                    let api = client.lock().await;
                    api.get_status_context(&status_id).await
                } => result,
            };

            let mapped: ApiResult<_> = result
                .map(|ctx| ctx.descendants)
                .map_err(|e| Arc::new(e.to_string()));
            let _ = sender.send(Event::App(Box::new(AppEvent::RepliesLoaded {
                status_id,
                generation,
                result: mapped,
            })));
        });
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

impl Drop for ReplyFetcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
