use color_eyre::eyre::OptionExt;
use crossterm::event::Event as CrosstermEvent;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::types::{Account, Status};

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// An event that is emitted on a regular schedule.
    Tick,
    /// Crossterm events from the terminal.
    Crossterm(CrosstermEvent),
    /// Application-level events.
    App(Box<AppEvent>),
}

/// Application events for navigation, API requests, and API responses.
#[derive(Clone, Debug)]
pub enum AppEvent {
    // -- Navigation --
    Quit,
    PushView(ViewKind),
    PopView,

    // -- API request triggers (sent from key handlers) --
    OpenStatus {
        status_id: String,
    },
    FetchAccount,

    // -- API response events (sent from async tasks back to the event loop) --
    StatusLoaded(Box<ApiResult<Status>>),
    AccountLoaded(ApiResult<Account>),
    RepliesLoaded {
        status_id: String,
        generation: u64,
        result: ApiResult<Vec<Status>>,
    },
    ReplyPosted {
        status_id: String,
        /// Mount id of the reply widget that submitted the post.
        mount: u64,
        result: Box<ApiResult<Status>>,
    },
}

/// API result type using `Arc<String>` so errors are `Clone`.
pub type ApiResult<T> = Result<T, Arc<String>>;

/// Identifies a view for the view-stack navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Status(String), // status_id, with its reply preview
    Thread(String), // status_id, all fetched descendants
    Help,
}

/// Owns the event channel. A background task feeds it terminal input and
/// ticks; async request tasks post [`AppEvent`]s through [`Self::sender`].
#[derive(Debug)]
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_fps: f64) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(pump_terminal_events(sender.clone(), tick_interval(tick_fps)));
        Self { sender, receiver }
    }

    /// Waits for the next event of any kind.
    pub async fn next(&mut self) -> color_eyre::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_eyre("event channel closed")
    }

    /// Queue an app event for the loop.
    pub fn send(&self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(Box::new(app_event)));
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// Tick period for a frame rate; rates below 1 fps are clamped to 1.
fn tick_interval(fps: f64) -> Duration {
    if fps.is_finite() && fps >= 1.0 {
        Duration::from_secs_f64(1.0 / fps)
    } else {
        Duration::from_secs(1)
    }
}

/// Forward crossterm input and ticks until the receiving side goes away.
async fn pump_terminal_events(sender: mpsc::UnboundedSender<Event>, period: Duration) {
    let mut reader = crossterm::event::EventStream::new();
    let mut ticks = tokio::time::interval(period);
    loop {
        let next_input = reader.next().fuse();
        let event = tokio::select! {
            _ = sender.closed() => break,
            _ = ticks.tick() => Event::Tick,
            Some(Ok(evt)) = next_input => Event::Crossterm(evt),
        };
        if sender.send(event).is_err() {
            break;
        }
    }
}
