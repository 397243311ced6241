//! Reply panel and quick-reply composer as one explicit state value.
//!
//! [`RepliesState::update`] is the only way the state changes. It returns the
//! side effects the event loop must run; results of those effects come back
//! in as further [`Msg`]s.

use thiserror::Error;

use crate::api::types::{NewStatus, Status, Visibility};
use crate::event::ApiResult;
use crate::replies::tree::{ReplyNode, build_reply_tree, shows_view_all};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Collapsed,
    Loading,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composer {
    Idle,
    Submitting,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("reply text is empty")]
    Blank,
}

/// The status whose replies are shown.
#[derive(Debug, Clone)]
pub struct Subject {
    pub id: String,
    pub acct: String,
    pub visibility: Visibility,
    /// Reply count reported by the server, independent of what was fetched.
    pub replies_count: u64,
}

impl From<&Status> for Subject {
    fn from(status: &Status) -> Self {
        Self {
            id: status.id.clone(),
            acct: status.account.acct.clone(),
            visibility: status.visibility,
            replies_count: status.replies_count,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    Toggle,
    Retry,
    FetchCompleted {
        generation: u64,
        result: ApiResult<Vec<Status>>,
    },
    Input(char),
    Backspace,
    Submit,
    /// Outcome of a post; `mount` is the id the `Post` effect carried.
    SubmitCompleted {
        mount: u64,
        result: ApiResult<Status>,
    },
    Unmount,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch { status_id: String, generation: u64 },
    CancelFetch,
    Post { mount: u64, status: NewStatus },
    /// Merge statuses into the shared store.
    Import(Vec<Status>),
    /// Report a failure through the app's alert popup.
    Alert(String),
}

#[derive(Debug, Clone)]
pub struct RepliesState {
    pub subject: Subject,
    pub panel: Panel,
    pub composer: Composer,
    pub draft: String,
    pub replies: Vec<ReplyNode>,
    /// Everything the last successful fetch returned, for the full thread view.
    pub descendants: Vec<Status>,
    pub fetch_failed: bool,
    /// Distinguishes this widget from earlier ones opened on the same status.
    mount: u64,
    generation: u64,
    fetching: bool,
}

impl RepliesState {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            panel: Panel::Collapsed,
            composer: Composer::Idle,
            draft: String::new(),
            replies: Vec::new(),
            descendants: Vec::new(),
            fetch_failed: false,
            mount: 0,
            generation: 0,
            fetching: false,
        }
    }

    pub fn with_mount(mut self, mount: u64) -> Self {
        self.mount = mount;
        self
    }

    pub fn mount(&self) -> u64 {
        self.mount
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn shows_view_all(&self) -> bool {
        shows_view_all(self.subject.replies_count, self.replies.len())
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Toggle => self.toggle(),
            Msg::Retry => {
                if self.panel == Panel::Expanded && self.fetch_failed {
                    self.panel = Panel::Loading;
                    self.start_fetch()
                } else {
                    Vec::new()
                }
            }
            Msg::FetchCompleted { generation, result } => self.fetch_completed(generation, result),
            Msg::Input(c) => {
                if self.composer == Composer::Idle {
                    self.draft.push(c);
                }
                Vec::new()
            }
            Msg::Backspace => {
                if self.composer == Composer::Idle {
                    self.draft.pop();
                }
                Vec::new()
            }
            Msg::Submit => self.submit(),
            Msg::SubmitCompleted { mount, result } => self.submit_completed(mount, result),
            Msg::Unmount => {
                self.generation += 1;
                self.fetching = false;
                vec![Effect::CancelFetch]
            }
        }
    }

    fn toggle(&mut self) -> Vec<Effect> {
        match self.panel {
            Panel::Loading => Vec::new(),
            Panel::Expanded => {
                self.panel = Panel::Collapsed;
                Vec::new()
            }
            // No toggle is offered for a status nobody answered.
            Panel::Collapsed if self.subject.replies_count == 0 => Vec::new(),
            Panel::Collapsed if self.replies.is_empty() => {
                self.panel = Panel::Loading;
                if self.fetching {
                    // A refetch after posting is already under way.
                    Vec::new()
                } else {
                    self.start_fetch()
                }
            }
            Panel::Collapsed => {
                self.panel = Panel::Expanded;
                Vec::new()
            }
        }
    }

    fn start_fetch(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.fetching = true;
        vec![Effect::Fetch {
            status_id: self.subject.id.clone(),
            generation: self.generation,
        }]
    }

    fn fetch_completed(
        &mut self,
        generation: u64,
        result: ApiResult<Vec<Status>>,
    ) -> Vec<Effect> {
        if generation != self.generation || !self.fetching {
            tracing::debug!(generation, current = self.generation, "dropping stale replies");
            return Vec::new();
        }
        self.fetching = false;
        if self.panel == Panel::Loading {
            self.panel = Panel::Expanded;
        }

        match result {
            Ok(descendants) => {
                self.fetch_failed = false;
                self.replies = build_reply_tree(&descendants, &self.subject.id);
                self.descendants = descendants.clone();
                vec![Effect::Import(descendants)]
            }
            Err(e) => {
                tracing::warn!(status_id = %self.subject.id, "failed to load replies: {e}");
                self.fetch_failed = true;
                self.replies.clear();
                self.descendants.clear();
                Vec::new()
            }
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.composer == Composer::Submitting {
            return Vec::new();
        }
        let Ok(status) = compose_reply(&self.draft, &self.subject.acct) else {
            return Vec::new();
        };
        self.composer = Composer::Submitting;
        vec![Effect::Post {
            mount: self.mount,
            status: NewStatus {
                status,
                in_reply_to_id: self.subject.id.clone(),
                visibility: self.subject.visibility,
            },
        }]
    }

    fn submit_completed(&mut self, mount: u64, result: ApiResult<Status>) -> Vec<Effect> {
        if mount != self.mount || self.composer != Composer::Submitting {
            tracing::debug!(mount, current = self.mount, "dropping stale post result");
            return Vec::new();
        }
        self.composer = Composer::Idle;
        match result {
            Ok(status) => {
                self.draft.clear();
                self.subject.replies_count += 1;
                if self.panel == Panel::Expanded {
                    self.panel = Panel::Loading;
                }
                let mut effects = vec![Effect::Import(vec![status])];
                effects.extend(self.start_fetch());
                effects
            }
            Err(e) => vec![Effect::Alert(format!("Could not send reply: {e}"))],
        }
    }
}

/// Validate a draft and make sure it mentions the author being replied to.
pub fn compose_reply(draft: &str, acct: &str) -> Result<String, ComposeError> {
    if draft.trim().is_empty() {
        return Err(ComposeError::Blank);
    }
    if mentions(draft, acct) {
        Ok(draft.to_string())
    } else {
        Ok(format!("@{acct} {draft}"))
    }
}

/// Whether `text` contains `@acct` as a whole handle, so `@bobby` or
/// `@bob@elsewhere` do not count as mentioning `bob`.
fn mentions(text: &str, acct: &str) -> bool {
    let handle_char = |c: char| c.is_alphanumeric() || c == '_' || c == '@';
    let mention = format!("@{acct}");
    text.match_indices(&mention).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + mention.len()..].chars().next();
        !before.is_some_and(handle_char) && !after.is_some_and(handle_char)
    })
}
