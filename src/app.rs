use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::api::KronkClient;
use crate::api::types::{Account, NewStatus, Status};
use crate::command::{self, Command};
use crate::config::AppConfig;
use crate::event::{ApiResult, AppEvent, Event, EventHandler, ViewKind};
use crate::install_prompt::InstallPrompt;
use crate::local_state::{self, LocalState};
use crate::replies::{Composer, Effect, Msg, RepliesState, ReplyFetcher, Subject};
use crate::store::StatusStore;
use crate::ui;

// ---------------------------------------------------------------------------
// App mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Command,
    Compose,
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

pub struct ViewState {
    pub kind: ViewKind,
    pub selected_index: usize,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,

    // View system
    pub view_stack: Vec<ViewState>,
    pub mode: AppMode,

    // Data state
    pub store: StatusStore,
    pub subject: Option<Status>,
    pub replies: Option<RepliesState>,
    pub current_account: Option<Account>,
    fetcher: ReplyFetcher,
    mounts: u64,

    // Input state
    pub command_input: String,

    // API client (wrapped for sharing with spawned tasks)
    pub api_client: Option<Arc<Mutex<KronkClient>>>,
    pub signed_in: bool,

    // Install banner
    pub install_prompt: InstallPrompt,
    local_state: LocalState,

    // Status
    pub status_message: Option<String>,
    pub error_detail: Option<String>,
    pub loading: bool,
}

impl App {
    pub fn new(config: AppConfig, api_client: Option<KronkClient>) -> Self {
        let local_state = LocalState::load_or_empty(local_state::default_path());
        let install_prompt =
            InstallPrompt::from_local_state(config.install_prompt, &local_state, Instant::now());
        let signed_in = api_client.as_ref().is_some_and(KronkClient::signed_in);

        Self {
            running: true,
            events: EventHandler::new(config.tick_rate_fps),
            config,
            view_stack: vec![ViewState {
                kind: ViewKind::Home,
                selected_index: 0,
            }],
            mode: AppMode::Normal,
            store: StatusStore::default(),
            subject: None,
            replies: None,
            current_account: None,
            fetcher: ReplyFetcher::new(),
            mounts: 0,
            command_input: String::new(),
            api_client: api_client.map(|c| Arc::new(Mutex::new(c))),
            signed_in,
            install_prompt,
            local_state,
            status_message: None,
            error_detail: None,
            loading: false,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(
        mut self,
        mut terminal: DefaultTerminal,
        initial_status: Option<String>,
    ) -> color_eyre::Result<()> {
        if self.signed_in {
            self.events.send(AppEvent::FetchAccount);
        }
        if let Some(status_id) = initial_status {
            self.events.send(AppEvent::OpenStatus { status_id });
        }

        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            match self.events.next().await? {
                Event::Tick => self.tick(),
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key) = event
                        && key.kind == crossterm::event::KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Event::App(app_event) => self.handle_app_event(*app_event),
            }
        }
        self.fetcher.cancel();
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(frame, self);
    }

    fn tick(&mut self) {
        self.install_prompt.tick(Instant::now());
    }

    /// Whether any request the user is waiting on is outstanding.
    pub fn is_busy(&self) -> bool {
        self.loading
            || self
                .replies
                .as_ref()
                .is_some_and(|r| r.is_fetching() || r.composer == Composer::Submitting)
    }

    // -- View stack ---------------------------------------------------------

    pub fn current_view(&self) -> Option<&ViewKind> {
        self.view_stack.last().map(|vs| &vs.kind)
    }

    pub fn push_view(&mut self, kind: ViewKind) {
        self.view_stack.push(ViewState {
            kind,
            selected_index: 0,
        });
    }

    pub fn pop_view(&mut self) {
        if self.view_stack.len() <= 1 {
            return;
        }
        if let Some(popped) = self.view_stack.pop()
            && matches!(popped.kind, ViewKind::Status(_))
        {
            self.close_subject();
        }
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        // The alert popup swallows keys until dismissed.
        if self.error_detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.error_detail = None;
            }
            return;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Command => self.handle_command_key(key),
            AppMode::Compose => self.handle_compose_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.view_stack.len() > 1 {
                    self.events.send(AppEvent::PopView);
                } else {
                    self.events.send(AppEvent::Quit);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection_down();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection_up();
            }
            KeyCode::Enter => {
                self.open_selected();
            }
            KeyCode::Char('r') => {
                self.update_replies(Msg::Toggle);
            }
            KeyCode::Char('R') => {
                self.update_replies(Msg::Retry);
            }
            KeyCode::Char('i') => {
                self.start_compose();
            }
            KeyCode::Char('a') => {
                self.view_all_replies();
            }
            KeyCode::Char('x') => {
                self.dismiss_install_prompt();
            }
            KeyCode::Char(':') => {
                self.mode = AppMode::Command;
                self.command_input.clear();
            }
            KeyCode::Char('?') => {
                self.events.send(AppEvent::PushView(ViewKind::Help));
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.command_input.clear();
            }
            KeyCode::Enter => {
                self.execute_command();
                self.mode = AppMode::Normal;
            }
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Char(c) => {
                self.command_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            // Leaving compose mode keeps the draft.
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => {
                self.update_replies(Msg::Submit);
            }
            KeyCode::Backspace => {
                self.update_replies(Msg::Backspace);
            }
            KeyCode::Char(c) => {
                self.update_replies(Msg::Input(c));
            }
            _ => {}
        }
    }

    // -- Command execution --------------------------------------------------

    fn execute_command(&mut self) {
        let input = self.command_input.clone();
        match command::parse_command(&input) {
            Some(Command::Open(status_ref)) => {
                if let Some(status_id) = command::parse_status_ref(&status_ref) {
                    self.events.send(AppEvent::OpenStatus { status_id });
                } else {
                    self.status_message = Some(format!("Invalid status URL or ID: {status_ref}"));
                }
            }
            Some(Command::Home) => {
                while self.view_stack.len() > 1 {
                    self.pop_view();
                }
            }
            Some(Command::Help) => {
                self.events.send(AppEvent::PushView(ViewKind::Help));
            }
            Some(Command::Quit) => {
                self.events.send(AppEvent::Quit);
            }
            None => {
                self.status_message = Some(format!("Unknown command: {input}"));
            }
        }
        self.command_input.clear();
    }

    // -- Selection helpers --------------------------------------------------

    fn move_selection_down(&mut self) {
        let count = self.current_item_count();
        if let Some(vs) = self.view_stack.last_mut()
            && vs.selected_index + 1 < count
        {
            vs.selected_index += 1;
        }
    }

    fn move_selection_up(&mut self) {
        if let Some(vs) = self.view_stack.last_mut() {
            vs.selected_index = vs.selected_index.saturating_sub(1);
        }
    }

    fn current_item_count(&self) -> usize {
        match self.current_view() {
            Some(ViewKind::Thread(_)) => self.replies.as_ref().map_or(0, |r| r.descendants.len()),
            _ => 0,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.view_stack.last().map_or(0, |vs| vs.selected_index)
    }

    /// Make the selected reply in the thread view the new subject.
    fn open_selected(&mut self) {
        if !matches!(self.current_view(), Some(ViewKind::Thread(_))) {
            return;
        }
        let idx = self.selected_index();
        let Some(id) = self
            .replies
            .as_ref()
            .and_then(|r| r.descendants.get(idx))
            .map(|s| s.id.clone())
        else {
            return;
        };
        // Fetched statuses never change, so the stored copy is current enough.
        let Some(status) = self.store.status(&id).cloned() else {
            return;
        };
        self.view_stack.pop();
        self.set_subject(status);
    }

    // -- Reply widget -------------------------------------------------------

    fn on_status_view(&self) -> bool {
        matches!(self.current_view(), Some(ViewKind::Status(_)))
    }

    fn start_compose(&mut self) {
        if !self.on_status_view() || self.replies.is_none() {
            return;
        }
        if self.signed_in {
            self.mode = AppMode::Compose;
        } else {
            self.status_message = Some("Sign in (KRONK_ACCESS_TOKEN) to reply".to_string());
        }
    }

    fn view_all_replies(&mut self) {
        let Some(ref replies) = self.replies else {
            return;
        };
        if self.on_status_view() && replies.shows_view_all() {
            let status_id = replies.subject.id.clone();
            self.push_view(ViewKind::Thread(status_id));
        }
    }

    /// Feed a message to the reply widget and run the effects it asks for.
    fn update_replies(&mut self, msg: Msg) {
        let Some(state) = self.replies.as_mut() else {
            return;
        };
        let effects = state.update(msg);
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch {
                status_id,
                generation,
            } => match self.api_client {
                Some(ref client) => {
                    self.fetcher
                        .fetch(Arc::clone(client), self.events.sender(), status_id, generation);
                }
                None => self.events.send(AppEvent::RepliesLoaded {
                    status_id,
                    generation,
                    result: Err(Arc::new("no API client configured".to_string())),
                }),
            },
            Effect::CancelFetch => self.fetcher.cancel(),
            Effect::Post { mount, status } => self.dispatch_post(mount, status),
            Effect::Import(statuses) => self.store.import_statuses(statuses),
            Effect::Alert(message) => {
                tracing::warn!("{message}");
                self.error_detail = Some(message);
            }
        }
    }

    fn set_subject(&mut self, status: Status) {
        self.close_subject();
        let status_id = status.id.clone();
        let mut subject = Subject::from(&status);
        subject.visibility = subject.visibility.narrowest(self.config.default_visibility);
        self.mounts += 1;
        self.replies = Some(RepliesState::new(subject).with_mount(self.mounts));
        self.store.import_statuses([status.clone()]);
        self.subject = Some(status);

        // Replace a status view already on top instead of stacking them.
        if self.on_status_view() {
            self.view_stack.pop();
        }
        self.push_view(ViewKind::Status(status_id));
    }

    /// Unmount the reply widget; a fetch still in flight is cancelled.
    fn close_subject(&mut self) {
        self.update_replies(Msg::Unmount);
        self.replies = None;
        self.subject = None;
        if self.mode == AppMode::Compose {
            self.mode = AppMode::Normal;
        }
    }

    fn dismiss_install_prompt(&mut self) {
        if !self.install_prompt.is_visible() {
            return;
        }
        let now_ms = chrono::Utc::now().timestamp_millis();
        if let Err(e) = self.install_prompt.dismiss(&mut self.local_state, now_ms) {
            tracing::warn!("could not persist install prompt dismissal: {e}");
        }
    }

    fn matches_subject(&self, status_id: &str) -> bool {
        self.replies
            .as_ref()
            .is_some_and(|r| r.subject.id == status_id)
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            // Navigation
            AppEvent::Quit => {
                self.running = false;
            }
            AppEvent::PushView(kind) => {
                self.push_view(kind);
            }
            AppEvent::PopView => {
                self.pop_view();
            }

            // API request triggers -> dispatch to async tasks.
            ref evt @ (AppEvent::OpenStatus { .. } | AppEvent::FetchAccount) => {
                self.loading = true;
                self.dispatch_api_request(evt.clone());
            }

            // API response events
            AppEvent::StatusLoaded(result) => {
                self.loading = false;
                match *result {
                    Ok(status) => self.set_subject(status),
                    Err(e) => {
                        self.status_message = Some(format!("Error loading status: {e}"));
                    }
                }
            }
            AppEvent::AccountLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(account) => {
                        self.status_message = Some(format!("Signed in as @{}", account.acct));
                        self.current_account = Some(account);
                    }
                    Err(e) => {
                        self.status_message = Some(format!("Error verifying account: {e}"));
                    }
                }
            }
            AppEvent::RepliesLoaded {
                status_id,
                generation,
                result,
            } => {
                // Late responses for a closed status are dropped here.
                if self.matches_subject(&status_id) {
                    self.update_replies(Msg::FetchCompleted { generation, result });
                }
            }
            AppEvent::ReplyPosted {
                status_id,
                mount,
                result,
            } => {
                if self.replies.as_ref().is_some_and(|r| r.mount() == mount) {
                    let sent = result.is_ok();
                    self.update_replies(Msg::SubmitCompleted {
                        mount,
                        result: *result,
                    });
                    if sent {
                        self.mode = AppMode::Normal;
                        self.status_message = Some("Reply sent".to_string());
                    }
                    return;
                }
                // The widget that posted is gone; never touch its successor.
                match *result {
                    Ok(created) => {
                        tracing::debug!(%status_id, mount, "reply landed after its widget closed");
                        self.store.import_statuses([created]);
                    }
                    Err(e) => self.error_detail = Some(format!("Could not send reply: {e}")),
                }
            }
        }
    }

    // -- API dispatch -------------------------------------------------------

    fn dispatch_api_request(&mut self, event: AppEvent) {
        let Some(ref client) = self.api_client else {
            // No API client configured -- nothing to dispatch.
            self.loading = false;
            self.status_message = Some("No API client configured".to_string());
            return;
        };
        let client = Arc::clone(client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            match event {
                AppEvent::OpenStatus { status_id } => {
                    let api = client.lock().await;
                    let result = api.get_status(&status_id).await;
                    let mapped: ApiResult<_> = result.map_err(|e| Arc::new(e.to_string()));
                    let _ = sender.send(Event::App(Box::new(AppEvent::StatusLoaded(Box::new(
                        mapped,
                    )))));
                }
                AppEvent::FetchAccount => {
                    let mut api = client.lock().await;
                    let result = api.verify_credentials().await;
                    let mapped: ApiResult<_> = result.map_err(|e| Arc::new(e.to_string()));
                    let _ = sender.send(Event::App(Box::new(AppEvent::AccountLoaded(mapped))));
                }
                _ => {
                    // Not an API request event -- ignore.
                }
            }
        });
    }

    fn dispatch_post(&self, mount: u64, new_status: NewStatus) {
        let status_id = new_status.in_reply_to_id.clone();
        let Some(ref client) = self.api_client else {
            self.events.send(AppEvent::ReplyPosted {
                status_id,
                mount,
                result: Box::new(Err(Arc::new("no API client configured".to_string()))),
            });
            return;
        };
        let client = Arc::clone(client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let api = client.lock().await;
            let result = api.post_status(&new_status).await;
            if let Ok(ref created) = result {
                tracing::info!(id = %created.id, in_reply_to = %status_id, "reply posted");
            }
            let mapped: ApiResult<_> = result.map_err(|e| Arc::new(e.to_string()));
            let _ = sender.send(Event::App(Box::new(AppEvent::ReplyPosted {
                status_id,
                mount,
                result: Box::new(mapped),
            })));
        });
    }

    /// Look up an account by ID from the store.
    pub fn lookup_account(&self, account_id: &str) -> Option<&Account> {
        self.store.account(account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures::status;

    fn app_with_subject(replies_count: u64) -> App {
        let mut app = App::new(AppConfig::default(), None);
        app.signed_in = true;
        let mut subject = status("1", None, 0);
        subject.replies_count = replies_count;
        app.set_subject(subject);
        app
    }

    fn type_and_submit(app: &mut App, text: &str) {
        text.chars().for_each(|c| app.update_replies(Msg::Input(c)));
        app.update_replies(Msg::Submit);
    }

    #[tokio::test]
    async fn late_post_result_leaves_reopened_status_alone() {
        let mut app = app_with_subject(3);
        let first_mount = app.replies.as_ref().map(RepliesState::mount).unwrap();
        type_and_submit(&mut app, "x");

        let reopened = app.subject.clone().unwrap();
        app.set_subject(reopened);
        type_and_submit(&mut app, "fresh draft");

        app.handle_app_event(AppEvent::ReplyPosted {
            status_id: "1".into(),
            mount: first_mount,
            result: Box::new(Ok(status("9", Some("1"), 5))),
        });

        let replies = app.replies.as_ref().unwrap();
        assert_ne!(replies.mount(), first_mount);
        assert_eq!(replies.draft, "fresh draft");
        assert_eq!(replies.composer, Composer::Submitting);
        assert_eq!(replies.subject.replies_count, 3);
        assert!(app.store.status("9").is_some());
    }

    #[tokio::test]
    async fn reply_key_ignored_without_replies() {
        let mut app = app_with_subject(0);
        app.handle_normal_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
        let replies = app.replies.as_ref().unwrap();
        assert_eq!(replies.panel, crate::replies::Panel::Collapsed);
        assert!(!replies.is_fetching());
        assert!(!app.is_busy());
    }
}
