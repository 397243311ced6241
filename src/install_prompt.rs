//! "Get the app" banner, suppressed for a week after it is dismissed.

use std::time::{Duration, Instant};

use crate::config::InstallPromptMode;
use crate::local_state::{LocalState, LocalStateError};

pub const STORAGE_KEY: &str = "apk_install_dismissed";
pub const DISMISS_DURATION_MS: i64 = 7 * 24 * 60 * 60 * 1000;
pub const SHOW_DELAY: Duration = Duration::from_secs(2);
pub const DOWNLOAD_URL: &str = "https://kronk.info/kronk.apk";

/// Whether the banner may be shown at all on this host right now.
///
/// `dismissed_at` is the stored millisecond timestamp; anything that does
/// not parse counts as never dismissed.
pub fn is_eligible(mode: InstallPromptMode, os: &str, dismissed_at: Option<&str>, now_ms: i64) -> bool {
    let platform_ok = match mode {
        InstallPromptMode::Never => false,
        InstallPromptMode::Always => true,
        InstallPromptMode::Auto => os == "android",
    };
    if !platform_ok {
        return false;
    }
    match dismissed_at.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(at) => now_ms - at >= DISMISS_DURATION_MS,
        None => true,
    }
}

#[derive(Debug)]
pub struct InstallPrompt {
    eligible: bool,
    visible: bool,
    started: Instant,
}

impl InstallPrompt {
    pub fn new(eligible: bool, started: Instant) -> Self {
        Self {
            eligible,
            visible: false,
            started,
        }
    }

    pub fn from_local_state(mode: InstallPromptMode, state: &LocalState, now: Instant) -> Self {
        let eligible = is_eligible(
            mode,
            std::env::consts::OS,
            state.get(STORAGE_KEY),
            chrono::Utc::now().timestamp_millis(),
        );
        Self::new(eligible, now)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Reveal the banner once the launch delay has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.eligible && !self.visible && now.duration_since(self.started) >= SHOW_DELAY {
            self.visible = true;
        }
    }

    /// Hide the banner and remember when, so it stays hidden for a week.
    pub fn dismiss(&mut self, state: &mut LocalState, now_ms: i64) -> Result<(), LocalStateError> {
        self.visible = false;
        self.eligible = false;
        state.set(STORAGE_KEY, now_ms.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn auto_mode_only_on_android() {
        assert!(is_eligible(InstallPromptMode::Auto, "android", None, NOW));
        assert!(!is_eligible(InstallPromptMode::Auto, "linux", None, NOW));
        assert!(is_eligible(InstallPromptMode::Always, "linux", None, NOW));
        assert!(!is_eligible(InstallPromptMode::Never, "android", None, NOW));
    }

    #[test]
    fn dismissal_suppresses_for_seven_days() {
        let recent = (NOW - DISMISS_DURATION_MS + 1).to_string();
        let old = (NOW - DISMISS_DURATION_MS).to_string();
        assert!(!is_eligible(InstallPromptMode::Always, "linux", Some(&recent), NOW));
        assert!(is_eligible(InstallPromptMode::Always, "linux", Some(&old), NOW));
        assert!(is_eligible(InstallPromptMode::Always, "linux", Some("garbage"), NOW));
    }

    #[test]
    fn appears_after_delay() {
        let start = Instant::now();
        let mut prompt = InstallPrompt::new(true, start);
        prompt.tick(start + Duration::from_millis(500));
        assert!(!prompt.is_visible());
        prompt.tick(start + SHOW_DELAY);
        assert!(prompt.is_visible());
    }

    #[test]
    fn ineligible_never_appears() {
        let start = Instant::now();
        let mut prompt = InstallPrompt::new(false, start);
        prompt.tick(start + Duration::from_secs(60));
        assert!(!prompt.is_visible());
    }

    #[test]
    fn dismiss_persists_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = LocalState::load(&path).unwrap();
        let start = Instant::now();
        let mut prompt = InstallPrompt::new(true, start);
        prompt.tick(start + SHOW_DELAY);

        prompt.dismiss(&mut state, NOW).unwrap();
        assert!(!prompt.is_visible());
        prompt.tick(start + Duration::from_secs(60));
        assert!(!prompt.is_visible());

        let reloaded = LocalState::load(&path).unwrap();
        assert_eq!(reloaded.get(STORAGE_KEY), Some(NOW.to_string().as_str()));
        assert!(!is_eligible(InstallPromptMode::Always, "android", reloaded.get(STORAGE_KEY), NOW + 1));
    }
}
