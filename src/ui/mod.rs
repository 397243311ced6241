pub mod alert;
pub mod command_bar;
pub mod help;
pub mod home;
pub mod html;
pub mod input;
pub mod install_prompt;
pub mod logo;
pub mod replies;
pub mod status;
pub mod status_bar;
pub mod status_card;
pub mod thread;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::app::{App, AppMode};
use crate::event::ViewKind;

use command_bar::CommandBar;
use alert::AlertPopup;
use help::HelpView;
use home::HomeView;
use install_prompt::{BANNER_HEIGHT, InstallBanner};
use logo::{Logo, LogoVariant};
use status::StatusView;
use status_bar::StatusBar;
use thread::ThreadView;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: header + main content + optional banner + status bar + optional input bar
    let bottom_height = if app.mode != AppMode::Normal { 2 } else { 1 };
    let banner_height = if app.install_prompt.is_visible() {
        BANNER_HEIGHT
    } else {
        0
    };

    let [header_area, main_area, banner_area, bottom_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(banner_height),
        Constraint::Length(bottom_height),
    ])
    .areas(area);

    frame.render_widget(Logo::new(LogoVariant::Symbol), header_area);

    // Split bottom into status bar and optional input bar
    if app.mode != AppMode::Normal {
        let [status_area, cmd_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(bottom_area);
        frame.render_widget(StatusBar::new(app), status_area);
        frame.render_widget(CommandBar::new(app), cmd_area);
    } else {
        frame.render_widget(StatusBar::new(app), bottom_area);
    }

    // Render the current view
    match app.current_view() {
        Some(ViewKind::Help) => {
            // Render the view underneath first, then overlay help.
            render_previous_view(frame, app, main_area);
            frame.render_widget(HelpView::new(), main_area);
        }
        Some(kind) => render_view(frame, app, kind, main_area),
        None => render_view(frame, app, &ViewKind::Home, main_area),
    }

    if banner_height > 0 {
        frame.render_widget(InstallBanner, banner_area);
    }

    // Alert popup overlay (renders on top of everything)
    if let Some(ref detail) = app.error_detail {
        frame.render_widget(AlertPopup::new(detail), frame.area());
    }
}

fn render_view(frame: &mut Frame, app: &App, kind: &ViewKind, area: Rect) {
    match kind {
        ViewKind::Home => {
            let instance = app.config.instance_url.as_str();
            frame.render_widget(HomeView::new(instance), area);
        }
        ViewKind::Status(_) => {
            frame.render_widget(StatusView::new(app), area);
        }
        ViewKind::Thread(_) => {
            let descendants = app.replies.as_ref().map_or(&[][..], |r| r.descendants.as_slice());
            frame.render_widget(
                ThreadView::new(app.subject.as_ref(), descendants, app),
                area,
            );
        }
        ViewKind::Help => {}
    }
}

/// Render the view underneath the current one (for overlay views like Help).
fn render_previous_view(frame: &mut Frame, app: &App, area: Rect) {
    if app.view_stack.len() < 2 {
        return;
    }

    let prev_view = &app.view_stack[app.view_stack.len() - 2];
    render_view(frame, app, &prev_view.kind, area);
}
