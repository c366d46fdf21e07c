//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Padding, Paragraph, Row, Table, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, InputMode};
use crate::config::UiSettings;
use crate::library::format_duration;
use crate::prefs::Theme;
use crate::scheduler::SchedulerState;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("o", "open folder");
    map.insert("p/enter", "play");
    map.insert("s", "stop");
    map.insert("+/-", "volume");
    map.insert("[/]", "min interval");
    map.insert("{/}", "max interval");
    map.insert("t", "theme");
    map.insert("q", "quit");
    map
});

/// Render the controls help text. Play is only listed when it would work.
fn controls_text(can_play: bool) -> String {
    let order = ["o", "p/enter", "s", "+/-", "[/]", "{/}", "t", "q"];
    order
        .iter()
        .filter(|k| can_play || **k != "p/enter")
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Colors for one theme.
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    urgent: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            fg: Color::Gray,
            bg: Color::Black,
            accent: Color::Cyan,
            urgent: Color::Red,
        },
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            urgent: Color::Red,
        },
    }
}

fn countdown_text(remaining: Option<u64>) -> String {
    match remaining {
        Some(secs) => format!("Next sound in {secs}s"),
        None => "Next sound: -".to_string(),
    }
}

fn state_text(state: SchedulerState) -> &'static str {
    match state {
        SchedulerState::Idle => "Idle",
        // Playing ends inside the pump that entered it.
        SchedulerState::Armed | SchedulerState::Playing => "Waiting",
    }
}

fn track_text(app: &App) -> String {
    match (&app.status.loading, &app.status.now_playing, &app.skipped) {
        (Some(name), _, _) => format!("Loading: {name}"),
        (None, Some(name), _) => format!("Playing: {name}"),
        (None, None, Some(name)) => format!("Skipped: {name}"),
        (None, None, None) => "Playing: -".to_string(),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let colors = palette(app.theme);
    let base = Style::default().fg(colors.fg).bg(colors.bg);
    frame.render_widget(Block::default().style(base), frame.area());

    let error_height = if app.error.is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(error_height),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.accent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" sound-randomizer ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let countdown_style = if app.status.urgent(ui_settings.urgency_threshold_secs) {
        Style::default().fg(colors.urgent).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let settings_line = {
        let mut parts: Vec<String> = Vec::new();
        parts.push(format!("Interval: {}-{}s", app.min_secs, app.max_secs));
        parts.push(format!("Volume: {:.0}%", app.volume * 100.0));
        parts.push(format!("Theme: {}", app.theme));
        if let Some(dir) = &app.current_dir {
            parts.push(format!("Dir: {}", dir.display()));
        }
        parts.join(" • ")
    };
    let status_lines = vec![
        Line::from(vec![
            Span::styled(countdown_text(app.status.remaining), countdown_style),
            Span::raw(format!(" • {}", state_text(app.status.state))),
        ]),
        Line::from(track_text(app)),
        Line::from(settings_line),
    ];
    let status_par = Paragraph::new(status_lines)
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Progress
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().fg(colors.accent).bg(colors.bg))
        .ratio(app.status.progress.clamp(0.0, 1.0));
    frame.render_widget(gauge, chunks[2]);

    // Track table
    let rows: Vec<Row> = app
        .tracks
        .iter()
        .map(|t| {
            let style = if app.status.now_playing.as_deref() == Some(t.name.as_str()) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(t.name.as_str()),
                Cell::from(format_duration(t.duration)),
            ])
            .style(style)
        })
        .collect();
    let table = Table::new(rows, [Constraint::Min(10), Constraint::Length(8)])
        .header(Row::new(vec!["Name", "Length"]).bold())
        .block(Block::default().borders(Borders::ALL).title(" tracks "));
    frame.render_widget(table, chunks[3]);

    // Error box
    if let Some(error) = &app.error {
        let error_par = Paragraph::new(error.as_str())
            .style(Style::default().fg(colors.urgent))
            .block(padded(" error "))
            .wrap(Wrap { trim: true });
        frame.render_widget(error_par, chunks[4]);
    }

    let footer = Paragraph::new(controls_text(app.can_play()))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    // Folder prompt overlay
    if app.input_mode == InputMode::FolderPrompt {
        let popup_area = centered_rect_sized(72, 3, chunks[3]);
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(format!("{}_", app.folder_input))
            .style(base)
            .block(padded(" folder (enter to load, esc to cancel) "));
        frame.render_widget(prompt, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use ratatui::{Terminal, backend::TestBackend};

    fn rendered(app: &App) -> String {
        let settings = Settings::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app, &settings.ui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn controls_hide_play_when_unavailable() {
        assert!(controls_text(true).contains("[p/enter] play"));
        assert!(!controls_text(false).contains("play"));
        assert!(controls_text(false).starts_with("[o] open folder"));
    }

    #[test]
    fn countdown_and_track_lines() {
        assert_eq!(countdown_text(Some(4)), "Next sound in 4s");
        assert_eq!(countdown_text(None), "Next sound: -");

        let mut app = App::new(&Settings::default(), Theme::Dark);
        assert_eq!(track_text(&app), "Playing: -");
        app.skipped = Some("broken".into());
        assert_eq!(track_text(&app), "Skipped: broken");
        app.status.loading = Some("rain".into());
        assert_eq!(track_text(&app), "Loading: rain");
    }

    #[test]
    fn draw_shows_status_errors_and_prompt() {
        let mut app = App::new(&Settings::default(), Theme::Light);
        app.status.remaining = Some(2);
        app.error = Some("cannot open folder /nope".into());
        app.input_mode = InputMode::FolderPrompt;
        app.folder_input = "/tmp/sounds".into();

        let screen = rendered(&app);
        assert!(screen.contains("Next sound in 2s"));
        assert!(screen.contains("cannot open folder /nope"));
        assert!(screen.contains("/tmp/sounds_"));
        assert!(screen.contains("Theme: light"));
    }

    #[test]
    fn countdown_turns_urgent_at_the_configured_threshold() {
        let settings = Settings::default();
        let threshold = settings.ui.urgency_threshold_secs;
        let countdown_color = |remaining: u64| {
            let mut app = App::new(&settings, Theme::Dark);
            app.status.remaining = Some(remaining);
            let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
            terminal.draw(|f| draw(f, &app, &settings.ui)).unwrap();
            // First character of "Next sound in", inside the status box.
            terminal.backend().buffer()[(2, 4)].fg
        };

        assert_eq!(countdown_color(threshold), Color::Red);
        assert_ne!(countdown_color(threshold + 1), Color::Red);
    }

    #[test]
    fn playing_is_labelled_like_armed() {
        assert_eq!(state_text(SchedulerState::Playing), state_text(SchedulerState::Armed));
        assert_eq!(state_text(SchedulerState::Idle), "Idle");
    }
}
