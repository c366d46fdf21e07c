use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::{App, InputMode, Intent};
use crate::audio::AudioEngine;
use crate::config;
use crate::error::Error;
use crate::library;
use crate::prefs::{self, PreferenceStore};
use crate::scheduler::{IntervalBounds, Scheduler, SchedulerEvent};
use crate::ui;

/// Main terminal event loop: pumps the scheduler, mirrors its events into
/// `app`, draws and handles input. Returns `Ok(())` when quit is requested.
pub fn run<E: AudioEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    scheduler: &mut Scheduler<E>,
    events: &Receiver<SchedulerEvent>,
    prefs: &mut dyn PreferenceStore,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        sync_app(app, scheduler, events);

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(intent) = map_key(key, app) {
                    if handle_intent(intent, settings, app, scheduler, prefs) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Drain scheduler signals and copy the results into the display model.
fn sync_app<E: AudioEngine>(
    app: &mut App,
    scheduler: &mut Scheduler<E>,
    events: &Receiver<SchedulerEvent>,
) {
    scheduler.pump();
    for event in events.try_iter() {
        app.apply(&event);
    }
    app.sync(scheduler.snapshot());
}

/// Translate a key press into an intent, updating prompt/edit state on `app`.
fn map_key(key: KeyEvent, app: &mut App) -> Option<Intent> {
    if app.input_mode == InputMode::FolderPrompt {
        match key.code {
            KeyCode::Esc => app.cancel_folder_prompt(),
            KeyCode::Backspace => app.pop_folder_char(),
            KeyCode::Enter => return app.submit_folder_prompt(),
            KeyCode::Char(c) if !c.is_control() => app.push_folder_char(c),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Intent::Quit),
        KeyCode::Char('q') => Some(Intent::Quit),
        KeyCode::Char('o') => {
            app.open_folder_prompt();
            None
        }
        KeyCode::Char('p') | KeyCode::Enter => app.can_play().then_some(Intent::Play),
        KeyCode::Char('s') => Some(Intent::Stop),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(app.volume_up()),
        KeyCode::Char('-') => Some(app.volume_down()),
        KeyCode::Char('[') => Some(app.nudge_min(-1)),
        KeyCode::Char(']') => Some(app.nudge_min(1)),
        KeyCode::Char('{') => Some(app.nudge_max(-1)),
        KeyCode::Char('}') => Some(app.nudge_max(1)),
        KeyCode::Char('t') => Some(Intent::ToggleTheme),
        _ => None,
    }
}

/// Apply one intent. Returns `true` when the app should exit.
pub(super) fn handle_intent<E: AudioEngine>(
    intent: Intent,
    settings: &config::Settings,
    app: &mut App,
    scheduler: &mut Scheduler<E>,
    prefs: &mut dyn PreferenceStore,
) -> bool {
    match intent {
        Intent::ChooseFolder(path) => choose_folder(&path, settings, app, scheduler),
        Intent::Play => match scheduler.start() {
            Ok(()) => app.clear_error(),
            // The rejection also arrives as an event and fills the error box.
            Err(error) => debug!(%error, "play rejected"),
        },
        Intent::Stop => scheduler.stop(),
        Intent::SetVolume(volume) => {
            scheduler.set_volume(volume);
            app.volume = scheduler.volume();
        }
        Intent::SetIntervalBounds { min_secs, max_secs } => {
            scheduler.set_bounds(IntervalBounds::new(min_secs, max_secs));
        }
        Intent::ToggleTheme => {
            app.theme = app.theme.toggled();
            if let Err(error) = prefs::save_theme(prefs, app.theme) {
                warn!(%error, "theme not saved");
            }
        }
        Intent::Quit => return true,
    }
    false
}

/// Stop, check bounds, scan `path` and start scheduling if it has tracks.
///
/// On any failure the previous catalog stays in place.
fn choose_folder<E: AudioEngine>(
    path: &Path,
    settings: &config::Settings,
    app: &mut App,
    scheduler: &mut Scheduler<E>,
) {
    scheduler.stop();

    if let Err(issues) = scheduler.bounds().validate(settings.schedule.ceiling_secs) {
        app.set_error(Error::InvalidIntervalBounds(issues).to_string());
        return;
    }

    let catalog = match library::select_folder(path, &settings.library) {
        Ok(catalog) => catalog,
        Err(error) => {
            warn!(%error, "folder selection failed");
            app.set_error(error.to_string());
            return;
        }
    };

    app.clear_error();
    scheduler.set_catalog(catalog);
    app.set_catalog(scheduler.catalog());

    info!(dir = %path.display(), tracks = scheduler.catalog().len(), "folder selected");
    if scheduler.catalog().is_empty() {
        app.set_error(format!("no audio files found in {}", path.display()));
        return;
    }
    if let Err(error) = scheduler.start() {
        debug!(%error, "scheduling rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PlaybackController;
    use crate::audio::fake::FakeEngine;
    use crate::countdown::{Countdown, ManualClock};
    use crate::prefs::{MemoryStore, THEME_KEY, Theme};
    use crate::scheduler::SchedulerState;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fixture() -> (App, Scheduler<FakeEngine>, config::Settings) {
        let settings = config::Settings::default();
        let (clock, _pulse) = ManualClock::new();
        let playback = PlaybackController::new(
            Arc::new(FakeEngine::default()),
            StdRng::seed_from_u64(5),
            settings.audio.volume,
        );
        let scheduler = Scheduler::new(
            playback,
            Countdown::new(clock),
            &settings.schedule,
            StdRng::seed_from_u64(6),
        );
        (App::new(&settings, Theme::Dark), scheduler, settings)
    }

    #[test]
    fn keys_map_to_intents() {
        let (mut app, _scheduler, _settings) = fixture();
        assert_eq!(map_key(key(KeyCode::Char('q')), &mut app), Some(Intent::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut app),
            Some(Intent::Quit)
        );
        assert_eq!(map_key(key(KeyCode::Char('s')), &mut app), Some(Intent::Stop));
        assert_eq!(map_key(key(KeyCode::Char('t')), &mut app), Some(Intent::ToggleTheme));
        assert_eq!(
            map_key(key(KeyCode::Char(']')), &mut app),
            Some(Intent::SetIntervalBounds {
                min_secs: 11,
                max_secs: 60
            })
        );
        assert!(matches!(
            map_key(key(KeyCode::Char('-')), &mut app),
            Some(Intent::SetVolume(_))
        ));
        // Nothing loaded yet, so play is not offered.
        assert_eq!(map_key(key(KeyCode::Char('p')), &mut app), None);
        assert_eq!(map_key(key(KeyCode::Char('x')), &mut app), None);
    }

    #[test]
    fn folder_prompt_captures_keys_until_enter() {
        let (mut app, _scheduler, _settings) = fixture();
        assert_eq!(map_key(key(KeyCode::Char('o')), &mut app), None);
        assert_eq!(app.input_mode, InputMode::FolderPrompt);

        for c in "/q".chars() {
            assert_eq!(map_key(key(KeyCode::Char(c)), &mut app), None);
        }
        assert_eq!(
            map_key(key(KeyCode::Enter), &mut app),
            Some(Intent::ChooseFolder("/q".into()))
        );
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn choosing_a_folder_with_tracks_starts_scheduling() {
        let (mut app, mut scheduler, settings) = fixture();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rain.mp3"), b"ok").unwrap();

        let quit = handle_intent(
            Intent::ChooseFolder(dir.path().to_path_buf()),
            &settings,
            &mut app,
            &mut scheduler,
            &mut MemoryStore::default(),
        );
        assert!(!quit);
        assert_eq!(app.tracks.len(), 1);
        assert_eq!(scheduler.catalog().len(), 1);
        assert_eq!(scheduler.state(), SchedulerState::Armed);
        assert!(app.error.is_none());
    }

    #[test]
    fn failed_folder_choice_keeps_the_previous_catalog() {
        let (mut app, mut scheduler, settings) = fixture();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rain.mp3"), b"ok").unwrap();
        let mut store = MemoryStore::default();
        handle_intent(
            Intent::ChooseFolder(dir.path().to_path_buf()),
            &settings,
            &mut app,
            &mut scheduler,
            &mut store,
        );

        handle_intent(
            Intent::ChooseFolder(dir.path().join("missing")),
            &settings,
            &mut app,
            &mut scheduler,
            &mut store,
        );
        assert!(app.error.as_deref().unwrap().contains("cannot open folder"));
        assert_eq!(app.tracks.len(), 1);
        assert_eq!(scheduler.catalog().len(), 1);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn invalid_bounds_block_folder_selection() {
        let (mut app, mut scheduler, settings) = fixture();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rain.mp3"), b"ok").unwrap();
        handle_intent(
            Intent::SetIntervalBounds {
                min_secs: 0,
                max_secs: 60,
            },
            &settings,
            &mut app,
            &mut scheduler,
            &mut MemoryStore::default(),
        );

        handle_intent(
            Intent::ChooseFolder(dir.path().to_path_buf()),
            &settings,
            &mut app,
            &mut scheduler,
            &mut MemoryStore::default(),
        );
        assert!(app.error.as_deref().unwrap().contains("greater than zero"));
        assert!(app.tracks.is_empty());
        assert!(scheduler.catalog().is_empty());
    }

    #[test]
    fn empty_folder_is_reported_and_nothing_starts() {
        let (mut app, mut scheduler, settings) = fixture();
        let dir = tempfile::tempdir().unwrap();

        handle_intent(
            Intent::ChooseFolder(dir.path().to_path_buf()),
            &settings,
            &mut app,
            &mut scheduler,
            &mut MemoryStore::default(),
        );
        assert!(app.error.as_deref().unwrap().starts_with("no audio files"));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn theme_toggle_is_persisted_and_quit_exits() {
        let (mut app, mut scheduler, settings) = fixture();
        let mut store = MemoryStore::default();

        assert!(!handle_intent(Intent::ToggleTheme, &settings, &mut app, &mut scheduler, &mut store));
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));

        assert!(handle_intent(Intent::Quit, &settings, &mut app, &mut scheduler, &mut store));
    }

    #[test]
    fn volume_and_bounds_reach_the_scheduler() {
        let (mut app, mut scheduler, settings) = fixture();
        let mut store = MemoryStore::default();

        handle_intent(Intent::SetVolume(0.3), &settings, &mut app, &mut scheduler, &mut store);
        assert_eq!(scheduler.volume(), 0.3);
        assert_eq!(app.volume, 0.3);

        handle_intent(
            Intent::SetIntervalBounds {
                min_secs: 2,
                max_secs: 4,
            },
            &settings,
            &mut app,
            &mut scheduler,
            &mut store,
        );
        assert_eq!(scheduler.bounds(), IntervalBounds::new(2, 4));
    }

    #[test]
    fn sync_app_mirrors_scheduler_events() {
        let (mut app, mut scheduler, _settings) = fixture();
        let sub = scheduler.subscribe();
        scheduler.set_bounds(IntervalBounds::new(0, 1));
        assert!(scheduler.start().is_err());

        sync_app(&mut app, &mut scheduler, &sub.events);
        assert!(app.error.as_deref().unwrap().contains("greater than zero"));
        assert_eq!(app.status.state, SchedulerState::Idle);
    }

    #[test]
    fn sync_app_takes_the_display_from_the_snapshot() {
        let (mut app, mut scheduler, settings) = fixture();
        let sub = scheduler.subscribe();
        scheduler.set_bounds(IntervalBounds::new(2, 2));
        scheduler.start().unwrap();

        // A stale value left by an event is overwritten by the snapshot.
        app.status.loading = Some("stale".into());
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while app.status.remaining.is_none() && std::time::Instant::now() < deadline {
            sync_app(&mut app, &mut scheduler, &sub.events);
            std::thread::sleep(Duration::from_millis(1));
        }

        assert_eq!(app.status, scheduler.snapshot());
        assert_eq!(app.status.remaining, Some(2));
        assert!(app.status.loading.is_none());
        assert_eq!(app.status.state, SchedulerState::Armed);
        assert!(app.status.urgent(settings.ui.urgency_threshold_secs));
    }
}
