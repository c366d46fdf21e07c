use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use rodio::OutputStreamBuilder;
use tracing::{info, warn};

use crate::app::{App, Intent};
use crate::audio::{PlaybackController, RodioEngine};
use crate::config;
use crate::countdown::{Countdown, WallClock};
use crate::prefs::{self, FileStore, MemoryStore, PreferenceStore};
use crate::scheduler::Scheduler;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    startup::init_logging();
    let settings = settings::load_settings();

    let mut prefs: Box<dyn PreferenceStore> = match config::resolve_prefs_path() {
        Some(path) => {
            let store = FileStore::open_or_empty(path);
            info!(path = %store.path().display(), "preferences");
            Box::new(store)
        }
        None => {
            warn!("no state directory; preferences will not be saved");
            Box::new(MemoryStore::default())
        }
    };
    let theme = prefs::load_theme(prefs.as_ref());

    // The stream must outlive every voice started on its mixer.
    let mut stream = OutputStreamBuilder::open_default_stream()?;
    stream.log_on_drop(false);
    let engine = Arc::new(RodioEngine::new(stream.mixer().clone()));

    let playback = PlaybackController::new(engine, StdRng::from_entropy(), settings.audio.volume);
    let clock = WallClock::new(Duration::from_millis(settings.schedule.tick_ms));
    let mut scheduler = Scheduler::new(
        playback,
        Countdown::new(Arc::new(clock)),
        &settings.schedule,
        StdRng::from_entropy(),
    );
    let subscription = scheduler.subscribe();

    let mut app = App::new(&settings, theme);
    info!("sound-randomizer starting");

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        // An optional folder on the command line is loaded as if chosen.
        if let Some(dir) = env::args_os().nth(1) {
            event_loop::handle_intent(
                Intent::ChooseFolder(PathBuf::from(dir)),
                &settings,
                &mut app,
                &mut scheduler,
                prefs.as_mut(),
            );
        }

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut scheduler,
            &subscription.events,
            prefs.as_mut(),
        )
    })();

    scheduler.unsubscribe(subscription.id);
    scheduler.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
