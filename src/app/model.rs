//! Application model types: `App`, `InputMode` and `Intent`.

use std::path::PathBuf;

use crate::config::Settings;
use crate::library::{Catalog, TrackHandle};
use crate::prefs::Theme;
use crate::scheduler::{DisplaySnapshot, SchedulerEvent, SchedulerState};

/// Which keys the UI is currently listening for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a folder path.
    FolderPrompt,
}

/// Something the user asked for, forwarded to the scheduling core.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    ChooseFolder(PathBuf),
    Play,
    Stop,
    SetVolume(f32),
    SetIntervalBounds { min_secs: i64, max_secs: i64 },
    ToggleTheme,
    Quit,
}

/// The main application model.
pub struct App {
    pub tracks: Vec<TrackHandle>,
    pub current_dir: Option<PathBuf>,

    /// Countdown, track and progress as last read from the scheduler.
    pub status: DisplaySnapshot,
    /// Track whose decode failed most recently; cleared once another plays.
    pub skipped: Option<String>,

    pub min_secs: i64,
    pub max_secs: i64,
    pub volume: f32,
    pub theme: Theme,

    pub input_mode: InputMode,
    pub folder_input: String,
    /// Last error shown in the error box; cleared by the next successful action.
    pub error: Option<String>,

    interval_step: i64,
    volume_step: f32,
}

impl App {
    /// Create an `App` seeded from settings and the restored theme.
    pub fn new(settings: &Settings, theme: Theme) -> Self {
        Self {
            tracks: Vec::new(),
            current_dir: None,

            status: DisplaySnapshot::default(),
            skipped: None,

            min_secs: settings.schedule.min_interval_secs,
            max_secs: settings.schedule.max_interval_secs,
            volume: settings.audio.volume.clamp(0.0, 1.0),
            theme,

            input_mode: InputMode::Normal,
            folder_input: String::new(),
            error: None,

            interval_step: settings.ui.interval_step_secs.max(1),
            volume_step: settings.audio.volume_step,
        }
    }

    /// Mirror one scheduler event into the display state.
    pub fn apply(&mut self, event: &SchedulerEvent) {
        let status = &mut self.status;
        match event {
            SchedulerEvent::StateChanged(state) => status.state = *state,
            SchedulerEvent::Countdown { remaining } => status.remaining = Some(*remaining),
            SchedulerEvent::Loading(name) => {
                status.loading = Some(name.clone());
                status.now_playing = None;
                status.progress = 0.0;
            }
            SchedulerEvent::NowPlaying(name) => {
                status.loading = None;
                status.now_playing = Some(name.clone());
                // A decode failure is stale once something plays again.
                if self.skipped.take().is_some() {
                    self.error = None;
                }
            }
            SchedulerEvent::DecodeFailed { track, reason } => {
                status.loading = None;
                self.error = Some(reason.clone());
                self.skipped = Some(track.clone());
            }
            SchedulerEvent::BoundsRejected(issues) => {
                status.remaining = None;
                self.skipped = None;
                self.error = Some(
                    issues
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
            }
            SchedulerEvent::Cleared => {
                status.remaining = None;
                status.now_playing = None;
                status.loading = None;
                status.progress = 0.0;
            }
        }
    }

    /// Replace the status with the scheduler's own view of this frame.
    pub fn sync(&mut self, snapshot: DisplaySnapshot) {
        self.status = snapshot;
    }

    /// Replace the track table with a freshly selected catalog.
    pub fn set_catalog(&mut self, catalog: &Catalog) {
        self.tracks = catalog.tracks().to_vec();
        self.current_dir = catalog.source().map(|p| p.to_path_buf());
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Play is offered only with tracks loaded and nothing scheduled.
    pub fn can_play(&self) -> bool {
        self.has_tracks() && self.status.state == SchedulerState::Idle
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.skipped = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.skipped = None;
    }

    /// Intent for nudging the minimum interval by `steps` increments.
    pub fn nudge_min(&mut self, steps: i64) -> Intent {
        self.min_secs = self
            .min_secs
            .saturating_add(steps.saturating_mul(self.interval_step));
        self.bounds_intent()
    }

    /// Intent for nudging the maximum interval by `steps` increments.
    pub fn nudge_max(&mut self, steps: i64) -> Intent {
        self.max_secs = self
            .max_secs
            .saturating_add(steps.saturating_mul(self.interval_step));
        self.bounds_intent()
    }

    pub fn volume_up(&mut self) -> Intent {
        self.volume = (self.volume + self.volume_step).clamp(0.0, 1.0);
        Intent::SetVolume(self.volume)
    }

    pub fn volume_down(&mut self) -> Intent {
        self.volume = (self.volume - self.volume_step).clamp(0.0, 1.0);
        Intent::SetVolume(self.volume)
    }

    /// Open the folder prompt, pre-filled with the current folder.
    pub fn open_folder_prompt(&mut self) {
        self.input_mode = InputMode::FolderPrompt;
        self.folder_input = self
            .current_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
    }

    pub fn cancel_folder_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.folder_input.clear();
    }

    pub fn push_folder_char(&mut self, c: char) {
        self.folder_input.push(c);
    }

    pub fn pop_folder_char(&mut self) {
        self.folder_input.pop();
    }

    /// Close the prompt and turn its contents into a folder choice.
    ///
    /// Blank input just closes the prompt.
    pub fn submit_folder_prompt(&mut self) -> Option<Intent> {
        self.input_mode = InputMode::Normal;
        let input = std::mem::take(&mut self.folder_input);
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Intent::ChooseFolder(PathBuf::from(trimmed)))
    }

    fn bounds_intent(&self) -> Intent {
        Intent::SetIntervalBounds {
            min_secs: self.min_secs,
            max_secs: self.max_secs,
        }
    }
}
