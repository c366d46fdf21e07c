mod app;
mod audio;
mod config;
mod countdown;
mod error;
mod library;
mod prefs;
mod runtime;
mod scheduler;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
