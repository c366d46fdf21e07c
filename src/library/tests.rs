use super::display::{display_name, format_duration};
use super::model::{Catalog, TrackHandle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn exts() -> Vec<String> {
    vec!["mp3".to_string()]
}

fn track(name: &str) -> TrackHandle {
    TrackHandle {
        path: PathBuf::from(format!("/tmp/{name}.mp3")),
        name: name.to_string(),
        duration: None,
    }
}

#[test]
fn display_name_strips_matched_extension_only() {
    assert_eq!(display_name(Path::new("/music/Rain.mp3"), &exts()), "Rain");
    assert_eq!(display_name(Path::new("/music/Rain.MP3"), &exts()), "Rain");
    assert_eq!(display_name(Path::new("/music/live.set.mp3"), &exts()), "live.set");
    assert_eq!(display_name(Path::new("/music/Rain.wav"), &exts()), "Rain.wav");
}

#[test]
fn format_duration_renders_minutes_and_seconds() {
    assert_eq!(format_duration(None), "-");
    assert_eq!(format_duration(Some(Duration::from_secs(5))), "0:05");
    assert_eq!(format_duration(Some(Duration::from_millis(125_900))), "2:05");
}

#[test]
fn choose_returns_none_for_empty_catalog() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(Catalog::default().choose(&mut rng).is_none());
}

#[test]
fn choose_only_returns_catalog_members() {
    let catalog = Catalog::new("/tmp", vec![track("a"), track("b")]);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let picked = catalog.choose(&mut rng).unwrap();
        assert!(picked.name == "a" || picked.name == "b");
    }
}

#[test]
fn read_bytes_returns_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.mp3");
    std::fs::write(&path, b"abc").unwrap();
    let handle = TrackHandle {
        path,
        name: "x".into(),
        duration: None,
    };
    assert_eq!(handle.read_bytes().unwrap(), b"abc");
}
