//! Local image library: the generated and enhanced directories.
//!
//! ## Rust concepts
//! - `fs::read_dir()` with `flatten()` to skip unreadable entries
//! - `serde::Serialize` so `images --json` can print entries directly
//! - `Iterator::max_by_key` to find the newest file

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One image file on disk.
#[derive(Clone, Debug, Serialize)]
pub struct ImageEntry {
    /// Filename (e.g., "art_20260101_080000.png")
    pub name: String,
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

/// Extensions the TV accepts.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
}

/// PNG and JPEG files in `dir`, sorted by name. A missing directory has
/// no images.
pub fn list_images(dir: &Path) -> Vec<ImageEntry> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(_) => return Vec::new(),
    };

    let mut entries: Vec<ImageEntry> = read_dir
        .flatten()
        .filter(|entry| entry.path().is_file() && is_supported_image(&entry.path()))
        .map(|entry| {
            let path = entry.path();
            let metadata = entry.metadata().ok();
            ImageEntry {
                name: path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned(),
                size: metadata.as_ref().map_or(0, |m| m.len()),
                modified: metadata
                    .and_then(|m| m.modified().ok())
                    .map(DateTime::<Local>::from),
                path,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// The most recently modified image across `dirs`.
pub fn latest_image(dirs: &[&Path]) -> Option<ImageEntry> {
    dirs.iter()
        .flat_map(|dir| list_images(dir))
        .max_by_key(|entry| entry.modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"fake").unwrap();
        path
    }

    fn set_age(path: &Path, secs_ago: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
            .unwrap();
    }

    #[test]
    fn lists_only_tv_formats() {
        let tmp = TempDir::new().unwrap();
        create_file(tmp.path(), "art_1.png");
        create_file(tmp.path(), "art_2.JPG");
        create_file(tmp.path(), "art_3.jpeg");
        create_file(tmp.path(), "art_4.webp");
        create_file(tmp.path(), "art_1_prompt.txt");
        std::fs::create_dir(tmp.path().join("nested.png")).unwrap();

        let names: Vec<String> = list_images(tmp.path()).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["art_1.png", "art_2.JPG", "art_3.jpeg"]);
    }

    #[test]
    fn entries_carry_size_and_time() {
        let tmp = TempDir::new().unwrap();
        create_file(tmp.path(), "a.png");

        let entries = list_images(tmp.path());
        assert_eq!(entries[0].size, 4);
        assert!(entries[0].modified.is_some());
        assert_eq!(entries[0].path, tmp.path().join("a.png"));
    }

    #[test]
    fn missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(list_images(&tmp.path().join("nope")).is_empty());
        assert!(latest_image(&[&tmp.path().join("nope")]).is_none());
    }

    #[test]
    fn latest_spans_directories() {
        let tmp = TempDir::new().unwrap();
        let generated = tmp.path().join("generated");
        let enhanced = tmp.path().join("enhanced");
        std::fs::create_dir_all(&generated).unwrap();
        std::fs::create_dir_all(&enhanced).unwrap();

        let old = create_file(&generated, "art_old.png");
        let new = create_file(&enhanced, "art_old_upscale-sharp.png");
        let older = create_file(&generated, "art_zzz.png");
        set_age(&old, 120);
        set_age(&new, 10);
        set_age(&older, 600);

        let latest = latest_image(&[&generated, &enhanced]).unwrap();
        assert_eq!(latest.path, new);
    }

    #[test]
    fn serializes_to_json() {
        let tmp = TempDir::new().unwrap();
        create_file(tmp.path(), "a.jpg");
        let json = serde_json::to_value(list_images(tmp.path())).unwrap();
        assert_eq!(json[0]["name"], "a.jpg");
        assert_eq!(json[0]["size"], 4);
    }
}
