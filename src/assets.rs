use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where the assets directory is looked for, nearest first.
pub const DEFAULT_CANDIDATES: &[&str] = &["assets", "../assets", "../../assets"];

/// Extensions the bundler treats as image assets.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "bmp", "webp", "psd"];

/// Return the first candidate (relative to `root`) that is an existing
/// directory.
pub fn probe<S: AsRef<str>>(root: &Path, candidates: &[S]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|candidate| root.join(candidate.as_ref()))
        .find(|path| path.is_dir())
}

/// Count image files below `dir`, recursively.
pub fn count_images<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> usize {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .count()
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|wanted| wanted.as_ref().eq_ignore_ascii_case(ext)),
        None => false,
    }
}
