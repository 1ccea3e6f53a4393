//! Rewrites bundler `require()` paths so images resolve from the assets
//! directory that gets copied into the app.
//!
//! `require('./Diary/Parts/cake.png')` becomes
//! `require('./assets/Diary/Parts/cake.png')` for every configured folder.
//! Rewritten paths no longer match, so running it again changes nothing.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SCRIPT_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js"];

pub struct AssetPathFixer {
    pattern: Regex,
    replacement: String,
}

impl AssetPathFixer {
    pub fn new<S: AsRef<str>>(folders: &[S], assets_dir: &str) -> Result<Self> {
        if folders.is_empty() {
            anyhow::bail!("no asset folders configured");
        }

        let alternation = folders
            .iter()
            .map(|f| regex::escape(f.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r#"require\((?P<quote>['"`])\./(?P<folder>{})/"#, alternation))
            .context("Failed to build asset path pattern")?;

        let replacement = format!(
            "require(${{quote}}./{}/${{folder}}/",
            assets_dir.replace('$', "$$")
        );

        Ok(Self { pattern, replacement })
    }

    /// Returns the rewritten source and the number of paths changed.
    pub fn fix(&self, source: &str) -> (String, usize) {
        let changes = self.pattern.find_iter(source).count();
        if changes == 0 {
            return (source.to_string(), 0);
        }
        let fixed = self.pattern.replace_all(source, self.replacement.as_str());
        (fixed.into_owned(), changes)
    }
}

/// Top-level script files in `root`, sorted.
pub fn discover_sources(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
        })
        .collect();
    files.sort();
    files
}
