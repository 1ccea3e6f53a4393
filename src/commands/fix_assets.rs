use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::{self, CONFIG_FILE};
use crate::fix_assets::{discover_sources, AssetPathFixer};
use crate::report::Reporter;

#[derive(Debug, Clone, Default)]
pub struct FixAssetsOptions {
    /// Directory holding the app's script sources.
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub quiet: bool,
}

/// Rewrite asset `require()` paths. Returns the total number of changes.
pub fn execute(options: &FixAssetsOptions) -> Result<usize> {
    let report = Reporter::new(options.quiet);
    let config_path = options
        .config
        .clone()
        .unwrap_or_else(|| options.root.join(CONFIG_FILE));
    let config = config::load_config(&config_path)?;

    let fixer = AssetPathFixer::new(&config.fix_assets.folders, &config.assets.name)?;

    let files: Vec<PathBuf> = if config.fix_assets.files.is_empty() {
        discover_sources(&options.root)
    } else {
        config
            .fix_assets
            .files
            .iter()
            .map(|f| options.root.join(f))
            .collect()
    };

    let mut total = 0;
    for path in &files {
        if !path.is_file() {
            report.warning(format!("{}: file not found", path.display()));
            continue;
        }

        let source = fs::read_to_string(path)
            .context(format!("Failed to read {}", path.display()))?;
        let (fixed, changes) = fixer.fix(&source);

        if changes == 0 {
            report.success(format!("{}: no changes needed", path.display()));
            continue;
        }

        if !options.dry_run {
            fs::write(path, fixed).context(format!("Failed to write {}", path.display()))?;
        }
        report.success(format!("Fixed {}: {} changes", path.display(), changes));
        total += changes;
    }

    let suffix = if options.dry_run { " (dry run)" } else { "" };
    report.finished("Fixed", format!("{} asset path(s){}", total, suffix));

    Ok(total)
}
