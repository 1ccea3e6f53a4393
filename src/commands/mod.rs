pub mod check;
pub mod fix_assets;
pub mod inject;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{self, Config, CONFIG_FILE};

const PBXPROJ_FILE: &str = "project.pbxproj";

/// Locating options shared by every command that opens the project.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    /// Directory containing the `.xcodeproj` (usually `ios/`).
    pub root: PathBuf,
    /// Config file; defaults to `<root>/pbxinject.toml`.
    pub config: Option<PathBuf>,
    pub xcodeproj: Option<String>,
    pub target: Option<String>,
    pub group: Option<String>,
}

impl ProjectOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Everything a command needs, resolved from flags, config and the root.
#[derive(Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub pbxproj: PathBuf,
    pub target: String,
    pub group: String,
}

/// Load the config and work out which project, target and group to use.
/// Command line values win over config values.
pub fn resolve(options: &ProjectOptions) -> Result<Workspace> {
    let config_path = options
        .config
        .clone()
        .unwrap_or_else(|| options.root.join(CONFIG_FILE));
    let config = config::load_config(&config_path)?;

    let xcodeproj = match options.xcodeproj.clone().or_else(|| config.project.xcodeproj.clone()) {
        Some(xcodeproj) => xcodeproj,
        None => detect_xcodeproj(&options.root)?,
    };

    let target = match options.target.clone().or_else(|| config.project.target.clone()) {
        Some(target) => target,
        None => project_stem(&xcodeproj)?,
    };
    let group = options
        .group
        .clone()
        .or_else(|| config.project.group.clone())
        .unwrap_or_else(|| target.clone());

    let pbxproj = options.root.join(&xcodeproj).join(PBXPROJ_FILE);
    if !pbxproj.is_file() {
        anyhow::bail!("project file not found at {}", pbxproj.display());
    }

    Ok(Workspace {
        root: options.root.clone(),
        config,
        pbxproj,
        target,
        group,
    })
}

/// Find the single `*.xcodeproj` directory directly under `root`.
fn detect_xcodeproj(root: &Path) -> Result<String> {
    let entries = fs::read_dir(root)
        .context(format!("Failed to read directory {}", root.display()))?;

    let mut found: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(".xcodeproj"))
        .collect();
    found.sort();

    match found.len() {
        0 => anyhow::bail!(
            "no .xcodeproj found in {}. Pass --project or set project.xcodeproj in {}",
            root.display(),
            CONFIG_FILE
        ),
        1 => Ok(found.remove(0)),
        _ => anyhow::bail!(
            "multiple projects found in {} ({}). Pass --project to pick one",
            root.display(),
            found.join(", ")
        ),
    }
}

fn project_stem(xcodeproj: &str) -> Result<String> {
    Path::new(xcodeproj)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("cannot derive a target name from '{}'", xcodeproj))
}
