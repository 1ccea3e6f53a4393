use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::assets;
use crate::pbxproj::{Converter, JsonFile, Plutil};

pub const CONFIG_FILE: &str = "pbxinject.toml";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub fix_assets: FixAssetsConfig,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ProjectConfig {
    /// `.xcodeproj` directory relative to the root. Auto-detected when unset.
    pub xcodeproj: Option<String>,
    /// Native target name. Defaults to the `.xcodeproj` stem.
    pub target: Option<String>,
    /// Group receiving the references. Defaults to the target name.
    pub group: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BundleConfig {
    #[serde(default = "default_bundle_name")]
    pub name: String,
    #[serde(default = "default_bundle_file_type")]
    pub file_type: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            name: default_bundle_name(),
            file_type: default_bundle_file_type(),
        }
    }
}

fn default_bundle_name() -> String {
    "main.jsbundle".to_string()
}

fn default_bundle_file_type() -> String {
    "text".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Name and path recorded in the project, whichever candidate was found.
    #[serde(default = "default_assets_name")]
    pub name: String,
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: default_assets_name(),
            candidates: default_candidates(),
            extensions: default_extensions(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_assets_name() -> String {
    "assets".to_string()
}

fn default_candidates() -> Vec<String> {
    assets::DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    assets::IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    #[default]
    Plutil,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConverterConfig {
    #[serde(default)]
    pub kind: ConverterKind,
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            kind: ConverterKind::default(),
            program: default_program(),
            output_format: default_output_format(),
        }
    }
}

fn default_program() -> String {
    "plutil".to_string()
}

fn default_output_format() -> String {
    "xml1".to_string()
}

impl ConverterConfig {
    pub fn build(&self) -> Box<dyn Converter> {
        match self.kind {
            ConverterKind::Plutil => Box::new(Plutil {
                program: self.program.clone(),
                output_format: self.output_format.clone(),
            }),
            ConverterKind::Json => Box::new(JsonFile),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FixAssetsConfig {
    /// Source files to rewrite. Empty means every script file in the root.
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default = "default_folders")]
    pub folders: Vec<String>,
}

impl Default for FixAssetsConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            folders: default_folders(),
        }
    }
}

fn default_folders() -> Vec<String> {
    ["Pro", "Profile", "Settings", "Search", "Diary", "Onboarding"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Load `pbxinject.toml`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => anyhow::bail!("failed to read `{}`: {}", path.display(), e),
    };

    let config = parse_config(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse `{}`: {}", path.display(), e))?;

    Ok(config)
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    for (field, value) in [
        ("project.target", config.project.target.as_deref()),
        ("project.group", config.project.group.as_deref()),
        ("project.xcodeproj", config.project.xcodeproj.as_deref()),
    ] {
        if let Some(value) = value {
            validate_name(field, value)?;
        }
    }

    validate_name("bundle.name", &config.bundle.name)?;
    if config.bundle.name.contains('/') {
        anyhow::bail!(
            "bundle.name '{}' must be a file name, not a path",
            config.bundle.name
        );
    }
    validate_name("bundle.file_type", &config.bundle.file_type)?;
    validate_name("assets.name", &config.assets.name)?;

    if config.converter.kind == ConverterKind::Plutil {
        validate_name("converter.program", &config.converter.program)?;
        if !["xml1", "binary1", "json"].contains(&config.converter.output_format.as_str()) {
            anyhow::bail!(
                "converter.output_format '{}' must be one of xml1, binary1, json",
                config.converter.output_format
            );
        }
    }

    for folder in &config.fix_assets.folders {
        validate_name("fix_assets.folders", folder)?;
        if folder.contains('/') {
            anyhow::bail!("fix_assets.folders entry '{}' must be a single directory name", folder);
        }
    }

    Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{} must not be empty", field);
    }
    Ok(())
}
