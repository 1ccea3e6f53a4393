pub mod assets;
pub mod commands;
pub mod config;
pub mod error;
pub mod fix_assets;
pub mod inject;
pub mod pbxproj;
pub mod report;
