use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::assets;
use crate::commands::{resolve, ProjectOptions, Workspace};
use crate::config::AssetsConfig;
use crate::inject::{inject_file, inject_folder, FileSpec, InjectOutcome};
use crate::pbxproj::{locate, Converter, ObjectId, ProjectFile};
use crate::report::Reporter;

#[derive(Debug, Clone, Default)]
pub struct InjectOptions {
    pub project: ProjectOptions,
    pub skip_assets: bool,
    pub dry_run: bool,
    pub quiet: bool,
}

/// What happened to the optional assets step.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetsStatus {
    Disabled,
    NotFound,
    Injected {
        dir: PathBuf,
        images: usize,
        outcome: InjectOutcome,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InjectSummary {
    pub bundle: InjectOutcome,
    pub assets: AssetsStatus,
}

/// Add the script bundle (mandatory) and the assets folder (optional) to the
/// project. Any error returned here means the bundle step failed; assets
/// problems are reported and recorded in the summary instead.
pub fn execute(options: &InjectOptions) -> Result<InjectSummary> {
    let ws = resolve(&options.project)?;
    let converter = ws.config.converter.build();
    execute_with(&ws, converter.as_ref(), options)
}

pub fn execute_with(ws: &Workspace, converter: &dyn Converter, options: &InjectOptions) -> Result<InjectSummary> {
    let report = Reporter::new(options.quiet);

    let mut project = ProjectFile::load(&ws.pbxproj, converter)
        .context(format!("Failed to load {}", ws.pbxproj.display()))?;

    let (target, group) = match locate(&project.objects, &ws.target, &ws.group) {
        Ok(found) => found,
        Err(e) if e.is_locator() => {
            report.failure("Could not find main target or source group");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let bundle = inject_bundle(ws, &mut project, &target, &group, &report)?;
    if bundle.changed() && !options.dry_run {
        project
            .save(converter)
            .context(format!("Failed to write {}", project.path().display()))?;
    }

    let assets = if options.skip_assets || !ws.config.assets.enabled {
        AssetsStatus::Disabled
    } else {
        inject_assets(ws, converter, &mut project, &target, &group, options.dry_run, &report)
    };

    if options.dry_run {
        report.info("dry run, project file left untouched");
    }

    Ok(InjectSummary { bundle, assets })
}

fn inject_bundle(
    ws: &Workspace,
    project: &mut ProjectFile,
    target: &ObjectId,
    group: &ObjectId,
    report: &Reporter,
) -> Result<InjectOutcome> {
    let bundle = &ws.config.bundle;
    let spec = FileSpec::file(&bundle.name, &bundle.file_type);

    let outcome = inject_file(&mut project.objects, group, target, &spec)
        .context(format!("Failed to add {} to the project", bundle.name))?;

    match &outcome {
        InjectOutcome::AlreadyPresent(_) => {
            report.success(format!("{} already exists in project", bundle.name));
        }
        InjectOutcome::Inserted { file_ref, .. } => {
            report.success(format!("Added {} to Xcode project (FileRef: {})", bundle.name, file_ref));
        }
    }

    Ok(outcome)
}

/// Probe, count, merge and save the assets folder. Never fails the run.
fn inject_assets(
    ws: &Workspace,
    converter: &dyn Converter,
    project: &mut ProjectFile,
    target: &ObjectId,
    group: &ObjectId,
    dry_run: bool,
    report: &Reporter,
) -> AssetsStatus {
    let settings: &AssetsConfig = &ws.config.assets;

    let Some(dir) = assets::probe(&ws.root, &settings.candidates) else {
        report.info(format!(
            "no {} directory found, skipping (looked in {})",
            settings.name,
            settings.candidates.join(", ")
        ));
        return AssetsStatus::NotFound;
    };

    let images = assets::count_images(&dir, &settings.extensions);
    report.success(format!("Found {} directory at {} ({} images)", settings.name, dir.display(), images));

    let spec = FileSpec::folder(&settings.name);
    let outcome = match inject_folder(&mut project.objects, group, target, &spec) {
        Ok(outcome) => outcome,
        Err(e) => {
            report.warning(format!("could not add {} folder: {}", settings.name, e));
            return AssetsStatus::Failed(e.to_string());
        }
    };

    match &outcome {
        InjectOutcome::AlreadyPresent(_) => {
            report.success(format!("{} folder already exists in project", settings.name));
        }
        InjectOutcome::Inserted { file_ref, build_file } => {
            report.success(format!("Added {} folder to Xcode project (FileRef: {})", settings.name, file_ref));
            if build_file.is_none() {
                report.warning(format!(
                    "target `{}` has no Resources build phase; {} is only listed in group `{}`",
                    ws.target, settings.name, ws.group
                ));
            }
        }
    }

    if outcome.changed() && !dry_run {
        if let Err(e) = project.save(converter) {
            report.warning(format!(
                "could not save {} after adding {}: {}",
                project.path().display(),
                settings.name,
                e
            ));
            return AssetsStatus::Failed(e.to_string());
        }
    }

    AssetsStatus::Injected { dir, images, outcome }
}
