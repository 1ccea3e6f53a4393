use anyhow::{Context, Result};

use crate::commands::{resolve, ProjectOptions, Workspace};
use crate::inject::{build_files_for, find_file_by_name, find_folder_by_path};
use crate::pbxproj::{locate, Converter, ObjectGraph, ObjectId, ProjectFile};
use crate::report::Reporter;

/// State of one reference in the project.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceState {
    Missing,
    /// Present, with the number of resources build files pointing at it.
    Present { file_ref: ObjectId, build_files: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub resources_phase: Option<ObjectId>,
    pub bundle: ReferenceState,
    pub assets: ReferenceState,
}

/// Report whether the bundle and assets are wired into the project. Never
/// writes. Fails when the target, group or resources phase is missing.
pub fn execute(options: &ProjectOptions, quiet: bool) -> Result<CheckReport> {
    let ws = resolve(options)?;
    let converter = ws.config.converter.build();
    execute_with(&ws, converter.as_ref(), quiet)
}

pub fn execute_with(ws: &Workspace, converter: &dyn Converter, quiet: bool) -> Result<CheckReport> {
    let report = Reporter::new(quiet);

    let project = ProjectFile::load(&ws.pbxproj, converter)
        .context(format!("Failed to load {}", ws.pbxproj.display()))?;
    let graph = &project.objects;

    let (target, group) = locate(graph, &ws.target, &ws.group)?;
    report.success(format!("Target `{}` ({})", ws.target, target));
    report.success(format!("Group `{}` ({})", ws.group, group));

    let resources_phase = graph.resources_phase_of(&target)?;
    let bundle_ref = find_file_by_name(graph, &ws.config.bundle.name);
    let assets_ref = find_folder_by_path(graph, &ws.config.assets.name);

    let bundle = reference_state(graph, resources_phase.as_ref(), bundle_ref)?;
    let assets = reference_state(graph, resources_phase.as_ref(), assets_ref)?;

    print_state(&report, &ws.config.bundle.name, &bundle);
    print_state(&report, &ws.config.assets.name, &assets);

    if resources_phase.is_none() {
        report.failure(format!("target `{}` has no Resources build phase", ws.target));
        anyhow::bail!("Check failed");
    }

    report.finished("Checked", ws.pbxproj.display().to_string());

    Ok(CheckReport {
        resources_phase,
        bundle,
        assets,
    })
}

fn reference_state(
    graph: &ObjectGraph,
    phase: Option<&ObjectId>,
    file_ref: Option<ObjectId>,
) -> Result<ReferenceState> {
    let Some(file_ref) = file_ref else {
        return Ok(ReferenceState::Missing);
    };
    let build_files = match phase {
        Some(phase) => build_files_for(graph, phase, &file_ref)?,
        None => 0,
    };
    Ok(ReferenceState::Present { file_ref, build_files })
}

fn print_state(report: &Reporter, name: &str, state: &ReferenceState) {
    match state {
        ReferenceState::Missing => report.info(format!("{} is not in the project", name)),
        ReferenceState::Present { file_ref, build_files: 0 } => {
            report.warning(format!("{} ({}) is not in the Resources build phase", name, file_ref))
        }
        ReferenceState::Present { file_ref, build_files: 1 } => {
            report.success(format!("{} ({}) is copied as a resource", name, file_ref))
        }
        ReferenceState::Present { file_ref, build_files } => report.warning(format!(
            "{} ({}) is listed {} times in the Resources build phase",
            name, file_ref, build_files
        )),
    }
}
