mod common;

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::cell::Cell;
use std::path::Path;

use common::{list, records_where, sample_project, Fixture, APP_GROUP, RESOURCES_PHASE};
use pbxinject::commands::inject::{self, AssetsStatus, InjectOptions};
use pbxinject::commands::{resolve, ProjectOptions};
use pbxinject::error::{InjectError, InjectResult};
use pbxinject::inject::InjectOutcome;
use pbxinject::pbxproj::{Converter, JsonFile};

fn options(fixture: &Fixture) -> InjectOptions {
    InjectOptions {
        project: ProjectOptions::new(fixture.root()),
        quiet: true,
        ..InjectOptions::default()
    }
}

#[test]
fn test_inject_adds_bundle_and_assets() -> Result<()> {
    let fixture = Fixture::new(sample_project(true));
    fixture.add_assets("assets", &["Diary/Parts/cake.png", "Pro/badge.jpg", "notes.txt"]);

    let summary = inject::execute(&options(&fixture))?;
    assert!(summary.bundle.changed());
    let AssetsStatus::Injected { images, outcome, .. } = &summary.assets else {
        panic!("assets should have been injected");
    };
    assert_eq!(*images, 2);
    assert!(outcome.changed());

    let project = fixture.read_project();
    let bundle_refs = records_where(&project, "PBXFileReference", "name", "main.jsbundle");
    let asset_refs = records_where(&project, "PBXFileReference", "path", "assets");
    assert_eq!(bundle_refs.len(), 1);
    assert_eq!(asset_refs.len(), 1);
    assert_eq!(project["objects"][&asset_refs[0]]["lastKnownFileType"], "folder");
    assert_eq!(project["objects"][&bundle_refs[0]]["sourceTree"], "<group>");

    let children = list(&project, APP_GROUP, "children");
    assert_eq!(children.len(), 3);
    assert!(children.contains(&bundle_refs[0]));
    assert!(children.contains(&asset_refs[0]));

    let files = list(&project, RESOURCES_PHASE, "files");
    assert_eq!(files.len(), 2);
    for file_ref in [&bundle_refs[0], &asset_refs[0]] {
        let wrappers = records_where(&project, "PBXBuildFile", "fileRef", file_ref);
        assert_eq!(wrappers.len(), 1);
        assert_eq!(files.iter().filter(|f| **f == wrappers[0]).count(), 1);
    }
    Ok(())
}

#[test]
fn test_passthrough_data_is_preserved() -> Result<()> {
    let original = sample_project(true);
    let fixture = Fixture::new(original.clone());

    inject::execute(&options(&fixture))?;

    let project = fixture.read_project();
    for field in ["archiveVersion", "classes", "objectVersion", "rootObject"] {
        assert_eq!(project[field], original[field]);
    }
    for (id, record) in original["objects"].as_object().unwrap() {
        if id == APP_GROUP || id == RESOURCES_PHASE {
            continue;
        }
        assert_eq!(&project["objects"][id], record, "record {} changed", id);
    }
    Ok(())
}

#[test]
fn test_second_run_changes_nothing() -> Result<()> {
    let fixture = Fixture::new(sample_project(true));
    fixture.add_assets("assets", &["logo.png"]);

    inject::execute(&options(&fixture))?;
    let after_first = fixture.raw_project();

    let summary = inject::execute(&options(&fixture))?;
    assert!(matches!(summary.bundle, InjectOutcome::AlreadyPresent(_)));
    assert!(matches!(
        summary.assets,
        AssetsStatus::Injected { outcome: InjectOutcome::AlreadyPresent(_), .. }
    ));
    assert_eq!(fixture.raw_project(), after_first);
    Ok(())
}

#[test]
fn test_missing_assets_is_not_an_error() -> Result<()> {
    let fixture = Fixture::new(sample_project(true));

    let summary = inject::execute(&options(&fixture))?;

    assert!(summary.bundle.changed());
    assert_eq!(summary.assets, AssetsStatus::NotFound);
    let project = fixture.read_project();
    assert!(records_where(&project, "PBXFileReference", "path", "assets").is_empty());
    Ok(())
}

#[test]
fn test_assets_found_higher_up_recorded_as_assets() -> Result<()> {
    let fixture = Fixture::new(sample_project(true));
    let dir = fixture.add_assets("../assets", &["a.png"]);

    let summary = inject::execute(&options(&fixture))?;

    let AssetsStatus::Injected { dir: found, .. } = summary.assets else {
        panic!("assets should have been found");
    };
    assert_eq!(found, dir);
    let project = fixture.read_project();
    let refs = records_where(&project, "PBXFileReference", "path", "assets");
    assert_eq!(refs.len(), 1);
    assert_eq!(project["objects"][&refs[0]]["name"], "assets");
    Ok(())
}

#[test]
fn test_no_assets_flag_skips_assets() -> Result<()> {
    let fixture = Fixture::new(sample_project(true));
    fixture.add_assets("assets", &["a.png"]);

    let summary = inject::execute(&InjectOptions {
        skip_assets: true,
        ..options(&fixture)
    })?;

    assert_eq!(summary.assets, AssetsStatus::Disabled);
    assert!(records_where(&fixture.read_project(), "PBXFileReference", "path", "assets").is_empty());
    Ok(())
}

#[test]
fn test_missing_target_is_fatal_and_leaves_file_alone() {
    let fixture = Fixture::new(sample_project(true));
    let before = fixture.raw_project();

    let result = inject::execute(&InjectOptions {
        project: ProjectOptions {
            target: Some("OtherApp".to_string()),
            ..ProjectOptions::new(fixture.root())
        },
        quiet: true,
        ..InjectOptions::default()
    });

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("OtherApp"));
    assert_eq!(fixture.raw_project(), before);
}

#[test]
fn test_missing_group_is_fatal() {
    let fixture = Fixture::new(sample_project(true));
    let before = fixture.raw_project();

    let result = inject::execute(&InjectOptions {
        project: ProjectOptions {
            group: Some("Resources".to_string()),
            ..ProjectOptions::new(fixture.root())
        },
        quiet: true,
        ..InjectOptions::default()
    });

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InjectError>(),
        Some(InjectError::GroupNotFound(_))
    ));
    assert_eq!(fixture.raw_project(), before);
}

#[test]
fn test_bundle_without_resources_phase_fails() {
    let fixture = Fixture::new(sample_project(false));
    fixture.add_assets("assets", &["a.png"]);
    let before = fixture.raw_project();

    let err = inject::execute(&options(&fixture)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InjectError>(),
        Some(InjectError::PhaseNotFound(_))
    ));
    assert_eq!(fixture.raw_project(), before);
}

#[test]
fn test_assets_without_resources_phase_only_warns() -> Result<()> {
    // bundle already registered, so only the assets step meets the missing phase
    let mut project = sample_project(false);
    project["objects"]["AAAAAAAAAAAAAAAAAAAAAAAA"] = serde_json::json!({
        "isa": "PBXFileReference",
        "name": "main.jsbundle",
        "path": "main.jsbundle",
        "sourceTree": "<group>"
    });
    let fixture = Fixture::new(project);
    fixture.add_assets("assets", &["a.png"]);

    let summary = inject::execute(&options(&fixture))?;

    assert!(matches!(summary.bundle, InjectOutcome::AlreadyPresent(_)));
    let AssetsStatus::Injected { outcome: InjectOutcome::Inserted { file_ref, build_file }, .. } = summary.assets else {
        panic!("assets folder should have been added");
    };
    assert_eq!(build_file, None);

    let project = fixture.read_project();
    assert!(list(&project, APP_GROUP, "children").contains(&file_ref.to_string()));
    assert!(records_where(&project, "PBXBuildFile", "fileRef", file_ref.as_str()).is_empty());
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let fixture = Fixture::new(sample_project(true));
    fixture.add_assets("assets", &["a.png"]);
    let before = fixture.raw_project();

    let summary = inject::execute(&InjectOptions {
        dry_run: true,
        ..options(&fixture)
    })?;

    assert!(summary.bundle.changed());
    assert_eq!(fixture.raw_project(), before);
    Ok(())
}

/// Decodes like `JsonFile` but fails the encode numbered `fail_on` (1-based).
struct FlakyConverter {
    encodes: Cell<usize>,
    fail_on: usize,
}

impl Converter for FlakyConverter {
    fn decode(&self, path: &Path) -> InjectResult<Value> {
        JsonFile.decode(path)
    }

    fn encode(&self, document: &Value, path: &Path) -> InjectResult<()> {
        let n = self.encodes.get() + 1;
        self.encodes.set(n);
        if n == self.fail_on {
            return Err(InjectError::conversion("plutil exited with status 1"));
        }
        JsonFile.encode(document, path)
    }
}

#[test]
fn test_bundle_save_failure_is_fatal() {
    let fixture = Fixture::new(sample_project(true));
    let before = fixture.raw_project();
    let ws = resolve(&ProjectOptions::new(fixture.root())).unwrap();
    let converter = FlakyConverter { encodes: Cell::new(0), fail_on: 1 };

    let err = inject::execute_with(&ws, &converter, &options(&fixture)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InjectError>(),
        Some(InjectError::Conversion { .. })
    ));
    assert!(format!("{:#}", err).contains("project.pbxproj"));
    assert_eq!(fixture.raw_project(), before);
}

#[test]
fn test_assets_save_failure_keeps_bundle() -> Result<()> {
    let fixture = Fixture::new(sample_project(true));
    fixture.add_assets("assets", &["a.png"]);
    let ws = resolve(&ProjectOptions::new(fixture.root()))?;
    let converter = FlakyConverter { encodes: Cell::new(0), fail_on: 2 };

    let summary = inject::execute_with(&ws, &converter, &options(&fixture))?;

    assert!(summary.bundle.changed());
    assert!(matches!(summary.assets, AssetsStatus::Failed(_)));
    let project = fixture.read_project();
    assert_eq!(records_where(&project, "PBXFileReference", "name", "main.jsbundle").len(), 1);
    assert!(records_where(&project, "PBXFileReference", "path", "assets").is_empty());
    Ok(())
}
