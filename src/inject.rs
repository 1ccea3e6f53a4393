//! Idempotent merges into the object graph.
//!
//! Both injectors follow the same sequence: bail out if an equivalent file
//! reference exists, create a `PBXFileReference`, link it into the group,
//! then wire a `PBXBuildFile` for it into the target's resources phase.

use serde_json::Value;

use crate::error::{InjectError, InjectResult};
use crate::pbxproj::graph::{is_a, str_field};
use crate::pbxproj::{Isa, ObjectGraph, ObjectId, Record};

pub const FOLDER_FILE_TYPE: &str = "folder";

/// The file or folder reference to create.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    pub name: String,
    pub path: String,
    pub file_type: String,
}

impl FileSpec {
    pub fn file(name: &str, file_type: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            file_type: file_type.to_string(),
        }
    }

    pub fn folder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            file_type: FOLDER_FILE_TYPE.to_string(),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("isa".into(), Value::from(Isa::FileReference.as_str()));
        record.insert("lastKnownFileType".into(), Value::from(self.file_type.as_str()));
        record.insert("name".into(), Value::from(self.name.as_str()));
        record.insert("path".into(), Value::from(self.path.as_str()));
        record.insert("sourceTree".into(), Value::from("<group>"));
        record
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InjectOutcome {
    /// An equivalent file reference exists; nothing was touched.
    AlreadyPresent(ObjectId),
    /// A file reference was created and linked into the group. `build_file`
    /// is `None` when the target had no resources phase to wire it into.
    Inserted {
        file_ref: ObjectId,
        build_file: Option<ObjectId>,
    },
}

impl InjectOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, InjectOutcome::Inserted { .. })
    }
}

/// First file reference named `name`.
pub fn find_file_by_name(graph: &ObjectGraph, name: &str) -> Option<ObjectId> {
    graph.find_named(Isa::FileReference, name)
}

/// First folder reference whose path is `path`.
pub fn find_folder_by_path(graph: &ObjectGraph, path: &str) -> Option<ObjectId> {
    graph
        .records_of(Isa::FileReference)
        .find(|(_, r)| {
            str_field(r, "path") == Some(path)
                && str_field(r, "lastKnownFileType") == Some(FOLDER_FILE_TYPE)
        })
        .map(|(id, _)| id)
}

/// Number of build files in `phase` that point at `file_ref`.
pub fn build_files_for(graph: &ObjectGraph, phase: &ObjectId, file_ref: &ObjectId) -> InjectResult<usize> {
    let files = graph.id_list(phase, "files")?;
    Ok(files
        .iter()
        .filter_map(|id| graph.get(id))
        .filter(|r| is_a(r, Isa::BuildFile) && str_field(r, "fileRef") == Some(file_ref.as_str()))
        .count())
}

/// Add a file to the group and the target's resources phase.
///
/// A missing resources phase is an error and leaves the graph untouched.
pub fn inject_file(
    graph: &mut ObjectGraph,
    group: &ObjectId,
    target: &ObjectId,
    spec: &FileSpec,
) -> InjectResult<InjectOutcome> {
    if let Some(existing) = find_file_by_name(graph, &spec.name) {
        return Ok(InjectOutcome::AlreadyPresent(existing));
    }

    let phase = graph
        .resources_phase_of(target)?
        .ok_or_else(|| InjectError::PhaseNotFound(target_name(graph, target)))?;
    ensure_list(graph, group, "children")?;
    ensure_list(graph, &phase, "files")?;

    let file_ref = add_to_group(graph, group, spec)?;
    let build_file = wire_into_phase(graph, &phase, &file_ref)?;

    Ok(InjectOutcome::Inserted {
        file_ref,
        build_file: Some(build_file),
    })
}

/// Add a folder reference to the group, and to the resources phase when the
/// target has one.
pub fn inject_folder(
    graph: &mut ObjectGraph,
    group: &ObjectId,
    target: &ObjectId,
    spec: &FileSpec,
) -> InjectResult<InjectOutcome> {
    if let Some(existing) = find_folder_by_path(graph, &spec.path) {
        return Ok(InjectOutcome::AlreadyPresent(existing));
    }

    let phase = graph.resources_phase_of(target)?;
    ensure_list(graph, group, "children")?;
    if let Some(phase) = &phase {
        ensure_list(graph, phase, "files")?;
    }

    let file_ref = add_to_group(graph, group, spec)?;
    let build_file = match phase {
        Some(phase) => Some(wire_into_phase(graph, &phase, &file_ref)?),
        None => None,
    };

    Ok(InjectOutcome::Inserted { file_ref, build_file })
}

/// Checked before any record is created so a malformed list cannot leave an
/// orphaned reference behind.
fn ensure_list(graph: &ObjectGraph, id: &ObjectId, field: &'static str) -> InjectResult<()> {
    if graph.get(id).is_none() {
        return Err(InjectError::MalformedRecord {
            id: id.to_string(),
            field: "isa",
        });
    }
    graph.id_list(id, field).map(|_| ())
}

fn add_to_group(graph: &mut ObjectGraph, group: &ObjectId, spec: &FileSpec) -> InjectResult<ObjectId> {
    let file_ref = graph.insert_new(spec.to_record());
    graph.push_to_list(group, "children", &file_ref)?;
    Ok(file_ref)
}

fn wire_into_phase(graph: &mut ObjectGraph, phase: &ObjectId, file_ref: &ObjectId) -> InjectResult<ObjectId> {
    let mut record = Record::new();
    record.insert("isa".into(), Value::from(Isa::BuildFile.as_str()));
    record.insert("fileRef".into(), Value::from(file_ref.as_str()));
    let build_file = graph.insert_new(record);
    graph.push_to_list(phase, "files", &build_file)?;
    Ok(build_file)
}

fn target_name(graph: &ObjectGraph, target: &ObjectId) -> String {
    graph
        .get(target)
        .filter(|r| is_a(r, Isa::NativeTarget))
        .and_then(|r| str_field(r, "name"))
        .unwrap_or(target.as_str())
        .to_string()
}
