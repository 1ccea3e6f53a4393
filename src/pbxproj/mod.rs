//! Xcode project descriptor (`project.pbxproj`) model.
//!
//! The descriptor is treated as a JSON document obtained through a
//! [`Converter`]. Only the `objects` table is interpreted; every other
//! top-level field is carried through untouched.

pub mod converter;
pub mod graph;

pub use converter::{Converter, JsonFile, Plutil};
pub use graph::{locate, ObjectGraph, Record};

use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{InjectError, InjectResult};

/// Length of identifiers Xcode writes into the objects table.
pub const OBJECT_ID_LEN: usize = 24;

/// Key of an entry in the objects table (24 uppercase hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a random identifier in Xcode's format.
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        ObjectId(hex[..OBJECT_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        ObjectId(id.to_string())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Record variants this tool reads or writes. Anything else is passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isa {
    NativeTarget,
    Group,
    FileReference,
    BuildFile,
    ResourcesBuildPhase,
}

impl Isa {
    pub fn as_str(self) -> &'static str {
        match self {
            Isa::NativeTarget => "PBXNativeTarget",
            Isa::Group => "PBXGroup",
            Isa::FileReference => "PBXFileReference",
            Isa::BuildFile => "PBXBuildFile",
            Isa::ResourcesBuildPhase => "PBXResourcesBuildPhase",
        }
    }
}

/// A loaded project descriptor: the object graph plus the rest of the
/// document, kept verbatim for the write-back.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    path: PathBuf,
    document: Map<String, Value>,
    pub objects: ObjectGraph,
}

impl ProjectFile {
    /// Decode the descriptor at `path`.
    pub fn load(path: &Path, converter: &dyn Converter) -> InjectResult<Self> {
        let value = converter.decode(path)?;
        Self::from_document(path, value)
    }

    /// Build from an already decoded document.
    pub fn from_document(path: &Path, value: Value) -> InjectResult<Self> {
        let mut document = match value {
            Value::Object(map) => map,
            _ => {
                return Err(InjectError::conversion(format!(
                    "{} did not decode to a dictionary",
                    path.display()
                )))
            }
        };

        let objects = match document.remove("objects") {
            Some(Value::Object(objects)) => ObjectGraph::from_map(objects),
            Some(_) => {
                return Err(InjectError::conversion(format!(
                    "`objects` in {} is not a dictionary",
                    path.display()
                )))
            }
            None => {
                return Err(InjectError::conversion(format!(
                    "{} has no `objects` table",
                    path.display()
                )))
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            document,
            objects,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reassemble the full document, `objects` included.
    pub fn to_document(&self) -> Value {
        let mut document = self.document.clone();
        document.insert("objects".to_string(), self.objects.to_value());
        Value::Object(document)
    }

    /// Write the whole document back to where it was loaded from.
    pub fn save(&self, converter: &dyn Converter) -> InjectResult<()> {
        converter.encode(&self.to_document(), &self.path)
    }
}
