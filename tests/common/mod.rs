#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const APP: &str = "SugarInsiderApp";

/// A trimmed-down React Native iOS project in JSON form.
pub fn sample_project(with_resources_phase: bool) -> Value {
    let phases = if with_resources_phase {
        json!(["13B07F871A680F5B00A75B9A", "13B07F8C1A680F5B00A75B9A", "13B07F8E1A680F5B00A75B9A"])
    } else {
        json!(["13B07F871A680F5B00A75B9A", "13B07F8C1A680F5B00A75B9A"])
    };

    json!({
        "archiveVersion": "1",
        "classes": {},
        "objectVersion": "54",
        "rootObject": "83CBB9F71A601CBA00E9B192",
        "objects": {
            "83CBB9F71A601CBA00E9B192": {
                "isa": "PBXProject",
                "mainGroup": "83CBB9F61A601CBA00E9B192",
                "targets": ["13B07F861A680F5B00A75B9A"]
            },
            "83CBB9F61A601CBA00E9B192": {
                "isa": "PBXGroup",
                "children": ["13B07FAE1A68108700A75B9A", "2D16E6871FA4F8E400B85C8A"],
                "sourceTree": "<group>"
            },
            "13B07FAE1A68108700A75B9A": {
                "isa": "PBXGroup",
                "name": APP,
                "children": ["13B07FB01A68108700A75B9A"],
                "sourceTree": "<group>"
            },
            "2D16E6871FA4F8E400B85C8A": {
                "isa": "PBXGroup",
                "name": "Frameworks",
                "children": [],
                "sourceTree": "<group>"
            },
            "13B07FB01A68108700A75B9A": {
                "isa": "PBXFileReference",
                "lastKnownFileType": "sourcecode.swift",
                "name": "AppDelegate.swift",
                "path": "SugarInsiderApp/AppDelegate.swift",
                "sourceTree": "<group>"
            },
            "13B07F861A680F5B00A75B9A": {
                "isa": "PBXNativeTarget",
                "name": APP,
                "buildPhases": phases,
                "productType": "com.apple.product-type.application"
            },
            "13B07F871A680F5B00A75B9A": {
                "isa": "PBXSourcesBuildPhase",
                "files": []
            },
            "13B07F8C1A680F5B00A75B9A": {
                "isa": "PBXFrameworksBuildPhase",
                "files": []
            },
            "13B07F8E1A680F5B00A75B9A": {
                "isa": "PBXResourcesBuildPhase",
                "buildActionMask": "2147483647",
                "files": []
            }
        }
    })
}

pub const RESOURCES_PHASE: &str = "13B07F8E1A680F5B00A75B9A";
pub const APP_GROUP: &str = "13B07FAE1A68108700A75B9A";

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// `<tmp>/ios/SugarInsiderApp.xcodeproj/project.pbxproj` stored as JSON,
    /// with a config selecting the JSON converter.
    pub fn new(project: Value) -> Self {
        let dir = TempDir::new().unwrap();
        let fixture = Self { dir };
        let xcodeproj = fixture.root().join(format!("{}.xcodeproj", APP));
        fs::create_dir_all(&xcodeproj).unwrap();
        fs::write(
            xcodeproj.join("project.pbxproj"),
            serde_json::to_string_pretty(&project).unwrap(),
        )
        .unwrap();
        fs::write(
            fixture.root().join("pbxinject.toml"),
            "[converter]\nkind = \"json\"\n",
        )
        .unwrap();
        fixture
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("ios")
    }

    pub fn pbxproj(&self) -> PathBuf {
        self.root().join(format!("{}.xcodeproj", APP)).join("project.pbxproj")
    }

    pub fn read_project(&self) -> Value {
        serde_json::from_str(&fs::read_to_string(self.pbxproj()).unwrap()).unwrap()
    }

    pub fn raw_project(&self) -> String {
        fs::read_to_string(self.pbxproj()).unwrap()
    }

    /// Create an assets directory relative to the root.
    pub fn add_assets(&self, relative: &str, images: &[&str]) -> PathBuf {
        let dir = self.root().join(relative);
        fs::create_dir_all(&dir).unwrap();
        for image in images {
            let path = dir.join(image);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }
}

/// Ids of records of `isa` whose `field` equals `value`.
pub fn records_where(project: &Value, isa: &str, field: &str, value: &str) -> Vec<String> {
    project["objects"]
        .as_object()
        .unwrap()
        .iter()
        .filter(|(_, r)| r["isa"] == isa && r[field] == value)
        .map(|(id, _)| id.clone())
        .collect()
}

pub fn list(project: &Value, id: &str, field: &str) -> Vec<String> {
    project["objects"][id][field]
        .as_array()
        .map(|items| items.iter().map(|v| v.as_str().unwrap().to_string()).collect())
        .unwrap_or_default()
}
