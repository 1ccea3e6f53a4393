use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

use crate::error::{InjectError, InjectResult};

/// Two-way transform between the on-disk descriptor and a JSON document.
pub trait Converter {
    fn decode(&self, path: &Path) -> InjectResult<Value>;
    fn encode(&self, document: &Value, path: &Path) -> InjectResult<()>;
}

/// Converts through Apple's `plutil`.
///
/// Decoding reads JSON from stdout. Encoding writes the document to a
/// temporary JSON file next to the descriptor and converts it in place; the
/// temporary file is removed when this returns, whether or not `plutil`
/// succeeded.
#[derive(Debug, Clone)]
pub struct Plutil {
    pub program: String,
    pub output_format: String,
}

impl Default for Plutil {
    fn default() -> Self {
        Self {
            program: "plutil".to_string(),
            output_format: "xml1".to_string(),
        }
    }
}

impl Plutil {
    fn command(&self) -> Command {
        Command::new(&self.program)
    }

    fn output(&self, command: &mut Command) -> InjectResult<Output> {
        command.output().map_err(|e| {
            InjectError::conversion(format!("failed to run `{}`: {}", self.program, e))
        })
    }
}

impl Converter for Plutil {
    fn decode(&self, path: &Path) -> InjectResult<Value> {
        let output = self.output(
            self.command()
                .args(["-convert", "json", "-o", "-"])
                .arg(path),
        )?;

        if !output.status.success() {
            return Err(InjectError::conversion(format!(
                "`{}` could not convert {} to JSON: {}",
                self.program,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            InjectError::conversion(format!("`{}` produced invalid JSON: {}", self.program, e))
        })
    }

    fn encode(&self, document: &Value, path: &Path) -> InjectResult<()> {
        let mut temp = temp_json_beside(path)?;
        write_json(&mut temp, document)?;

        let output = self.output(
            self.command()
                .args(["-convert", self.output_format.as_str(), "-o"])
                .arg(path)
                .arg(temp.path()),
        )?;

        if !output.status.success() {
            return Err(InjectError::conversion(format!(
                "`{}` could not convert JSON back to {}: {}",
                self.program,
                self.output_format,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

/// The descriptor is stored as JSON already. Writes replace the file
/// atomically.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFile;

impl Converter for JsonFile {
    fn decode(&self, path: &Path) -> InjectResult<Value> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InjectError::conversion(format!("{} is not valid JSON: {}", path.display(), e)))
    }

    fn encode(&self, document: &Value, path: &Path) -> InjectResult<()> {
        let mut temp = temp_json_beside(path)?;
        write_json(&mut temp, document)?;
        // Temp files are created 0600; keep the mode of the file being replaced.
        if let Ok(metadata) = std::fs::metadata(path) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }
        temp.persist(path).map_err(|e| InjectError::Io(e.error))?;
        Ok(())
    }
}

fn temp_json_beside(path: &Path) -> InjectResult<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(tempfile::Builder::new()
        .prefix(".pbxinject-")
        .suffix(".json")
        .tempfile_in(dir)?)
}

fn write_json(temp: &mut NamedTempFile, document: &Value) -> InjectResult<()> {
    serde_json::to_writer_pretty(&mut *temp, document)
        .map_err(|e| InjectError::conversion(format!("failed to serialize project: {}", e)))?;
    temp.flush()?;
    Ok(())
}
