use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use heck::ToPascalCase;
use log::debug;

use osc_core::SchemaClass;

/// Load JSON Schema files as schema classes.
///
/// Each path is either a `.json` file or a directory whose `.json` entries
/// are loaded (not recursively). A schema is named after its file stem in
/// PascalCase, so `pet-owner.json` registers `PetOwner`.
pub fn load_schema_classes(paths: &[PathBuf]) -> Result<Vec<SchemaClass>> {
    let mut classes = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in json_files_in(path)? {
                classes.push(load_schema_file(&file)?);
            }
        } else {
            classes.push(load_schema_file(path)?);
        }
    }
    Ok(classes)
}

fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    // read_dir order is platform dependent
    files.sort();
    Ok(files)
}

fn load_schema_file(path: &Path) -> Result<SchemaClass> {
    let name = schema_name(path)?;
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let schema: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON Schema {}", path.display()))?;
    debug!("loaded schema {name} from {}", path.display());
    Ok(SchemaClass::inline(name, schema))
}

fn schema_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid schema file name {}", path.display()))?;
    Ok(stem.to_pascal_case())
}
