use crate::{CatalogError, Course, Result};
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

/// Read the whole data file. Called once per keyword query, so edits to the
/// file show up without a restart.
pub fn load_courses(path: &Path) -> Result<Vec<Course>> {
    let mut f = File::open(path).map_err(|e| CatalogError::io(path, e))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf).map_err(|e| CatalogError::io(path, e))?;
    let courses: Vec<Course> = serde_json::from_str(&buf).map_err(|e| CatalogError::json(path, e))?;
    tracing::debug!(path = %path.display(), count = courses.len(), "loaded courses");
    Ok(courses)
}

/// Write all courses as one JSON array, indented by four spaces. Missing
/// parent directories are created.
pub fn save_courses(path: &Path, courses: &[Course]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    courses.serialize(&mut ser).map_err(|e| CatalogError::json(path, e))?;
    let mut f = File::create(path).map_err(|e| CatalogError::io(path, e))?;
    f.write_all(&buf).map_err(|e| CatalogError::io(path, e))?;
    Ok(())
}
