//! Report template selection
//!
//! One docx template exists per supported object count; the filename
//! carries the count (`templateTermoN3.docx` holds the three-object
//! layout). Selecting a template is a pure filename computation;
//! resolving one additionally checks that the file is present under the
//! configured templates directory.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Supported object counts per report (template layouts exist for each)
pub const MIN_OBJECTS: usize = 1;
pub const MAX_OBJECTS: usize = 20;

/// Default template filename pattern; `{count}` is replaced by the
/// report's object count.
pub const DEFAULT_TEMPLATE_PATTERN: &str = "templateTermoN{count}.docx";

/// Template filename for a report with `object_count` objects
///
/// Bounds the count to the supported range before substituting it into
/// the pattern. A pattern without a `{count}` placeholder is returned
/// unchanged, which pins every report size to a single template.
pub fn template_filename(pattern: &str, object_count: usize) -> Result<String> {
    if !(MIN_OBJECTS..=MAX_OBJECTS).contains(&object_count) {
        return Err(Error::UnsupportedObjectCount(object_count));
    }
    Ok(pattern.replace("{count}", &object_count.to_string()))
}

/// Resolve the template file for `object_count` objects under `templates_dir`
///
/// The file must already exist: templates are authored by hand, one per
/// supported layout, and a missing file means this installation cannot
/// produce a report of that size.
pub fn resolve_template(
    templates_dir: &Path,
    pattern: &str,
    object_count: usize,
) -> Result<PathBuf> {
    let filename = template_filename(pattern, object_count)?;
    let path = templates_dir.join(&filename);
    if !path.is_file() {
        return Err(Error::Template(format!(
            "template not found: {}",
            path.display()
        )));
    }
    Ok(path)
}
