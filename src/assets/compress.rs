//! Minified style/script artifacts.

use super::{ResourceKind, ResourcePipeline, without_leading_slash};
use crate::error::RenderError;
use crate::log;
use crate::utils::minify::{MinifyType, minify};
use std::fs;
use std::path::{Path, PathBuf};

impl ResourcePipeline {
    /// Write a minified copy of a style or script and return its path
    /// relative to the role base, ready for `add_style`/`add_script`.
    ///
    /// `app.css` becomes `<styles>/_min/app.min.css`. Paths with any other
    /// extension are returned unchanged. An empty source yields an empty
    /// path and writes nothing. The artifact is only rewritten when its
    /// content would change.
    pub fn compress(&self, path: impl AsRef<Path>) -> Result<PathBuf, RenderError> {
        let path = path.as_ref();
        let Some(kind) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ResourceKind::from_extension)
        else {
            return Ok(path.to_path_buf());
        };

        let path = without_leading_slash(path);
        let base = self.paths().root_path(self.base_for(kind));
        let source = base.join(path);
        let content = fs::read_to_string(&source)
            .map_err(|err| RenderError::MissingSourceFile(source.clone(), err))?;
        if content.is_empty() {
            return Ok(PathBuf::new());
        }

        let rel = artifact_path(&self.min_dir, path);
        let dest = base.join(&rel);
        let minified = minify(MinifyType::Asset(&content), true);

        if fs::read_to_string(&dest).is_ok_and(|existing| existing == minified) {
            return Ok(rel);
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|err| RenderError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(&dest, minified.as_bytes()).map_err(|err| RenderError::Io(dest.clone(), err))?;
        log!("compress"; "{}", rel.display());

        Ok(rel)
    }
}

/// `css/app.css` -> `<min_dir>/css/app.min.css`
fn artifact_path(min_dir: &str, path: &Path) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
    Path::new(min_dir).join(path.with_file_name(format!("{stem}.min.{ext}")))
}
