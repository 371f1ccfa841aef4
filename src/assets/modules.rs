//! Third-party module asset lookup.

use super::{Attributes, ResourceKind, ResourcePipeline};
use crate::error::{RenderError, Warnings};
use std::cmp::Ordering;
use walkdir::WalkDir;

impl ResourcePipeline {
    /// Find the first file ending in `.<extension>` under `<modules>/<name>`.
    ///
    /// Files of a directory are visited before its subdirectories, each
    /// group by name, depth-first. With `auto_add` the file is registered
    /// as a style or script according to the last segment of `extension`.
    /// Returns the root-relative public path (`/node_modules/...`).
    pub fn locate_module_asset(
        &mut self,
        name: &str,
        extension: &str,
        auto_add: bool,
        attributes: impl Into<Attributes>,
        warnings: &mut Warnings,
    ) -> Result<String, RenderError> {
        let module_dir = self
            .paths()
            .root_path(self.modules.join(name.to_lowercase()));
        if !module_dir.is_dir() {
            return Err(RenderError::MissingModule(name.to_owned(), module_dir));
        }

        let suffix = format!(".{extension}");
        let found = WalkDir::new(&module_dir)
            .sort_by(|a, b| {
                match (a.file_type().is_dir(), b.file_type().is_dir()) {
                    (false, true) => Ordering::Less,
                    (true, false) => Ordering::Greater,
                    _ => a.file_name().cmp(b.file_name()),
                }
            })
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .find(|e| e.file_name().to_string_lossy().ends_with(&suffix))
            .ok_or_else(|| RenderError::MissingModuleAsset {
                module: name.to_owned(),
                extension: extension.to_owned(),
            })?;

        let rel = self
            .paths()
            .relative_to_root(found.path())
            .unwrap_or_else(|| found.path().to_path_buf());
        let link = format!("/{}", rel.to_string_lossy().replace('\\', "/"));

        if auto_add {
            let kind = extension
                .rsplit('.')
                .next()
                .and_then(ResourceKind::from_extension);
            match kind {
                Some(ResourceKind::Style) => self.add_style(&link, attributes, true, warnings),
                Some(ResourceKind::Script) => self.add_script(&link, attributes, true, warnings),
                None => {}
            }
        }

        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::site;
    use std::fs;

    #[test]
    fn test_locate_prefers_shallow_files() {
        let (dir, config) = site();
        let module = dir.path().join("node_modules/jquery");
        fs::create_dir_all(module.join("dist")).unwrap();
        fs::write(module.join("dist/jquery.min.js"), "x").unwrap();
        fs::write(module.join("jquery.min.js"), "y").unwrap();

        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();
        let link = pipeline
            .locate_module_asset("jQuery", "min.js", false, "", &mut warnings)
            .unwrap();

        assert_eq!(link, "/node_modules/jquery/jquery.min.js");
        assert!(pipeline.scripts().is_empty());
    }

    #[test]
    fn test_locate_descends_in_name_order() {
        let (dir, config) = site();
        let module = dir.path().join("node_modules/lib");
        fs::create_dir_all(module.join("b")).unwrap();
        fs::create_dir_all(module.join("a/deep")).unwrap();
        fs::write(module.join("b/lib.css"), "b{}").unwrap();
        fs::write(module.join("a/deep/lib.css"), "a{}").unwrap();
        fs::write(module.join("README.md"), "readme").unwrap();

        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();
        let link = pipeline
            .locate_module_asset("lib", "css", true, "", &mut warnings)
            .unwrap();

        assert_eq!(link, "/node_modules/lib/a/deep/lib.css");
        assert_eq!(pipeline.styles()[0].url, "/node_modules/lib/a/deep/lib.css");
    }

    #[test]
    fn test_locate_auto_add_script_with_attributes() {
        let (dir, config) = site();
        let module = dir.path().join("node_modules/alpine");
        fs::create_dir_all(&module).unwrap();
        fs::write(module.join("cdn.min.js"), "let a;").unwrap();

        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();
        pipeline
            .locate_module_asset("alpine", "min.js", true, "defer", &mut warnings)
            .unwrap();

        assert_eq!(
            pipeline.render_scripts(),
            "<script src=\"/node_modules/alpine/cdn.min.js\" defer></script>"
        );
    }

    #[test]
    fn test_locate_missing_module_is_fatal() {
        let (_dir, config) = site();
        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();

        let err = pipeline
            .locate_module_asset("nope", "min.js", true, "", &mut warnings)
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingModule(name, _) if name == "nope"));
    }

    #[test]
    fn test_locate_missing_asset_is_fatal() {
        let (dir, config) = site();
        fs::create_dir_all(dir.path().join("node_modules/empty")).unwrap();

        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();
        let err = pipeline
            .locate_module_asset("empty", "min.js", true, "", &mut warnings)
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingModuleAsset { .. }));
    }
}
