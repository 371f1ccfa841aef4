//! Request-scoped HTML document assembly.
//!
//! A `DocumentAssembler` accumulates page metadata, resources, hooks and
//! header/footer content for one request, then renders exactly once:
//!
//! ```text
//!  Accumulating ──render(body)──▶ CacheCheck ──hit──────────────────────▶ Emitted
//!                                    │                                    ▲
//!                                    └─miss/bypass/off─▶ Building ─▶ Caching
//! ```
//!
//! `render` consumes the assembler, so no state can be touched after the
//! document has been emitted.
//!
//! # Document layout
//!
//! ```text
//! <!DOCTYPE html><html lang ..attrs>
//!   before_head
//!   <head> top_head, charset/viewport, metas, title, ajax, favicon,
//!          cdns, styles, scripts, bottom_head </head>
//!   after_head
//!   before_body
//!   <body ..attrs> top_body, header, body, before_body, footer </body>
//!   after_body
//! </html>
//! ```

mod content;
mod diagnostics;
mod state;

pub use content::ContentSource;
pub use diagnostics::{ControllerCall, DbCall, Diagnostics, format_elapsed};
pub use state::{CdnTag, DocumentState, FilterValue, TagAttributes, TagTarget, render_attributes};

use crate::assets::{Attributes, ResourcePipeline};
use crate::cache::PageCache;
use crate::config::{PathResolver, SiteConfig};
use crate::error::{RenderError, Warning, Warnings};
use crate::hooks::{HookName, HookRegistry, HookSource};
use crate::log;
use crate::request::Request;
use crate::utils::minify::{MinifyType, minify};
use crate::utils::template::Variables;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How a render call produced its output.
#[derive(Debug)]
pub enum RenderOutcome {
    /// Cached bytes were emitted verbatim.
    Cached,
    /// The document was built; carries every warning raised for the request.
    Built(Warnings),
}

/// Assembles one HTML document for one request.
pub struct DocumentAssembler<'a> {
    config: &'a SiteConfig,
    request: Request,
    state: DocumentState,
    hooks: HookRegistry,
    resources: ResourcePipeline,
    cache: PageCache,
    warnings: Warnings,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(config: &'a SiteConfig, request: Request) -> Self {
        let state = DocumentState {
            lang: config.site.language.clone(),
            charset: config.site.charset.clone(),
            cache_enabled: config.cache.enable,
            ..Default::default()
        };

        Self {
            config,
            request,
            state,
            hooks: HookRegistry::new(),
            resources: ResourcePipeline::new(config),
            cache: PageCache::new(config.paths().root_path(&config.paths.cache)),
            warnings: Warnings::default(),
        }
    }

    fn paths(&self) -> PathResolver<'a> {
        self.config.paths()
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    // ========================================================================
    // Page metadata
    // ========================================================================

    /// Set the project name, which also becomes the title.
    pub fn set_project_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.state.title = Some(name.clone());
        self.state.project_name = Some(name);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.state.title = Some(title.into());
    }

    /// Favicon path, relative to the root.
    pub fn set_favicon(&mut self, favicon: impl Into<String>) {
        self.state.favicon = Some(favicon.into());
    }

    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.state.lang = lang.into();
    }

    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.state.charset = charset.into();
    }

    /// Add a `<meta ..>` tag from its raw attribute string.
    pub fn add_meta(&mut self, attributes: impl Into<String>) {
        self.state.metas.push(attributes.into());
    }

    pub fn add_html_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.state.html_attributes.push((key.into(), value.into()));
    }

    pub fn add_body_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.state.body_attributes.push((key.into(), value.into()));
    }

    /// Add an external `<link>` or `<script>` tag.
    ///
    /// Other kinds are reported but still recorded.
    pub fn add_cdn(&mut self, kind: &str, attributes: impl Into<String>) {
        let kind = kind.to_lowercase();
        if kind != "link" && kind != "script" {
            self.warnings.push(Warning::InvalidCdnType(kind.clone()));
        }
        self.state.cdns.push(CdnTag {
            kind,
            attributes: attributes.into(),
        });
    }

    /// Expose the ajax endpoint to scripts as `let <var> = '<url>'`.
    pub fn set_ajax_url(&mut self, var: impl Into<String>) {
        let url = self.paths().public_url(&self.config.site.ajax_endpoint);
        self.state.ajax = Some((var.into(), url));
    }

    pub fn activate_minify(&mut self) {
        self.state.minify = true;
    }

    pub fn enable_cache(&mut self) {
        self.state.cache_enabled = true;
    }

    pub fn disable_cache(&mut self) {
        self.state.cache_enabled = false;
    }

    /// Transform the `html`/`body` attributes or the `lang`/`title`/`charset` text.
    pub fn apply_attribute_filter<F>(&mut self, target: &str, transform: F) -> Option<FilterValue>
    where
        F: FnOnce(FilterValue) -> FilterValue,
    {
        self.state.apply_filter(target, transform, &mut self.warnings)
    }

    // ========================================================================
    // Header, footer and components
    // ========================================================================

    pub fn add_header(
        &mut self,
        source: impl Into<ContentSource>,
        vars: &Variables,
    ) -> Result<(), RenderError> {
        let default_file = self.default_content_file(self.config.paths.header.as_deref());
        if let Some(header) = content::load(
            "header",
            source.into(),
            vars,
            default_file.as_deref(),
            self.paths(),
            &mut self.warnings,
        )? {
            self.state.header = header;
        }
        Ok(())
    }

    pub fn remove_header(&mut self) {
        self.state.header.clear();
    }

    pub fn add_footer(
        &mut self,
        source: impl Into<ContentSource>,
        vars: &Variables,
    ) -> Result<(), RenderError> {
        let default_file = self.default_content_file(self.config.paths.footer.as_deref());
        if let Some(footer) = content::load(
            "footer",
            source.into(),
            vars,
            default_file.as_deref(),
            self.paths(),
            &mut self.warnings,
        )? {
            self.state.footer = footer;
        }
        Ok(())
    }

    pub fn remove_footer(&mut self) {
        self.state.footer.clear();
    }

    fn default_content_file(&self, file: Option<&Path>) -> Option<PathBuf> {
        file.map(|file| self.config.paths.components.join(file))
    }

    /// Render `<components>/<name>.html` with `vars`.
    pub fn component(&self, name: &str, vars: &Variables) -> Result<String, RenderError> {
        content::component(
            &self.config.paths.components,
            name,
            vars,
            self.paths(),
            self.state.minify,
        )
    }

    /// Render a component now and register the result as literal hook content.
    pub fn component_hook(
        &mut self,
        hook: impl Into<HookName>,
        name: &str,
        vars: &Variables,
        priority: i32,
    ) -> Result<(), RenderError> {
        let rendered = self.component(name, vars)?;
        self.hooks
            .register(hook, HookSource::producer(move || Some(rendered.clone())), priority);
        Ok(())
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    pub fn add_hook(&mut self, name: impl Into<HookName>, source: impl Into<HookSource>, priority: i32) {
        self.hooks.register(name, source, priority);
    }

    /// Resolve any hook, canonical or custom, for use inside page content.
    pub fn hook_content(&mut self, name: impl Into<HookName>) -> String {
        let paths = self.paths();
        self.hooks.resolve(&name.into(), paths, &mut self.warnings)
    }

    // ========================================================================
    // Resources
    // ========================================================================

    pub fn add_style(&mut self, path: impl AsRef<Path>, attributes: impl Into<Attributes>, from_root: bool) {
        self.resources.add_style(path, attributes, from_root, &mut self.warnings);
    }

    pub fn add_script(&mut self, path: impl AsRef<Path>, attributes: impl Into<Attributes>, from_root: bool) {
        self.resources.add_script(path, attributes, from_root, &mut self.warnings);
    }

    pub fn compress(&self, path: impl AsRef<Path>) -> Result<PathBuf, RenderError> {
        self.resources.compress(path)
    }

    pub fn locate_module_asset(
        &mut self,
        name: &str,
        extension: &str,
        auto_add: bool,
        attributes: impl Into<Attributes>,
    ) -> Result<String, RenderError> {
        self.resources
            .locate_module_asset(name, extension, auto_add, attributes, &mut self.warnings)
    }

    pub fn resources(&self) -> &ResourcePipeline {
        &self.resources
    }

    // ========================================================================
    // Declarative setup
    // ========================================================================

    /// Apply the `[page]` section of the site configuration.
    pub fn apply_page_config(&mut self) -> Result<(), RenderError> {
        let config = self.config;
        let page = &config.page;

        if let Some(title) = &page.title {
            self.set_title(title.clone());
        }
        if let Some(favicon) = &page.favicon {
            self.set_favicon(favicon.clone());
        }
        if page.minify {
            self.activate_minify();
        }
        for meta in &page.metas {
            self.add_meta(meta.clone());
        }
        for cdn in &page.cdns {
            self.add_cdn(&cdn.kind, cdn.attributes.clone());
        }

        for style in &page.styles {
            let path = if page.compress { self.compress(style)? } else { PathBuf::from(style) };
            self.add_style(path, Attributes::None, false);
        }
        for script in &page.scripts {
            let path = if page.compress { self.compress(script)? } else { PathBuf::from(script) };
            self.add_script(path, Attributes::None, false);
        }
        for module in &page.modules {
            self.locate_module_asset(&module.name, &module.extension, true, module.attributes.as_str())?;
        }

        if page.header {
            self.add_header(ContentSource::Default, &Variables::new())?;
        }
        if page.footer {
            self.add_footer(ContentSource::Default, &Variables::new())?;
        }
        if let Some(var) = &page.ajax_var {
            self.set_ajax_url(var.clone());
        }

        for hook in &page.hooks {
            let source = match (&hook.content, &hook.file) {
                (Some(content), _) => HookSource::Text(content.clone()),
                (None, Some(file)) => HookSource::File(file.clone()),
                (None, None) => continue,
            };
            self.add_hook(hook.name.as_str(), source, hook.priority);
        }

        Ok(())
    }

    // ========================================================================
    // Render
    // ========================================================================

    /// Emit the document for this request into `out`.
    ///
    /// Serves the cached page verbatim when caching is on, production mode
    /// is on, no bypass was requested and an entry exists. Otherwise builds
    /// the document around `body`, caches it (best effort) and emits it,
    /// followed by the diagnostics overlay in debug mode.
    pub fn render<W: Write>(
        mut self,
        body: &str,
        diagnostics: &Diagnostics,
        out: &mut W,
    ) -> Result<RenderOutcome, RenderError> {
        let key = self.request.cache_key().into_owned();
        let bypass = self.apply_bypass(&key);

        if self.state.cache_enabled
            && self.config.site.production
            && !bypass
            && let Some(cached) = self.cache.get(&key)
        {
            out.write_all(&cached).map_err(RenderError::Output)?;
            return Ok(RenderOutcome::Cached);
        }

        let document = self.build(body);
        let document = minify(MinifyType::Html(&document), self.state.minify);

        if self.state.cache_enabled
            && let Err(err) = self.cache.set(&key, document.as_bytes())
        {
            log!("cache"; "failed to store `{key}`: {err}");
        }

        out.write_all(document.as_bytes()).map_err(RenderError::Output)?;

        if self.config.site.diagnostics_enabled() {
            let overlay = diagnostics.render_overlay(&self.request, self.config);
            out.write_all(overlay.as_bytes()).map_err(RenderError::Output)?;
        }

        Ok(RenderOutcome::Built(self.warnings))
    }

    /// Purge according to the request's bypass parameters.
    fn apply_bypass(&self, key: &str) -> bool {
        let mut bypass = false;

        if self.request.has_bypass(&self.config.cache.clear_all) {
            bypass = true;
            match self.cache.purge_all() {
                Ok(count) => log!("cache"; "purged {count} pages"),
                Err(err) => log!("cache"; "failed to purge: {err}"),
            }
        }
        if self.request.has_bypass(&self.config.cache.clear_current) {
            bypass = true;
            if let Err(err) = self.cache.purge(key) {
                log!("cache"; "failed to purge `{key}`: {err}");
            }
        }

        bypass
    }

    fn build(&mut self, body: &str) -> String {
        let mut doc = String::with_capacity(body.len() + 2048);

        doc.push_str(&format!(
            "<!DOCTYPE html><html lang=\"{}\"{}>",
            self.state.lang,
            render_attributes(&self.state.html_attributes)
        ));
        doc.push_str(&self.hook_content(HookName::BeforeHead));

        doc.push_str("<head>");
        doc.push_str(&self.hook_content(HookName::TopHead));
        doc.push_str(&self.head_meta());
        doc.push_str(&self.resources.render_styles());
        doc.push_str(&self.resources.render_scripts());
        doc.push_str(&self.hook_content(HookName::BottomHead));
        doc.push_str("</head>");

        doc.push_str(&self.hook_content(HookName::AfterHead));
        doc.push_str(&self.hook_content(HookName::BeforeBody));

        doc.push_str(&format!("<body{}>", render_attributes(&self.state.body_attributes)));
        doc.push_str(&self.hook_content(HookName::TopBody));
        doc.push_str(&self.state.header);
        doc.push_str(&minify(MinifyType::Html(body), self.state.minify));
        doc.push_str(&self.hook_content(HookName::BeforeBody));
        doc.push_str(&self.state.footer);
        doc.push_str("</body>");

        doc.push_str(&self.hook_content(HookName::AfterBody));
        doc.push_str("</html>");
        doc
    }

    /// Charset, viewport, metas, title, ajax script, favicon and cdn tags.
    fn head_meta(&self) -> String {
        let state = &self.state;
        let mut head = format!(
            "<meta charset=\"{}\">\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">",
            state.charset
        );

        for meta in &state.metas {
            head.push_str(&format!("<meta {meta}>"));
        }

        let title = state.title.as_deref().unwrap_or(&self.config.site.app_name);
        head.push_str(&format!("<title>{title}</title>"));

        if let Some((var, url)) = &state.ajax {
            head.push_str(&format!("<script>let {var} = '{url}'</script>"));
        }

        if let Some(favicon) = &state.favicon {
            head.push_str(&format!(
                "<link rel=\"icon\" type=\"{}\" href=\"{}\">",
                icon_mime_type(Path::new(favicon)),
                self.paths().public_url(favicon)
            ));
        }

        for cdn in &state.cdns {
            head.push_str(&cdn.markup());
        }
        head
    }
}

/// MIME type for a favicon based on its extension.
fn icon_mime_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| match ext.to_lowercase().as_str() {
            "png" => "image/png",
            "svg" => "image/svg+xml",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "jpg" | "jpeg" => "image/jpeg",
            _ => "image/x-icon",
        })
        .unwrap_or("image/x-icon")
}
