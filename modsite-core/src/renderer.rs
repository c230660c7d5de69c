use serde::Serialize;
use tera::Context;
use thiserror::Error;

use crate::module::{Module, ModuleError};
use crate::template::{INDEX_TEMPLATE, MODULE_TEMPLATE, TemplateError, TemplateRenderer};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("site does not have a valid go import: {0}")]
    MissingImport(#[source] ModuleError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Per-page values handed to a skeleton on top of the global context.
#[derive(Default)]
pub struct RenderContext {
    context: Context,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.context.insert(key, value);
    }
}

/// One line of the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub import_path: String,
    /// Module page relative to the site root, ending in `/` (or empty for
    /// the root itself).
    pub url: String,
}

pub struct Renderer {
    templates: TemplateRenderer,
}

impl Renderer {
    pub fn new() -> Result<Self, TemplateError> {
        Ok(Self {
            templates: TemplateRenderer::builtin()?,
        })
    }

    /// Set a value visible to every page, such as the footer.
    pub fn set_global_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.templates.add_to_context(key, value);
    }

    pub fn render(&self, template: &str, context: &RenderContext) -> Result<String, TemplateError> {
        self.templates.render_with_context(template, &context.context)
    }

    /// Renders the page for a single module.
    ///
    /// Fails before touching the templates if the module has no valid
    /// `go-import` tag. A module without a valid `go-source` tag simply
    /// renders without one.
    pub fn render_module(&self, module: &Module) -> Result<String, RenderError> {
        let go_import = module.try_go_import().map_err(RenderError::MissingImport)?;
        let go_source = module.go_source();

        let mut context = RenderContext::new();
        context.add_to_context("import_path", &module.import_path);
        context.add_to_context("go_import_tag", &meta_tag("go-import", &go_import));
        context.add_to_context(
            "go_source_tag",
            &if go_source.is_empty() {
                String::new()
            } else {
                meta_tag("go-source", &go_source)
            },
        );
        context.add_to_context("home_page_url", &module.home_page_url());
        let source_url = if go_source.is_empty() {
            None
        } else {
            module.directory_url(&module.import_path)
        };
        context.add_to_context("source_url", &source_url.unwrap_or_default());

        Ok(self.render(MODULE_TEMPLATE, &context)?)
    }

    /// Renders the index page listing `modules` in the given order.
    pub fn render_index(
        &self,
        domain: &str,
        content: &str,
        modules: &[IndexEntry],
    ) -> Result<String, TemplateError> {
        let mut context = RenderContext::new();
        context.add_to_context("domain", domain);
        context.add_to_context("content", content);
        context.add_to_context("modules", modules);

        self.render(INDEX_TEMPLATE, &context)
    }
}

/// Renders `<meta name="..." value="..." content="...">` with every attribute
/// escaped. `content` repeats `value` for clients that only read `content`.
pub fn meta_tag(name: &str, value: &str) -> String {
    let name = html_escape::encode_double_quoted_attribute(name);
    let value = html_escape::encode_double_quoted_attribute(value);
    format!(r#"<meta name="{name}" value="{value}" content="{value}">"#)
}

/// Renders a single module page with `footer` appended verbatim.
pub fn render_page(module: &Module, footer: &str) -> Result<String, RenderError> {
    module.validate_import().map_err(RenderError::MissingImport)?;

    let mut renderer = Renderer::new()?;
    renderer.set_global_context("footer", footer);
    renderer.render_module(module)
}
