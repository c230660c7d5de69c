use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

/// Name of the per-module page skeleton.
pub const MODULE_TEMPLATE: &str = "module.html";
/// Name of the index page skeleton.
pub const INDEX_TEMPLATE: &str = "index.html";

const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    (MODULE_TEMPLATE, include_str!("../templates/module.html")),
    (INDEX_TEMPLATE, include_str!("../templates/index.html")),
];

/// The template engine rejected a skeleton or a context.
///
/// With the built-in skeletons this means a broken asset, not bad input.
#[derive(Debug, Error)]
#[error("template error: {0}")]
pub struct TemplateError(#[from] tera::Error);

pub struct TemplateRenderer {
    tera: Tera,
    context: Context,
}

impl TemplateRenderer {
    /// Loads the skeletons compiled into this crate.
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::from_raw(BUILTIN_TEMPLATES)
    }

    /// Loads skeletons from `(name, source)` pairs.
    pub fn from_raw<I, N, S>(templates: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;
        tera.autoescape_on(vec![".html"]);
        tera.set_escape_fn(escape_html);

        Ok(Self {
            tera,
            context: Context::new(),
        })
    }

    /// Add a value to the context shared by every render
    pub fn add_to_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.context.insert(key, value);
    }

    /// Render a template with the shared context alone
    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        Ok(self.tera.render(template, &self.context)?)
    }

    /// Render a template with `context` layered over the shared context
    pub fn render_with_context(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, TemplateError> {
        let mut merged = self.context.clone();
        merged.extend(context.clone());
        Ok(self.tera.render(template, &merged)?)
    }
}

/// Escapes text for both element content and quoted attribute values.
///
/// Unlike tera's default this leaves `/` alone, so URLs stay readable.
pub fn escape_html(input: &str) -> String {
    html_escape::encode_quoted_attribute(input).into_owned()
}
