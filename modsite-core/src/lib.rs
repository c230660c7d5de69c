//! Static pages for Go vanity import paths.
//!
//! Each [`Module`] becomes a page carrying a `go-import` meta tag (where the
//! `go` command clones it from) and, when its link templates are set, a
//! `go-source` meta tag (how documentation hosts link to its source). An
//! index page lists every module unless a module already lives at the
//! domain root.
//!
//! [`build_site`] produces the whole site in memory; [`write_site`] puts it
//! on disk.

pub mod config;
pub mod module;
pub mod renderer;
pub mod site;
pub mod template;
pub mod write;

// Re-export main types
pub use config::{ConfigError, SiteConfig};
pub use module::{Module, ModuleError};
pub use renderer::{RenderError, Renderer, render_page};
pub use site::{SiteError, SiteFiles, build_site};
pub use template::{TemplateError, TemplateRenderer};
pub use write::{WriteError, write_site};
