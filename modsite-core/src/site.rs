use std::collections::BTreeMap;

use log::{debug, info, warn};
use thiserror::Error;

use crate::module::Module;
use crate::renderer::{IndexEntry, RenderError, Renderer};
use crate::template::TemplateError;

/// File name every page is written to; modules live in directories.
pub const INDEX_FILE: &str = "index.html";

/// Relative output path → page contents.
pub type SiteFiles = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("cannot place module {import_path:?}: it is not below the site domain")]
    UnplaceableModule { import_path: String },
    #[error("duplicate destination path {path:?}")]
    DuplicateDestination { path: String },
    #[error("failed to render html for {import_path:?}")]
    Render {
        import_path: String,
        #[source]
        source: RenderError,
    },
    #[error("failed to render index content")]
    Index(#[source] TemplateError),
    #[error("failed to load the built-in page templates")]
    Templates(#[source] TemplateError),
}

/// Strips one leading and one trailing `/` from a domain.
pub fn normalize_base(base: &str) -> &str {
    let base = base.strip_prefix('/').unwrap_or(base);
    base.strip_suffix('/').unwrap_or(base)
}

/// Output path of `module`'s page, relative to the site root.
///
/// `base` must already be normalized. The import path has to start with
/// `base` on a path boundary: `example.org/mod` lies below `example.org`,
/// `example.organic` does not. Empty segments are dropped, so
/// `example.org/mod//` lands on the same file as `example.org/mod`; `.` and
/// `..` segments make a module unplaceable.
pub fn module_path(module: &Module, base: &str) -> Result<String, SiteError> {
    let unplaceable = || SiteError::UnplaceableModule {
        import_path: module.import_path.clone(),
    };

    let rest = module
        .import_path
        .strip_prefix(base)
        .ok_or_else(unplaceable)?;
    let on_boundary =
        base.is_empty() || base.ends_with('/') || rest.is_empty() || rest.starts_with('/');
    if !on_boundary {
        return Err(unplaceable());
    }

    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| matches!(*s, "." | "..")) {
        return Err(unplaceable());
    }

    if segments.is_empty() {
        Ok(INDEX_FILE.to_string())
    } else {
        Ok(format!("{}/{INDEX_FILE}", segments.join("/")))
    }
}

/// Canonical relative URL of a page: its path without the trailing
/// `index.html`.
pub fn page_url(path: &str) -> &str {
    path.strip_suffix(INDEX_FILE).unwrap_or(path)
}

/// Renders one page per module plus an index page listing all of them.
///
/// `index` and `footer` are trusted HTML and inserted verbatim. If a module
/// itself lands on `index.html` its page takes the place of the index.
///
/// Any failure aborts the whole build.
pub fn build_site(
    domain: &str,
    index: &str,
    footer: &str,
    modules: &[Module],
) -> Result<SiteFiles, SiteError> {
    let base = normalize_base(domain);

    let mut renderer = Renderer::new().map_err(SiteError::Templates)?;
    renderer.set_global_context("footer", footer);

    let mut files = SiteFiles::new();
    let mut entries = Vec::with_capacity(modules.len());

    for module in modules {
        let path = module_path(module, base)?;
        if files.contains_key(&path) {
            return Err(SiteError::DuplicateDestination { path });
        }

        if let Err(err) = module.validate_source() {
            warn!("{}: omitting go-source tag: {err}", module.import_path);
        }
        let page = renderer
            .render_module(module)
            .map_err(|source| SiteError::Render {
                import_path: module.import_path.clone(),
                source,
            })?;
        debug!("placed {} at {path}", module.import_path);

        entries.push(IndexEntry {
            import_path: module.import_path.clone(),
            url: page_url(&path).to_string(),
        });
        files.insert(path, page);
    }

    if !files.contains_key(INDEX_FILE) {
        let page = renderer
            .render_index(base, index, &entries)
            .map_err(SiteError::Index)?;
        files.insert(INDEX_FILE.to_string(), page);
    }

    info!("built {} pages for {} modules", files.len(), modules.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn git(import_path: &str) -> Module {
        Module {
            import_path: import_path.to_string(),
            vcs: "git".to_string(),
            repo_url: format!("https://{import_path}"),
            ..Module::default()
        }
    }

    #[rstest]
    #[case("example.org", "example.org")]
    #[case("/example.org/", "example.org")]
    #[case("example.org//", "example.org/")]
    #[case("", "")]
    #[case("/", "")]
    fn normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_base(input), expected);
    }

    #[rstest]
    #[case("example.org/mod", "example.org", "mod/index.html")]
    #[case("example.org/foo/bar", "example.org", "foo/bar/index.html")]
    #[case("example.org/foo/bar/", "example.org", "foo/bar/index.html")]
    #[case("example.org", "example.org", "index.html")]
    #[case("example.org/", "example.org", "index.html")]
    #[case("example.org/mod", "", "example.org/mod/index.html")]
    #[case("example.org/mod", "example.org/", "mod/index.html")]
    #[case("example.org/mod//", "example.org", "mod/index.html")]
    #[case("example.org//abs", "example.org", "abs/index.html")]
    #[case("example.org/a//b", "example.org", "a/b/index.html")]
    #[case("example.org//", "example.org", "index.html")]
    fn placement(#[case] import_path: &str, #[case] base: &str, #[case] expected: &str) {
        assert_eq!(module_path(&git(import_path), base).unwrap(), expected);
    }

    #[rstest]
    #[case("other.org/mod")]
    #[case("example.organic/mod")]
    #[case("example.or")]
    #[case("example.org/a/../b")]
    #[case("example.org/..")]
    #[case("example.org/./mod")]
    fn unplaceable(#[case] import_path: &str) {
        let err = module_path(&git(import_path), "example.org").unwrap_err();
        assert!(
            matches!(err, SiteError::UnplaceableModule { import_path: ref p } if p == import_path)
        );
    }

    #[test]
    fn page_urls() {
        assert_eq!(page_url("mod/index.html"), "mod/");
        assert_eq!(page_url("index.html"), "");
    }

    #[test]
    fn single_module() {
        let files = build_site("example.org", "", "", &[git("example.org/mod")]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files["mod/index.html"].contains("example.org/mod git https://example.org/mod"));
        assert!(files["index.html"].contains(r#"<a href="mod/">example.org/mod</a>"#));
    }

    #[test]
    fn empty_site_has_only_index() {
        let files = build_site("example.org", "<p>hi</p>", "", &[]).unwrap();
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["index.html"]);
        assert!(!files["index.html"].contains("<li>"));
    }

    #[test]
    fn one_page_per_module_plus_index() {
        let modules: Vec<Module> = ["a", "b", "c/d", "c/e"]
            .iter()
            .map(|name| git(&format!("example.org/{name}")))
            .collect();
        let files = build_site("/example.org/", "", "", &modules).unwrap();
        assert_eq!(files.len(), modules.len() + 1);
        for path in ["a/index.html", "b/index.html", "c/d/index.html", "c/e/index.html"] {
            assert!(files.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn index_follows_module_order() {
        let modules = [git("example.org/zeta"), git("example.org/alpha")];
        let files = build_site("example.org", "", "", &modules).unwrap();
        let index = &files["index.html"];
        let zeta = index.find("example.org/zeta").unwrap();
        let alpha = index.find("example.org/alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[rstest]
    #[case("example.org/mod/")]
    #[case("example.org/mod//")]
    #[case("example.org//mod")]
    fn duplicate_destination(#[case] other: &str) {
        let modules = [git("example.org/mod"), git(other)];
        let err = build_site("example.org", "", "", &modules).unwrap_err();
        assert!(matches!(err, SiteError::DuplicateDestination { ref path } if path == "mod/index.html"));
    }

    #[test]
    fn every_path_stays_relative_and_clean() {
        let modules = [git("example.org//abs"), git("example.org/x//y/")];
        let files = build_site("example.org", "", "", &modules).unwrap();
        assert_eq!(
            files.keys().collect::<Vec<_>>(),
            vec!["abs/index.html", "index.html", "x/y/index.html"]
        );
        assert!(files["index.html"].contains(r#"<a href="x/y/">example.org/x//y/</a>"#));
    }

    #[test]
    fn dot_segments_abort_the_build() {
        let err = build_site("example.org", "", "", &[git("example.org/a/../b")]).unwrap_err();
        assert!(matches!(err, SiteError::UnplaceableModule { .. }));
    }

    #[test]
    fn template_loading_has_its_own_message() {
        let Err(source) = crate::template::TemplateRenderer::from_raw([("t.html", "{{ oops")])
        else {
            panic!("malformed template accepted");
        };
        let err = SiteError::Templates(source);
        assert_eq!(err.to_string(), "failed to load the built-in page templates");
    }

    #[test]
    fn unplaceable_module_aborts() {
        let modules = [git("example.org/mod"), git("elsewhere.org/mod")];
        let err = build_site("example.org", "", "", &modules).unwrap_err();
        assert!(matches!(err, SiteError::UnplaceableModule { .. }));
        assert!(err.to_string().contains("elsewhere.org/mod"));
    }

    #[test]
    fn invalid_module_aborts() {
        let broken = Module {
            vcs: "cvs".to_string(),
            ..git("example.org/broken")
        };
        let err = build_site("example.org", "", "", &[git("example.org/ok"), broken]).unwrap_err();
        match err {
            SiteError::Render { import_path, source } => {
                assert_eq!(import_path, "example.org/broken");
                assert!(matches!(source, RenderError::MissingImport(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn module_at_domain_root_replaces_index() {
        let modules = [git("example.org"), git("example.org/sub")];
        let files = build_site("example.org", "<p>index body</p>", "", &modules).unwrap();
        assert_eq!(files.len(), 2);
        let root = &files["index.html"];
        assert!(root.contains(r#"value="example.org git https://example.org""#));
        assert!(!root.contains("index body"));
    }

    #[test]
    fn footer_on_every_page() {
        let footer = "<small>imprint</small>";
        let files = build_site("example.org", "", footer, &[git("example.org/a")]).unwrap();
        assert!(files.values().all(|page| page.contains(footer)));
    }
}
