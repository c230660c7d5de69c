//! Module descriptors and the two meta tag values derived from them.
//!
//! A [`Module`] describes one Go module served under a vanity import path.
//! From it we derive:
//!
//! - the `go-import` value, `"<import path> <vcs> <repo url>"`, read by the
//!   `go` command to locate the repository;
//! - the `go-source` value, `"<import path> <home page> <dir template> <file template>"`,
//!   read by documentation hosts to link back to source files.
//!
//! Both values are space delimited, so every field that takes part in them
//! must be non-empty (except the home page) and free of whitespace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version control systems the `go` command knows how to fetch from.
pub const SUPPORTED_VCS: [&str; 5] = ["bzr", "fossil", "git", "hg", "svn"];

/// Stand-in for an empty home page in the `go-source` tag.
pub const HOME_PAGE_SENTINEL: &str = "_";

/// Where the human-facing link points when a module has no home page.
pub const DOCUMENTATION_HOST: &str = "https://pkg.go.dev/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error("invalid module name")]
    InvalidModuleName,
    #[error("unsupported VCS {0:?}")]
    UnsupportedVcs(String),
    #[error("invalid VCS URL")]
    InvalidRepoUrl,
    #[error("invalid home page")]
    InvalidHomePage,
    #[error("invalid directory link template")]
    InvalidDirectoryTemplate,
    #[error("invalid file link template")]
    InvalidFileTemplate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Module {
    /// Canonical import path, e.g. `go.example.org/tool`.
    pub import_path: String,
    /// One of [`SUPPORTED_VCS`].
    pub vcs: String,
    /// Clone URL of the repository.
    pub repo_url: String,
    /// Optional human-facing home page. Empty or `_` falls back to the
    /// documentation host.
    pub home_page: String,
    pub directory_link_template: String,
    pub file_link_template: String,
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

impl Module {
    /// Builds a module hosted on a common git forge (GitHub, Gitea, GitLab).
    ///
    /// `repo_url` is the https clone URL, with or without a trailing `.git`.
    /// `git_ref` should name what HEAD points at, typically a branch.
    pub fn git_forge(import_path: &str, repo_url: &str, git_ref: &str) -> Self {
        let url = repo_url.strip_suffix(".git").unwrap_or(repo_url);
        let url = url.strip_suffix('/').unwrap_or(url);

        Self {
            import_path: import_path.to_string(),
            vcs: "git".to_string(),
            repo_url: url.to_string(),
            home_page: url.to_string(),
            directory_link_template: format!("{url}/tree/{git_ref}{{/dir}}"),
            file_link_template: format!("{url}/blob/{git_ref}{{/dir}}/{{file}}#L{{line}}"),
        }
    }

    /// Checks that this module can produce a `go-import` tag.
    pub fn validate_import(&self) -> Result<(), ModuleError> {
        if !is_token(&self.import_path) {
            return Err(ModuleError::InvalidModuleName);
        }
        if !SUPPORTED_VCS.contains(&self.vcs.as_str()) {
            return Err(ModuleError::UnsupportedVcs(self.vcs.clone()));
        }
        if !is_token(&self.repo_url) {
            return Err(ModuleError::InvalidRepoUrl);
        }
        Ok(())
    }

    /// Checks that this module can produce a `go-source` tag. The VCS does
    /// not matter here.
    pub fn validate_source(&self) -> Result<(), ModuleError> {
        if !is_token(&self.import_path) {
            return Err(ModuleError::InvalidModuleName);
        }
        if !self.home_page.is_empty() && !is_token(&self.home_page) {
            return Err(ModuleError::InvalidHomePage);
        }
        if !is_token(&self.directory_link_template) {
            return Err(ModuleError::InvalidDirectoryTemplate);
        }
        if !is_token(&self.file_link_template) {
            return Err(ModuleError::InvalidFileTemplate);
        }
        Ok(())
    }

    pub fn has_import(&self) -> bool {
        self.validate_import().is_ok()
    }

    pub fn has_source(&self) -> bool {
        self.validate_source().is_ok()
    }

    /// Value of the `go-import` meta tag, or the empty string when the module
    /// cannot produce one. Use [`Module::try_go_import`] to learn why.
    pub fn go_import(&self) -> String {
        self.try_go_import().unwrap_or_default()
    }

    pub fn try_go_import(&self) -> Result<String, ModuleError> {
        self.validate_import()?;
        Ok([
            self.import_path.as_str(),
            self.vcs.as_str(),
            self.repo_url.as_str(),
        ]
        .join(" "))
    }

    /// Value of the `go-source` meta tag, or the empty string when the module
    /// cannot produce one.
    pub fn go_source(&self) -> String {
        self.try_go_source().unwrap_or_default()
    }

    pub fn try_go_source(&self) -> Result<String, ModuleError> {
        self.validate_source()?;
        let home_page = match self.home_page.as_str() {
            "" => HOME_PAGE_SENTINEL,
            page => page,
        };
        Ok([
            self.import_path.as_str(),
            home_page,
            self.directory_link_template.as_str(),
            self.file_link_template.as_str(),
        ]
        .join(" "))
    }

    /// The link shown to humans: the home page when set, otherwise the
    /// module's documentation page.
    pub fn home_page_url(&self) -> String {
        match self.home_page.as_str() {
            "" | HOME_PAGE_SENTINEL => format!("{DOCUMENTATION_HOST}{}", self.import_path),
            page => page.to_string(),
        }
    }

    /// Location of `package` relative to this module, without a leading `/`.
    ///
    /// Returns `None` when `package` is not this module or one of its
    /// sub-packages.
    pub fn relative_dir<'a>(&self, package: &'a str) -> Option<&'a str> {
        let rest = package.strip_prefix(self.import_path.as_str())?;
        if rest.is_empty() {
            return Some(rest);
        }
        rest.strip_prefix('/')
    }

    /// Link to the source directory of `package`, if this module has a
    /// directory template and owns the package.
    pub fn directory_url(&self, package: &str) -> Option<String> {
        if self.directory_link_template.is_empty() {
            return None;
        }
        let dir = self.relative_dir(package)?;
        Some(expand_directory_template(&self.directory_link_template, dir))
    }

    /// Link to line `line` of `file` inside `package`.
    pub fn file_url(&self, package: &str, file: &str, line: u32) -> Option<String> {
        if self.file_link_template.is_empty() {
            return None;
        }
        let dir = self.relative_dir(package)?;
        Some(expand_file_template(&self.file_link_template, dir, file, line))
    }
}

/// Replaces `{dir}` and `{/dir}` in a link template.
///
/// `{/dir}` becomes `/` + `dir`, or nothing when `dir` is empty.
pub fn expand_directory_template(template: &str, dir: &str) -> String {
    let slash_dir = if dir.is_empty() {
        String::new()
    } else {
        format!("/{dir}")
    };
    template
        .replace("{/dir}", &slash_dir)
        .replace("{dir}", dir)
}

/// Like [`expand_directory_template`], additionally replacing `{file}` and
/// `{line}`.
pub fn expand_file_template(template: &str, dir: &str, file: &str, line: u32) -> String {
    expand_directory_template(template, dir)
        .replace("{file}", file)
        .replace("{line}", &line.to_string())
}
