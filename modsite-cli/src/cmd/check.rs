use anyhow::{Context, Result};
use clap::{ArgMatches, Command};
use modsite_core::{Module, build_site};

use super::{add_site_args, load};

pub fn make_subcommand() -> Command {
    add_site_args(Command::new("check"))
        .about("Validate every module and build the site without writing it")
}

/// One line per module describing which meta tags it can produce.
pub fn describe(module: &Module) -> String {
    let import = match module.validate_import() {
        Ok(()) => "ok".to_string(),
        Err(err) => format!("invalid ({err})"),
    };
    let source = match module.validate_source() {
        Ok(()) => "ok".to_string(),
        Err(err) => format!("omitted ({err})"),
    };
    format!("{}: go-import {import}, go-source {source}", module.import_path)
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let (config, modules) = load(args)?;
    let site = &config.site;

    println!("Checking {} modules under {:?}", modules.len(), site.domain);
    for module in &modules {
        println!("- {}", describe(module));
    }

    let files = build_site(&site.domain, &site.index, &site.footer, &modules)
        .context("site would not build")?;
    println!("Site is valid: {} pages", files.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_valid_module() {
        let module =
            Module::git_forge("go.example.org/tool", "https://github.com/example/tool", "main");
        assert_eq!(
            describe(&module),
            "go.example.org/tool: go-import ok, go-source ok"
        );
    }

    #[test]
    fn test_describe_reports_reasons() {
        let module = Module {
            import_path: "go.example.org/old".to_string(),
            vcs: "cvs".to_string(),
            repo_url: "https://example.org/old".to_string(),
            ..Module::default()
        };
        assert_eq!(
            describe(&module),
            "go.example.org/old: go-import invalid (unsupported VCS \"cvs\"), go-source omitted (invalid directory link template)"
        );
    }
}
