use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::info;
use modsite_core::{build_site, write_site};
use std::path::Path;

use super::{add_site_args, load};

pub fn make_subcommand() -> Command {
    add_site_args(Command::new("build"))
        .about("Render every module page and the index into the output directory")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for the generated site (replaced on every build)"),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let (config, modules) = load(args)?;
    let site = &config.site;

    let files = build_site(&site.domain, &site.index, &site.footer, &modules)
        .context("failed to build site")?;

    let output_dir = Path::new(&config.build.output);
    write_site(output_dir, &files).context("failed to write files")?;

    info!(
        "wrote {} pages for {} modules to {}",
        files.len(),
        modules.len(),
        output_dir.display()
    );

    Ok(())
}
