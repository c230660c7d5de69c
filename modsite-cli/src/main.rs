use anyhow::{Result, bail};
use clap::{Arg, ArgAction, Command};

mod cmd;
mod config;

fn cli() -> Command {
    Command::new("modsite")
        .about("Generate static vanity import pages for Go modules")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log every placed module and written file")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(cmd::build::make_subcommand())
        .subcommand(cmd::check::make_subcommand())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("build", args)) => cmd::build::execute(args),
        Some(("check", args)) => cmd::check::execute(args),
        Some((name, _)) => bail!("unknown command {name}"),
        None => bail!("no command given"),
    }
}
