mod cli;
mod commands;

use cli::{DumpParams, SigParams, build_cli};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into()))
        .init();

    let matches = build_cli().get_matches();

    let result = match matches.subcommand() {
        Some(("dump", m)) => commands::dump::run(DumpParams::from_matches(m).into()),
        Some(("sig", m)) => commands::sig::run(SigParams::from_matches(m).into()),
        _ => unreachable!("clap should have caught this"),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
