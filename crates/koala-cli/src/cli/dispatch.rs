//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::sig::SigArgs;

pub struct DumpParams {
    pub image_path: PathBuf,
    pub no_header: bool,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            image_path: m
                .get_one::<PathBuf>("image_path")
                .cloned()
                .unwrap_or_default(),
            no_header: m.get_flag("no_header"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            image_path: p.image_path,
            header: !p.no_header,
            color: p.color.should_colorize(),
        }
    }
}

pub struct SigParams {
    pub signature: String,
    pub list: bool,
}

impl SigParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            signature: m
                .get_one::<String>("signature")
                .cloned()
                .unwrap_or_default(),
            list: m.get_flag("list"),
        }
    }
}

impl From<SigParams> for SigArgs {
    fn from(p: SigParams) -> Self {
        Self {
            signature: p.signature,
            list: p.list,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
