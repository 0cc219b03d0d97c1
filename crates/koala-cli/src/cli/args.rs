//! Shared argument builders.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Image file (positional).
pub fn image_path_arg() -> Arg {
    Arg::new("image_path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("KLC image file")
}

/// Type signature (positional).
pub fn signature_arg() -> Arg {
    Arg::new("signature")
        .value_name("SIG")
        .required(true)
        .allow_hyphen_values(true)
        .help("Type signature, e.g. 'Okoala/lang.String;' or 'Pi:z;'")
}

/// Parse the signature as a descriptor list (--list).
pub fn list_arg() -> Arg {
    Arg::new("list")
        .long("list")
        .action(ArgAction::SetTrue)
        .help("Parse a concatenated descriptor list instead of one descriptor")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Skip the header block (--no-header).
pub fn no_header_arg() -> Arg {
    Arg::new("no_header")
        .long("no-header")
        .action(ArgAction::SetTrue)
        .help("Omit the [header] section")
}
