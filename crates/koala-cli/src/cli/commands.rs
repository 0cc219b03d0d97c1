//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("klc")
        .about("Inspect KLC module images and type signatures")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(dump_command())
        .subcommand(sig_command())
}

/// Print every section of an image.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Print the sections of a .klc image")
        .after_help(
            r#"EXAMPLES:
  klc dump lang.klc               # header, directory and every record
  klc dump lang.klc --no-header   # records only
  klc dump lang.klc --color never"#,
        )
        .arg(image_path_arg())
        .arg(no_header_arg())
        .arg(color_arg())
}

/// Parse a type signature and print its readable form.
pub fn sig_command() -> Command {
    Command::new("sig")
        .about("Decode a type signature")
        .after_help(
            r#"EXAMPLES:
  klc sig '[i'                    # []int
  klc sig 'Okoala/lang.String;'   # koala/lang.String
  klc sig 'Pi...A:z;'             # proto (int, ...Any) -> (bool)
  klc sig --list 'is[z'           # one line per descriptor"#,
        )
        .arg(signature_arg())
        .arg(list_arg())
}
