use koala_core::typedesc::list_to_string;
use koala_core::{TypeDesc, TypeKind};

use super::CommandError;

pub struct SigArgs {
    pub signature: String,
    pub list: bool,
}

pub fn run(args: SigArgs) -> Result<(), CommandError> {
    println!("{}", render(&args)?);
    Ok(())
}

/// One line per descriptor. Prototypes spell out their lists.
pub fn render(args: &SigArgs) -> Result<String, CommandError> {
    let wrap = |source| CommandError::Signature {
        signature: args.signature.clone(),
        source,
    };

    let descs = if args.list {
        TypeDesc::parse_list(&args.signature).map_err(wrap)?
    } else {
        vec![TypeDesc::parse(&args.signature).map_err(wrap)?]
    };

    Ok(descs.iter().map(describe).collect::<Vec<_>>().join("\n"))
}

fn describe(desc: &TypeDesc) -> String {
    match desc.kind() {
        TypeKind::Proto { returns, params } => format!(
            "{desc} ({}) -> ({})",
            list_to_string(params),
            list_to_string(returns)
        ),
        _ => desc.to_string(),
    }
}
