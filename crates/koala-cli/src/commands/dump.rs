use std::path::PathBuf;

use koala_klc::{Colors, Image, dump, dump_without_header};

use super::CommandError;

pub struct DumpArgs {
    pub image_path: PathBuf,
    pub header: bool,
    pub color: bool,
}

pub fn run(args: DumpArgs) -> Result<(), CommandError> {
    print!("{}", render(&args)?);
    Ok(())
}

pub fn render(args: &DumpArgs) -> Result<String, CommandError> {
    let image = Image::read(&args.image_path).map_err(|source| CommandError::Image {
        path: args.image_path.display().to_string(),
        source,
    })?;
    tracing::debug!(
        package = image.package(),
        sections = image.directory().len(),
        "dumping image"
    );

    let colors = Colors::new(args.color);
    let mut out = if args.header {
        dump(&image, colors)
    } else {
        dump_without_header(&image, colors)
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
