use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use shadermap::prelude::*;

const USAGE: &str = "Usage: shadermap [--max-depth N] <materials.json> [output.json]";

#[derive(Debug, PartialEq)]
struct Args {
    options: Options,
    input: PathBuf,
    output: Option<PathBuf>,
}

/// Parse command line arguments, [None] when only help was asked for.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Args>> {
    let mut options = Options::default();
    let mut paths = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max-depth" => {
                let value = args.next().context("`--max-depth` expects a value")?;
                options.max_depth = value
                    .parse()
                    .with_context(|| format!("Invalid depth `{value}`"))?;
            }
            "-h" | "--help" => return Ok(None),
            flag if flag.starts_with("--") => bail!("Unknown flag `{flag}`\n{USAGE}"),
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    let mut paths = paths.into_iter();
    match (paths.next(), paths.next(), paths.next()) {
        (Some(input), output, None) => Ok(Some(Args {
            options,
            input,
            output,
        })),
        _ => bail!(USAGE),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(Args {
        options,
        input,
        output,
    }) = parse_args(std::env::args().skip(1))?
    else {
        println!("{USAGE}");
        return Ok(());
    };

    let text = fs::read_to_string(&input)
        .with_context(|| format!("Could not read `{}`", input.display()))?;
    let materials: Vec<Material<Unvalidated>> = serde_json::from_str(&text)
        .with_context(|| format!("`{}` is not a material export", input.display()))?;

    let converted = convert_materials(materials, &options);

    let json = serde_json::to_string_pretty(&converted)?;
    match output {
        Some(path) => fs::write(&path, json)
            .with_context(|| format!("Could not write `{}`", path.display()))?,
        None => writeln!(io::stdout().lock(), "{json}")?,
    }

    Ok(())
}
