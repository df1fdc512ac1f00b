//! Command line argument handling for the `svg2room` binary.

use std::path::PathBuf;

use log::debug;

use crate::Error;

pub const HELP: &str = "svg2room

USAGE:
    svg2room [OPTIONS] [scale=<float>] <input> [<output>]

OPTIONS:
    -h, --help\t\tPrint this message

Reads the <g id=\"Obstacles\"> group of an SVG file and writes a JavaScript
statement adding the room to `availableRooms`. If <output> is omitted, the
input path with its .svg suffix replaced by .js is used.";

/// Suffix an input path must carry for the output path to be derived.
pub const INPUT_SUFFIX: &str = ".svg";

/// Suffix of a derived output path.
pub const OUTPUT_SUFFIX: &str = ".js";

pub const DEFAULT_SCALE: f64 = 1.0;

const SCALE_PREFIX: &str = "scale=";

/// What the binary should do.
#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Usage,
    Convert {
        input: PathBuf,
        output: PathBuf,
        scale: f64,
    },
}

/// Return the one line usage message for `program`.
pub fn usage(program: &str) -> String {
    format!("Usage: {} [scale=<float>] <input> <output>", program)
}

/// Parse a scale factor. It must be a finite, positive number.
pub fn parse_scale(value: &str) -> Result<f64, Error> {
    match value.trim().parse::<f64>() {
        Ok(scale) if scale.is_finite() && scale > 0.0 => Ok(scale),
        _ => Err(Error::InvalidScale(value.to_string())),
    }
}

/// Replace the input suffix by the output suffix, if present.
fn derive_output(input: &str) -> Option<String> {
    input
        .strip_suffix(INPUT_SUFFIX)
        .map(|stem| format!("{}{}", stem, OUTPUT_SUFFIX))
}

/// Interpret the arguments following the program name.
///
/// `scale=<float>` may appear anywhere and is removed before the positional
/// arguments are looked at.
pub fn parse_args<I>(args: I) -> Result<Command, Error>
where
    I: IntoIterator<Item = String>,
{
    let mut scale = DEFAULT_SCALE;
    let mut positional = Vec::new();

    for arg in args {
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        }
        if let Some(value) = arg.strip_prefix(SCALE_PREFIX) {
            scale = parse_scale(value)?;
            continue;
        }
        positional.push(arg);
    }

    let (input, output) = match positional.as_slice() {
        [input] => match derive_output(input) {
            Some(output) => {
                debug!("parse_args: Derived output path {}", output);
                (input.clone(), output)
            }
            None => return Ok(Command::Usage),
        },
        [input, output] => (input.clone(), output.clone()),
        _ => return Ok(Command::Usage),
    };

    Ok(Command::Convert {
        input: input.into(),
        output: output.into(),
        scale,
    })
}
