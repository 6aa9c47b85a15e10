//! Command vocabulary and argument parsing.
//!
//! A line is split on whitespace. The first token names the [`Verb`]
//! (case-sensitive) and the rest are its arguments. Parsing happens in two
//! steps so the session can report a missing image before complaining about
//! arguments.

use std::str::FromStr;

use pnmedit_core::{Encoding, Kernel};

use crate::error::CommandError;

/// Command names as written in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Load,
    Select,
    Histogram,
    Equalize,
    Crop,
    Apply,
    Save,
    Rotate,
    Exit,
}

impl Verb {
    /// Whether the verb reports "No image loaded" when no image is active.
    pub fn needs_image(self) -> bool {
        !matches!(self, Verb::Load)
    }
}

impl FromStr for Verb {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "LOAD" => Verb::Load,
            "SELECT" => Verb::Select,
            "HISTOGRAM" => Verb::Histogram,
            "EQUALIZE" => Verb::Equalize,
            "CROP" => Verb::Crop,
            "APPLY" => Verb::Apply,
            "SAVE" => Verb::Save,
            "ROTATE" => Verb::Rotate,
            "EXIT" => Verb::Exit,
            _ => return Err(CommandError::Invalid),
        })
    }
}

/// A fully parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(String),
    SelectAll,
    Select { x1: i64, y1: i64, x2: i64, y2: i64 },
    Histogram { max_stars: u32, bins: u32 },
    Equalize,
    Crop,
    Apply(Kernel),
    Save { path: String, encoding: Encoding },
    Rotate(i32),
    Exit,
}

impl Command {
    /// Parse the arguments that follow `verb`.
    pub fn parse(verb: Verb, args: &[&str]) -> Result<Self, CommandError> {
        let command = match (verb, args) {
            (Verb::Load, [path]) => Command::Load(path.to_string()),
            (Verb::Select, ["ALL"]) => Command::SelectAll,
            (Verb::Select, [x1, y1, x2, y2]) => Command::Select {
                x1: number(x1)?,
                y1: number(y1)?,
                x2: number(x2)?,
                y2: number(y2)?,
            },
            (Verb::Histogram, [max_stars, bins]) => Command::Histogram {
                max_stars: number(max_stars)?,
                bins: number(bins)?,
            },
            (Verb::Equalize, []) => Command::Equalize,
            (Verb::Crop, []) => Command::Crop,
            (Verb::Apply, [name]) => {
                Command::Apply(name.parse().map_err(|_| CommandError::UnknownKernel)?)
            }
            (Verb::Save, [path]) => Command::Save {
                path: path.to_string(),
                encoding: Encoding::Binary,
            },
            (Verb::Save, [path, "ascii"]) => Command::Save {
                path: path.to_string(),
                encoding: Encoding::Text,
            },
            (Verb::Rotate, [angle]) => Command::Rotate(number(angle)?),
            (Verb::Exit, []) => Command::Exit,
            _ => return Err(CommandError::Invalid),
        };
        Ok(command)
    }
}

fn number<T: FromStr>(token: &str) -> Result<T, CommandError> {
    token.parse().map_err(|_| CommandError::Invalid)
}
