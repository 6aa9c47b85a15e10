//! pnmedit CLI - line-oriented command interpreter
//!
//! This crate drives [`pnmedit_core`] from a command script, one command per
//! line, keeping a single active image between commands.
//!
//! # Module Structure
//!
//! - `command` - verb lookup and argument parsing
//! - `session` - the active image and command execution
//! - `error` - user-facing command errors and fatal run errors
//!
//! # Usage
//!
//! ```text
//! $ pnmedit script.txt
//! $ printf 'LOAD in.ppm\nROTATE 90\nSAVE out.ppm ascii\nEXIT\n' | pnmedit -v
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

pub mod command;
pub mod error;
pub mod session;

pub use command::{Command, Verb};
pub use error::{CommandError, RunError};
pub use session::{Outcome, Session};

/// Batch raster editor for PGM/PPM images.
#[derive(Debug, Parser)]
#[command(name = "pnmedit")]
#[command(version, about)]
pub struct Cli {
    /// Command script to run; read from stdin when omitted
    pub script: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Log level selected by `-v`/`-q`.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Execute every line of `input`, writing replies to `output`.
///
/// Stops at `EXIT` (with an image loaded) or at end of input. Command
/// failures are replies like any other, including lines that are not valid
/// UTF-8; only I/O on the streams themselves ends the run with an error.
pub fn run<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<(), RunError> {
    let mut session = Session::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let result = match std::str::from_utf8(&buf) {
            Ok(line) => session.execute_line(line),
            Err(err) => {
                log::debug!("{:?} is not UTF-8: {err}", String::from_utf8_lossy(&buf));
                Some(Err(CommandError::Invalid))
            }
        };
        match result {
            None => continue,
            Some(Ok(Outcome::Reply(text))) => writeln!(output, "{text}")?,
            Some(Ok(Outcome::Exit)) => break,
            Some(Err(err)) => {
                log::debug!("{:?} rejected: {err:?}", String::from_utf8_lossy(&buf).trim_end());
                writeln!(output, "{err}")?;
            }
        }
    }
    output.flush()?;
    Ok(())
}
