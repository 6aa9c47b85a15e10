//! The editing session: at most one active image and the commands that act
//! on it.

use log::{info, warn};
use pnmedit_core::{
    apply_crop, apply_equalization, apply_kernel, apply_rotation, compute_histogram, load_image,
    save_image, Image,
};

use crate::command::{Command, Verb};
use crate::error::CommandError;

/// What the caller should do after a command succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text (one or more lines, no trailing newline)
    Reply(String),
    /// End the session
    Exit,
}

/// Session state: the single active image, if any.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<Image>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Run one script line. Blank lines yield `None`.
    pub fn execute_line(&mut self, line: &str) -> Option<Result<Outcome, CommandError>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (verb, args) = tokens.split_first()?;
        Some(self.dispatch(verb, args))
    }

    fn dispatch(&mut self, verb: &str, args: &[&str]) -> Result<Outcome, CommandError> {
        let verb: Verb = verb.parse()?;
        if verb.needs_image() && self.image.is_none() {
            return Err(CommandError::NoImage);
        }
        let command = Command::parse(verb, args)?;
        self.execute(command)
    }

    /// Apply a parsed command. On error the active image is unchanged,
    /// except for `LOAD`, which drops the previous image before reading.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, CommandError> {
        match command {
            Command::Load(path) => self.load(path),
            Command::Exit => {
                self.image.take().ok_or(CommandError::NoImage)?;
                Ok(Outcome::Exit)
            }
            command => {
                let image = self.image.as_mut().ok_or(CommandError::NoImage)?;
                edit(image, command).map(Outcome::Reply)
            }
        }
    }

    fn load(&mut self, path: String) -> Result<Outcome, CommandError> {
        self.image = None;
        match load_image(&path) {
            Ok(image) => {
                info!(
                    "loaded {path}: {} {}x{}",
                    image.format(),
                    image.width(),
                    image.height()
                );
                self.image = Some(image);
                Ok(Outcome::Reply(format!("Loaded {path}")))
            }
            Err(source) => {
                warn!("load of {path} failed: {source}");
                Err(CommandError::Load { path, source })
            }
        }
    }
}

/// Run an image command against the active image and build its reply.
fn edit(image: &mut Image, command: Command) -> Result<String, CommandError> {
    let reply = match command {
        Command::SelectAll => {
            image.select_all();
            "Selected ALL".to_string()
        }
        Command::Select { x1, y1, x2, y2 } => {
            let sel = image.select(x1, y1, x2, y2)?;
            format!("Selected {} {} {} {}", sel.x1(), sel.y1(), sel.x2(), sel.y2())
        }
        Command::Histogram { max_stars, bins } => {
            let hist = compute_histogram(image, max_stars, bins)?;
            hist.render().trim_end_matches('\n').to_string()
        }
        Command::Equalize => {
            apply_equalization(image)?;
            "Equalize done".to_string()
        }
        Command::Crop => {
            *image = apply_crop(image);
            "Image cropped".to_string()
        }
        Command::Apply(kernel) => {
            *image = apply_kernel(image, kernel)?;
            format!("APPLY {kernel} done")
        }
        Command::Save { path, encoding } => {
            save_image(image, &path, encoding).map_err(|source| {
                warn!("save of {path} failed: {source}");
                CommandError::Save {
                    path: path.clone(),
                    source,
                }
            })?;
            format!("Saved {path}")
        }
        Command::Rotate(angle) => {
            *image = apply_rotation(image, angle)?;
            format!("Rotated {angle}")
        }
        Command::Load(_) | Command::Exit => return Err(CommandError::Invalid),
    };
    Ok(reply)
}
