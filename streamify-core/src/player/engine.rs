use std::process::{Child, Command, Stdio};

use crate::error::Error;

/// Something that can actually render a video stream.  The playback session
/// owns exactly one engine and disposes of it when it closes.
pub trait PlaybackEngine: Send {
    /// Prepare the engine for `url`.  Fails for unsupported sources.
    fn attach(&mut self, url: &str) -> Result<(), Error>;

    fn play(&mut self) -> Result<(), Error>;

    fn pause(&mut self) -> Result<(), Error>;

    /// Release every resource held by the engine.  Must be safe to call more
    /// than once.
    fn dispose(&mut self);
}

/// Engine backed by an external player process, e.g. `mpv`.  The process is
/// started on the first `play` and killed on `dispose`.  It cannot be paused
/// from here, so `pause` fails and the session keeps playing.
pub struct ProcessEngine {
    command: Vec<String>,
    url: Option<String>,
    child: Option<Child>,
}

impl ProcessEngine {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            url: None,
            child: None,
        }
    }

    fn is_running(&mut self) -> bool {
        match &mut self.child {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

impl PlaybackEngine for ProcessEngine {
    fn attach(&mut self, url: &str) -> Result<(), Error> {
        if self.command.is_empty() {
            return Err(Error::PlaybackError("no player command configured".into()));
        }
        self.dispose();
        self.url = Some(url.to_string());
        Ok(())
    }

    fn play(&mut self) -> Result<(), Error> {
        if self.is_running() {
            return Ok(());
        }
        let url = self
            .url
            .as_ref()
            .ok_or_else(|| Error::PlaybackError("engine is not attached".into()))?;
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| Error::PlaybackError("no player command configured".into()))?;
        let child = Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| Error::PlaybackError(format!("cannot start {}: {}", program, err)))?;
        log::info!("started player process {}", child.id());
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), Error> {
        // No control channel into the child, use the player's own controls.
        Err(Error::PlaybackError(
            "pausing is not supported by the external player".into(),
        ))
    }

    fn dispose(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                log::debug!("player process already gone: {}", err);
            }
            let _ = child.wait();
        }
    }
}

impl Drop for ProcessEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
