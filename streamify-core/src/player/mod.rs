pub mod engine;

use std::{mem, sync::Arc};

use crate::{
    error::Error,
    media::{resolve_playback_url, PlaybackUrl},
    webapi::{ApiRoot, CatalogItem},
};

pub use self::engine::{PlaybackEngine, ProcessEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Resolving,
    /// URL is known.  `attached` tells whether the engine accepted it.
    Ready {
        attached: bool,
    },
    Playing,
    Paused,
    Closed,
}

/// Result of a play/pause request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// First start of this session.  The caller registers the watch.
    Started,
    Resumed,
    Paused,
    Unchanged,
}

/// One opened player for one catalog item.  The only way into `Playing` from
/// `Ready` is `play`, and there is no way back into `Ready`, so `Started` is
/// reported at most once per session.
pub struct PlaybackSession {
    item: Arc<CatalogItem>,
    url: Option<PlaybackUrl>,
    state: PlaybackState,
    engine: Box<dyn PlaybackEngine>,
}

impl PlaybackSession {
    /// Resolve the media URL of `item`.  A reference that cannot be resolved
    /// leaves the session in `Resolving`, where it can only be closed.
    pub fn open(
        item: Arc<CatalogItem>,
        root: &ApiRoot,
        engine: Box<dyn PlaybackEngine>,
    ) -> (Self, Result<(), Error>) {
        let mut session = Self {
            item,
            url: None,
            state: PlaybackState::Resolving,
            engine,
        };
        let resolved = resolve_playback_url(root, &session.item.media).map(|url| {
            log::info!("resolved media of {:?} to {}", session.item.name, url);
            session.url = Some(url);
            session.state = PlaybackState::Ready { attached: false };
        });
        (session, resolved)
    }

    pub fn item(&self) -> &Arc<CatalogItem> {
        &self.item
    }

    pub fn url(&self) -> Option<&PlaybackUrl> {
        self.url.as_ref()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == PlaybackState::Closed
    }

    /// Hand the resolved URL to the engine.  On failure the session stays
    /// `Ready` so the user can retry or close.
    pub fn attach(&mut self) -> Result<(), Error> {
        match self.state {
            PlaybackState::Ready { attached: false } => {
                let url = self
                    .url
                    .as_ref()
                    .ok_or_else(|| Error::PlaybackError("media URL is not resolved".into()))?;
                self.engine.attach(url.as_str())?;
                self.state = PlaybackState::Ready { attached: true };
                Ok(())
            }
            PlaybackState::Ready { attached: true } => Ok(()),
            _ => {
                log::warn!("invalid state transition: attach in {:?}", self.state);
                Ok(())
            }
        }
    }

    pub fn play(&mut self) -> Result<Transition, Error> {
        match self.state {
            PlaybackState::Ready { attached } => {
                if !attached {
                    self.attach()?;
                }
                self.engine.play()?;
                log::info!("starting playback of {:?}", self.item.name);
                self.state = PlaybackState::Playing;
                Ok(Transition::Started)
            }
            PlaybackState::Paused => {
                self.engine.play()?;
                log::info!("resuming playback");
                self.state = PlaybackState::Playing;
                Ok(Transition::Resumed)
            }
            PlaybackState::Playing => Ok(Transition::Unchanged),
            PlaybackState::Resolving | PlaybackState::Closed => {
                log::warn!("invalid state transition: play in {:?}", self.state);
                Ok(Transition::Unchanged)
            }
        }
    }

    pub fn pause(&mut self) -> Result<Transition, Error> {
        match self.state {
            PlaybackState::Playing => {
                self.engine.pause()?;
                log::info!("pausing playback");
                self.state = PlaybackState::Paused;
                Ok(Transition::Paused)
            }
            _ => Ok(Transition::Unchanged),
        }
    }

    pub fn toggle(&mut self) -> Result<Transition, Error> {
        match self.state {
            PlaybackState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Dispose of the engine and move to `Closed`.  Idempotent.
    pub fn close(&mut self) {
        match mem::replace(&mut self.state, PlaybackState::Closed) {
            PlaybackState::Closed => {}
            previous => {
                log::info!("closing player in {:?}", previous);
                self.engine.dispose();
            }
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.close();
    }
}
