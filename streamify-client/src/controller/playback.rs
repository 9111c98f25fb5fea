use std::sync::Arc;

use streamify_core::{
    error::Error,
    player::{PlaybackSession, Transition},
    webapi::{CatalogItem, Id},
};

use crate::{cmd::Event, data::Focus, delegate::Delegate};

impl Delegate {
    /// From the detail view: swap it for a player on the same item.  In the
    /// player: start or resume.
    pub(crate) fn play(&mut self) {
        if let Some(view) = self.state.focus.detail() {
            let item = Arc::clone(&view.item);
            self.open_player(item);
            return;
        }
        let result = match self.state.focus.player_mut() {
            Some(session) => session.play(),
            None => {
                self.state.info_alert("Open a title to play it.");
                return;
            }
        };
        self.playback_transition(result);
    }

    pub(crate) fn pause(&mut self) {
        if let Some(session) = self.state.focus.player_mut() {
            let result = session.pause();
            self.playback_transition(result);
        }
    }

    pub(crate) fn toggle_playback(&mut self) {
        if let Some(session) = self.state.focus.player_mut() {
            let result = session.toggle();
            self.playback_transition(result);
        }
    }

    fn open_player(&mut self, item: Arc<CatalogItem>) {
        let engine = (self.engines)();
        let (mut session, resolved) = PlaybackSession::open(item, &self.root, engine);
        if let Err(err) = resolved.and_then(|_| session.attach()) {
            log::error!("cannot prepare playback: {}", err);
            self.state.error_alert(&err);
        }
        self.state.focus.replace(Focus::Player(session));
    }

    fn playback_transition(&mut self, result: Result<Transition, Error>) {
        match result {
            Ok(Transition::Started) => {
                let item = self
                    .state
                    .focus
                    .player()
                    .map(|session| session.item().id.clone());
                if let Some(item) = item {
                    self.register_watch(item);
                }
            }
            Ok(_) => {}
            Err(err) => {
                log::error!("playback failed: {}", err);
                self.state.error_alert(&err);
            }
        }
    }

    fn register_watch(&mut self, item: Id) {
        let Some(token) = self.token() else {
            return;
        };
        log::info!("registering watch of {}", item);
        self.spawn(move |backend| {
            let result = backend.register_watch(&token, &item);
            Event::WatchRegistered { item, result }
        });
    }

    pub(crate) fn watch_registered(&mut self, item: Id, result: Result<(), Error>) {
        if let Err(err) = result {
            log::warn!("failed to register watch of {}: {}", item, err);
        }
    }

    pub(crate) fn close_player(&mut self) {
        if self.state.focus.player().is_some() {
            self.state.focus.clear();
        }
    }

    /// Escape: close the player or the detail view, or the PIN prompt.
    pub(crate) fn dismiss(&mut self) {
        match self.state.focus {
            Focus::Player(_) => self.close_player(),
            Focus::Detail(_) => self.close_detail(),
            Focus::None => self.cancel_pin(),
        }
    }
}
