use streamify_core::{error::Error, webapi::Id};

use crate::{
    cmd::Event,
    data::{DetailView, Focus, ItemRef, RequestId},
    delegate::Delegate,
};

impl Delegate {
    /// Open the detail view, looking up the synopsis remotely when the item
    /// has none of its own.
    pub(crate) fn open_detail(&mut self, item: ItemRef) {
        let Some(item) = self.state.catalog.catalog.get(item).cloned() else {
            self.state.info_alert("That title is not in the catalog.");
            return;
        };
        let mut view = DetailView::new(item);
        if view.needs_lookup() {
            if let Some(token) = self.token() {
                let key = self.state.next_request();
                let name = view.item.name.clone();
                view.synopsis.defer(key);
                log::info!("looking up synopsis of {:?}", name);
                self.spawn(move |backend| Event::SynopsisLoaded {
                    key,
                    result: backend.synopsis(&token, &name),
                });
            }
        }
        self.state.focus.replace(Focus::Detail(view));
    }

    pub(crate) fn synopsis_loaded(&mut self, key: RequestId, result: Result<Option<String>, Error>) {
        let text = result.unwrap_or_else(|err| {
            log::warn!("synopsis lookup failed: {}", err);
            None
        });
        let taken = self
            .state
            .focus
            .detail_mut()
            .is_some_and(|view| view.resolve_synopsis(key, text));
        if !taken {
            log::info!("discarding synopsis for a closed detail view {}", key);
        }
    }

    pub(crate) fn close_detail(&mut self) {
        if self.state.focus.detail().is_some() {
            self.state.focus.clear();
        }
    }

    pub(crate) fn favorite(&mut self) {
        let Some(id) = self.state.focus.detail().map(|view| view.item.id.clone()) else {
            self.state.info_alert("Open a title to add it to your favorites.");
            return;
        };
        let Some(token) = self.token() else {
            return;
        };
        self.spawn(move |backend| {
            let result = backend.favorite(&token, &id);
            Event::Favorited { item: id, result }
        });
    }

    pub(crate) fn favorited(&mut self, item: Id, result: Result<(), Error>) {
        match result {
            Ok(()) => {
                if let Some(view) = self.state.focus.detail_mut() {
                    if view.item.id == item {
                        view.favorited = true;
                    }
                }
                self.state.info_alert("Added to your favorites.");
            }
            Err(err) => {
                log::error!("failed to favorite {}: {}", item, err);
                self.state.error_alert(&err);
            }
        }
    }
}
