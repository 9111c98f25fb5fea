use std::sync::Arc;

use streamify_core::{error::Error, webapi::AvatarSets};

use crate::{
    cmd::Event,
    data::{describe_error, AlertStyle, AvatarCategory, AvatarPicker, RequestId},
    delegate::Delegate,
};

impl Delegate {
    pub(crate) fn load_avatars(&mut self) {
        let key = self.state.next_request();
        self.state.avatars.reset();
        self.state.avatars.sets.defer(key);
        self.spawn(move |backend| Event::AvatarsLoaded {
            key,
            result: backend.avatars(),
        });
    }

    pub(crate) fn avatars_loaded(&mut self, key: RequestId, result: Result<AvatarSets, Error>) {
        let result = result.map_err(|err| {
            log::error!("failed to load avatars: {}", err);
            Arc::<str>::from(describe_error(&err))
        });
        let failure = result.as_ref().err().cloned();
        if !self.state.avatars.sets.update((key, result)) {
            log::info!("discarding stale avatar lists {}", key);
            return;
        }
        if let Some(message) = failure {
            self.state.add_alert(message, AlertStyle::Error);
        }
    }

    pub(crate) fn load_more_avatars(&mut self, category: AvatarCategory) {
        if !self.state.avatars.load_more(category) {
            log::debug!("all {} avatars are already shown", category);
        }
    }

    /// Remember the chosen avatar for the next account update.
    pub(crate) fn choose_avatar(&mut self, category: AvatarCategory, index: usize) {
        let Some(name) = self.state.avatars.visible(category).get(index).cloned() else {
            self.state.info_alert("That avatar is not shown.");
            return;
        };
        let reference = AvatarPicker::choose(category, &name);
        self.state
            .info_alert(format!("Avatar {reference} selected, save your account to keep it."));
        self.state.account.avatar = Some(reference);
    }
}
