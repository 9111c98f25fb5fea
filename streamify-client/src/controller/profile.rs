use std::sync::Arc;

use streamify_core::{error::Error, webapi::Profile};

use crate::{
    cmd::Event,
    data::{describe_error, AlertStyle, RequestId, Route, Selection},
    delegate::Delegate,
};

impl Delegate {
    pub(crate) fn load_profiles(&mut self) {
        let Some(token) = self.token() else {
            return;
        };
        let key = self.state.next_request();
        self.state.profiles.profiles.defer(key);
        self.state.route = Route::ProfileSelect;
        self.spawn(move |backend| Event::ProfilesLoaded {
            key,
            result: backend.profiles(&token),
        });
    }

    pub(crate) fn profiles_loaded(&mut self, key: RequestId, result: Result<Vec<Profile>, Error>) {
        let result = result.map_err(|err| {
            log::error!("failed to load profiles: {}", err);
            Arc::<str>::from(describe_error(&err))
        });
        let failure = result.as_ref().err().cloned();
        if !self.state.profiles.loaded(key, result) {
            log::info!("discarding stale profile list {}", key);
            return;
        }
        if let Some(message) = failure {
            self.state.add_alert(message, AlertStyle::Error);
        }
    }

    pub(crate) fn select_profile(&mut self, index: usize, pin: Option<String>) {
        let Some(profile) = self.state.profiles.get(index).cloned() else {
            self.state.info_alert(format!("There is no profile number {}.", index + 1));
            return;
        };
        match self.state.profiles.begin_selection(profile, pin.as_deref()) {
            Selection::Activate(profile) => self.activate_profile(profile),
            Selection::PromptPin => {
                self.state.info_alert("This profile is protected, enter its PIN.");
            }
            Selection::Validate { profile, pin } => {
                let Some(token) = self.token() else {
                    return;
                };
                let key = self.state.next_request();
                let id = profile.id.clone();
                self.state.profiles.validating(profile, key);
                self.spawn(move |backend| Event::PinChecked {
                    key,
                    result: backend.validate_pin(&token, &id, &pin),
                });
            }
        }
    }

    pub(crate) fn pin_checked(&mut self, key: RequestId, result: Result<bool, Error>) {
        let Some(profile) = self.state.profiles.finish_validation(key) else {
            log::info!("discarding stale PIN check {}", key);
            return;
        };
        match result {
            Ok(true) => self.activate_profile(profile),
            Ok(false) => self.state.error_alert(&Error::InvalidPin),
            Err(err) => {
                log::error!("PIN validation failed: {}", err);
                self.state.error_alert(&err);
            }
        }
    }

    pub(crate) fn cancel_pin(&mut self) {
        self.state.profiles.prompt = Default::default();
    }

    fn activate_profile(&mut self, profile: Profile) {
        log::info!("activating profile {:?}", profile.name);
        if let Err(err) = self.session.set_active_profile(Some(profile)) {
            log::error!("failed to persist active profile: {}", err);
            self.state.error_alert(&err);
            return;
        }
        self.refresh_session();
        self.state.route = Route::Browse;
        self.load_catalog();
    }

    pub(crate) fn create_profile(&mut self, name: String) {
        let name = name.trim().to_string();
        if name.is_empty() {
            self.state.error_alert(&Error::Validation("profile name"));
            return;
        }
        let Some(token) = self.token() else {
            return;
        };
        let key = self.state.next_request();
        self.state.profiles.creating = Some(key);
        self.spawn(move |backend| Event::ProfileCreated {
            key,
            result: backend.create_profile(&token, &name),
        });
    }

    pub(crate) fn profile_created(&mut self, key: RequestId, result: Result<Profile, Error>) {
        if self.state.profiles.creating != Some(key) {
            log::info!("discarding stale profile creation {}", key);
            return;
        }
        self.state.profiles.creating = None;
        match result {
            Ok(profile) => {
                self.state.info_alert(format!("Profile {} created.", profile.name));
                self.state.profiles.push(profile);
            }
            Err(err) => {
                log::error!("failed to create profile: {}", err);
                self.state.error_alert(&err);
            }
        }
    }
}
