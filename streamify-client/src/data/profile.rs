use std::{mem, sync::Arc};

use streamify_core::{util::non_blank, webapi::Profile};

use crate::data::{Promise, RequestId};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PinPrompt {
    #[default]
    Closed,
    /// The profile is protected and no PIN was given yet.
    Required(Profile),
    Validating {
        profile: Profile,
        key: RequestId,
    },
}

/// What selecting a profile has to do next.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Activate(Profile),
    PromptPin,
    Validate { profile: Profile, pin: String },
}

#[derive(Clone, Debug, Default)]
pub struct ProfileGate {
    pub profiles: Promise<Vec<Profile>, RequestId>,
    pub prompt: PinPrompt,
    pub creating: Option<RequestId>,
    /// Profiles created while a list refetch was in flight.
    created: Vec<Profile>,
}

impl ProfileGate {
    pub fn list(&self) -> &[Profile] {
        self.profiles.resolved().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get(&self, index: usize) -> Option<&Profile> {
        self.list().get(index)
    }

    /// Unprotected profiles activate right away.  Protected ones need a
    /// non-blank PIN, otherwise the prompt opens and nothing is selected.
    pub fn begin_selection(&mut self, profile: Profile, pin: Option<&str>) -> Selection {
        if !profile.is_protected() {
            self.prompt = PinPrompt::Closed;
            return Selection::Activate(profile);
        }
        match non_blank(pin) {
            Some(pin) => Selection::Validate {
                profile,
                pin: pin.to_string(),
            },
            None => {
                self.prompt = PinPrompt::Required(profile);
                Selection::PromptPin
            }
        }
    }

    pub fn validating(&mut self, profile: Profile, key: RequestId) {
        self.prompt = PinPrompt::Validating { profile, key };
    }

    /// Profile awaiting validation `key`, closing the prompt.  `None` when the
    /// prompt moved on in the meantime.
    pub fn finish_validation(&mut self, key: RequestId) -> Option<Profile> {
        match mem::take(&mut self.prompt) {
            PinPrompt::Validating { profile, key: k } if k == key => Some(profile),
            other => {
                self.prompt = other;
                None
            }
        }
    }

    /// Apply the list fetched for `key`, keeping profiles created while it
    /// was in flight.  Returns whether the result was taken.
    pub fn loaded(&mut self, key: RequestId, result: Result<Vec<Profile>, Arc<str>>) -> bool {
        if !self.profiles.update((key, result)) {
            return false;
        }
        let created = mem::take(&mut self.created);
        if let Some(profiles) = self.profiles.resolved_mut() {
            for profile in created {
                if !profiles.iter().any(|known| known.id == profile.id) {
                    profiles.push(profile);
                }
            }
        }
        true
    }

    /// Append a newly created profile without refetching.
    pub fn push(&mut self, profile: Profile) {
        match &mut self.profiles {
            Promise::Resolved(profiles) => profiles.push(profile),
            Promise::Deferred(_) => self.created.push(profile),
            Promise::Empty | Promise::Rejected(_) => self.profiles.resolve(vec![profile]),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
