mod alert;
mod avatar;
mod catalog;
mod config;
mod detail;
mod focus;
mod hero;
mod profile;
mod promise;

use std::{fmt, sync::Arc, time::Instant};

use streamify_core::{
    error::Error,
    session::Identity,
    webapi::{CatalogItem, Profile},
};

pub use crate::data::{
    alert::{describe_error, Alert, AlertStyle, ALERT_DURATION},
    avatar::{AvatarCategory, AvatarPicker},
    catalog::{Catalog, ItemRef, Shelf},
    config::Config,
    detail::{local_synopsis, DetailView},
    focus::Focus,
    hero::HeroRotator,
    profile::{PinPrompt, ProfileGate, Selection},
    promise::{Promise, PromiseState},
};

/// Key of one issued backend request.  Results carry it back so state can
/// tell whether it still waits for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    SignedOut,
    ProfileSelect,
    Browse,
    Account,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogState {
    pub catalog: Arc<Catalog>,
    pub pending: Option<RequestId>,
}

/// Account form state that outlives one submit: the avatar picked in the
/// picker, and the update in flight.
#[derive(Clone, Debug, Default)]
pub struct AccountDraft {
    pub avatar: Option<String>,
    pub pending: Option<RequestId>,
}

pub struct AppState {
    pub route: Route,
    /// Snapshot of the session store, refreshed after every write to it.
    pub identity: Option<Identity>,
    pub active_profile: Option<Profile>,
    pub auth_pending: Option<RequestId>,
    pub catalog: CatalogState,
    pub hero: HeroRotator,
    pub focus: Focus,
    pub profiles: ProfileGate,
    pub avatars: AvatarPicker,
    pub account: AccountDraft,
    pub alerts: Vec<Alert>,
    next_alert_id: usize,
    next_request_id: u64,
}

impl AppState {
    pub fn new(avatar_page_size: usize) -> Self {
        Self {
            route: Route::SignedOut,
            identity: None,
            active_profile: None,
            auth_pending: None,
            catalog: CatalogState::default(),
            hero: HeroRotator::default(),
            focus: Focus::None,
            profiles: ProfileGate::default(),
            avatars: AvatarPicker::new(avatar_page_size),
            account: AccountDraft::default(),
            alerts: Vec::new(),
            next_alert_id: 0,
            next_request_id: 0,
        }
    }

    pub fn next_request(&mut self) -> RequestId {
        self.next_request_id += 1;
        RequestId(self.next_request_id)
    }

    pub fn featured(&self) -> Option<&Arc<CatalogItem>> {
        self.hero
            .current()
            .and_then(|index| self.catalog.catalog.featured.get(index))
    }

    /// Drop everything that belongs to the signed-in account.
    pub fn sign_out(&mut self) {
        self.focus.clear();
        self.route = Route::SignedOut;
        self.identity = None;
        self.active_profile = None;
        self.auth_pending = None;
        self.catalog = CatalogState::default();
        self.hero = HeroRotator::default();
        self.profiles.reset();
        self.avatars.reset();
        self.account = AccountDraft::default();
    }
}

impl AppState {
    pub fn add_alert(&mut self, message: impl fmt::Display, style: AlertStyle) {
        let alert = Alert {
            id: self.next_alert_id,
            message: message.to_string().into(),
            style,
            created_at: Instant::now(),
        };
        self.next_alert_id += 1;
        self.alerts.push(alert);
    }

    pub fn info_alert(&mut self, message: impl fmt::Display) {
        self.add_alert(message, AlertStyle::Info);
    }

    pub fn error_alert(&mut self, err: &Error) {
        self.add_alert(describe_error(err), AlertStyle::Error);
    }

    pub fn dismiss_alert(&mut self, id: usize) {
        self.alerts.retain(|a| a.id != id);
    }

    pub fn cleanup_alerts(&mut self) {
        let now = Instant::now();
        self.alerts.retain(|alert| !alert.is_expired(now));
    }
}
