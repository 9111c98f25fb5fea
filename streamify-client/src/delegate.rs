use std::{sync::Arc, time::Duration};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use streamify_core::{
    error::Error,
    player::PlaybackEngine,
    session::SessionStore,
    webapi::{ApiRoot, Backend},
};

use crate::{
    cmd::{Command, Event},
    data::{AppState, Config, Route},
    task::Spawner,
    timer::HeroTimer,
};

pub type EngineFactory = Box<dyn Fn() -> Box<dyn PlaybackEngine>>;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Owner of the application state.  Every mutation happens on the thread
/// that drives the delegate, backend calls run on the spawner and come back
/// as events.
pub struct Delegate {
    pub state: AppState,
    pub(crate) config: Config,
    pub(crate) root: ApiRoot,
    pub(crate) backend: Arc<dyn Backend>,
    pub(crate) session: SessionStore,
    pub(crate) engines: EngineFactory,
    pub(crate) hero_timer: Option<HeroTimer>,
    pub(crate) hero_generation: u64,
    spawner: Box<dyn Spawner>,
    sender: Sender<Event>,
    receiver: Receiver<Event>,
}

impl Delegate {
    pub fn new(
        config: Config,
        backend: Arc<dyn Backend>,
        session: SessionStore,
        spawner: Box<dyn Spawner>,
        engines: EngineFactory,
    ) -> Result<Self, Error> {
        let root = ApiRoot::new(&config.base_url)?;
        let (sender, receiver) = unbounded();
        let mut this = Self {
            state: AppState::new(config.avatar_page_size),
            config,
            root,
            backend,
            session,
            engines,
            hero_timer: None,
            hero_generation: 0,
            spawner,
            sender,
            receiver,
        };
        this.refresh_session();
        this.state.route = match (&this.state.identity, &this.state.active_profile) {
            (None, _) => Route::SignedOut,
            (Some(_), None) => Route::ProfileSelect,
            (Some(_), Some(_)) => Route::Browse,
        };
        Ok(this)
    }

    pub fn sender(&self) -> Sender<Event> {
        self.sender.clone()
    }

    pub fn root(&self) -> &ApiRoot {
        &self.root
    }

    /// Issue the requests the restored session needs.
    pub fn start(&mut self) {
        match self.state.route {
            Route::ProfileSelect => self.load_profiles(),
            Route::Browse => self.load_catalog(),
            Route::SignedOut | Route::Account => {}
        }
    }

    /// Process events until `Quit`, calling `render` after each one.
    pub fn run(&mut self, mut render: impl FnMut(&AppState)) {
        render(&self.state);
        loop {
            match self.receiver.recv_timeout(CLEANUP_INTERVAL) {
                Ok(event) => {
                    if !self.handle(event) {
                        break;
                    }
                    render(&self.state);
                }
                Err(RecvTimeoutError::Timeout) => {
                    let before = self.state.alerts.len();
                    self.state.cleanup_alerts();
                    if self.state.alerts.len() != before {
                        render(&self.state);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.stop_hero();
        self.state.focus.clear();
    }

    /// Process all queued events without blocking.  Returns false if one of
    /// them was `Quit`.
    pub fn drain(&mut self) -> bool {
        while let Ok(event) = self.receiver.try_recv() {
            if !self.handle(event) {
                return false;
            }
        }
        true
    }

    pub fn command(&mut self, cmd: Command) -> bool {
        self.handle(Event::Command(cmd))
    }

    /// Apply one event.  Returns false when the application should quit.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Command(cmd) => return self.handle_command(cmd),
            Event::HeroTick { generation } => self.hero_tick(generation),
            Event::LoggedIn { key, result } => self.logged_in(key, result),
            Event::AccountUpdated {
                key,
                update,
                result,
            } => self.account_updated(key, update, result),
            Event::ProfilesLoaded { key, result } => self.profiles_loaded(key, result),
            Event::PinChecked { key, result } => self.pin_checked(key, result),
            Event::ProfileCreated { key, result } => self.profile_created(key, result),
            Event::CatalogLoaded { key, result } => self.catalog_loaded(key, result),
            Event::SynopsisLoaded { key, result } => self.synopsis_loaded(key, result),
            Event::Favorited { item, result } => self.favorited(item, result),
            Event::WatchRegistered { item, result } => self.watch_registered(item, result),
            Event::AvatarsLoaded { key, result } => self.avatars_loaded(key, result),
        }
        true
    }

    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Login { email, password } => self.login(email, password),
            Command::Register {
                name,
                email,
                password,
            } => self.register(name, email, password),
            Command::Logout => self.logout(),
            Command::OpenAccount => self.open_account(),
            Command::CloseAccount => self.close_account(),
            Command::UpdateAccount(form) => self.update_account(form),
            Command::LoadProfiles => self.load_profiles(),
            Command::SelectProfile { index, pin } => self.select_profile(index, pin),
            Command::CancelPin => self.cancel_pin(),
            Command::CreateProfile { name } => self.create_profile(name),
            Command::LoadCatalog => self.load_catalog(),
            Command::SelectHero => self.select_hero(),
            Command::OpenDetail(item) => self.open_detail(item),
            Command::CloseDetail => self.close_detail(),
            Command::Favorite => self.favorite(),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::TogglePlayback => self.toggle_playback(),
            Command::ClosePlayer => self.close_player(),
            Command::Dismiss => self.dismiss(),
            Command::LoadAvatars => self.load_avatars(),
            Command::LoadMoreAvatars(category) => self.load_more_avatars(category),
            Command::ChooseAvatar { category, index } => self.choose_avatar(category, index),
            Command::DismissAlert(id) => self.state.dismiss_alert(id),
            Command::CleanupAlerts => self.state.cleanup_alerts(),
            Command::Quit => {
                log::info!("quitting");
                return false;
            }
        }
        true
    }
}

impl Delegate {
    /// Run `task` on the spawner and post its event back to us.
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: FnOnce(&dyn Backend) -> Event + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        self.spawner.spawn(Box::new(move || {
            let event = task(backend.as_ref());
            if sender.send(event).is_err() {
                log::warn!("dispatcher is gone, dropping result");
            }
        }));
    }

    /// Current auth token, alerting when there is none.
    pub(crate) fn token(&mut self) -> Option<String> {
        let token = self.session.token();
        if token.is_none() {
            self.state.error_alert(&Error::NotSignedIn);
        }
        token
    }

    pub(crate) fn refresh_session(&mut self) {
        self.state.identity = self.session.identity();
        self.state.active_profile = self.session.active_profile();
    }
}
