use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use serde_json::json;
use streamify_client::{
    data::{AvatarCategory, Config, Focus, ItemRef, PinPrompt, Route},
    task::Inline,
    Command, Delegate, Event,
};
use streamify_core::{
    error::Error,
    player::{PlaybackEngine, PlaybackState},
    session::{AccountForm, Identity, SessionStore},
    webapi::{
        AccountUpdate, AvatarSets, Backend, ContentBuckets, Credentials, Id, Profile, Registration,
    },
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Login(String),
    Register(String),
    UpdateAccount(AccountUpdate),
    Content,
    Synopsis(String),
    Avatars,
    Profiles,
    CreateProfile(String),
    ValidatePin(Id, String),
    Favorite(Id),
    Watch(Id),
}

/// Backend answering from canned data and recording every call.
struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    /// `None` makes `/content` fail with a timeout.
    content: Mutex<Option<serde_json::Value>>,
    /// `None` makes the synopsis lookup time out.
    synopsis: Mutex<Option<Option<String>>>,
    /// Backend message for a rejected account update.
    update_rejection: Mutex<Option<String>>,
    profiles: Vec<Profile>,
    pin: &'static str,
    avatars: AvatarSets,
}

impl FakeBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            content: Mutex::new(Some(catalog(3, 2))),
            synopsis: Mutex::new(Some(Some("A remote synopsis.".into()))),
            update_rejection: Mutex::new(None),
            profiles: vec![
                profile(1, "Ana", None),
                profile(2, "Kids", Some("1234")),
            ],
            pin: "1234",
            avatars: AvatarSets {
                perfil: (0..12).map(|i| format!("p{i}.png")).collect(),
                perfix: (0..3).map(|i| format!("x{i}.png")).collect(),
            },
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

fn timeout() -> Error {
    Error::ConnectivityError(Box::new(io::Error::new(
        io::ErrorKind::TimedOut,
        "timed out",
    )))
}

impl Backend for FakeBackend {
    fn login(&self, credentials: &Credentials) -> Result<Identity, Error> {
        self.record(Call::Login(credentials.email.clone()));
        Ok(Identity {
            name: "Ana".into(),
            email: credentials.email.clone(),
            avatar: "assets/perfil/p0.png".into(),
            token: "tok".into(),
        })
    }

    fn register(&self, registration: &Registration) -> Result<(), Error> {
        self.record(Call::Register(registration.email.clone()));
        Ok(())
    }

    fn update_account(&self, _token: &str, update: &AccountUpdate) -> Result<(), Error> {
        self.record(Call::UpdateAccount(update.clone()));
        match self.update_rejection.lock().clone() {
            Some(message) => Err(Error::Rejected {
                status: 409,
                message: Some(message),
            }),
            None => Ok(()),
        }
    }

    fn content(&self, _token: &str) -> Result<ContentBuckets, Error> {
        self.record(Call::Content);
        match self.content.lock().clone() {
            Some(body) => Ok(ContentBuckets::from_value(body)?),
            None => Err(timeout()),
        }
    }

    fn synopsis(&self, _token: &str, name: &str) -> Result<Option<String>, Error> {
        self.record(Call::Synopsis(name.to_string()));
        self.synopsis.lock().clone().ok_or_else(timeout)
    }

    fn avatars(&self) -> Result<AvatarSets, Error> {
        self.record(Call::Avatars);
        Ok(self.avatars.clone())
    }

    fn profiles(&self, _token: &str) -> Result<Vec<Profile>, Error> {
        self.record(Call::Profiles);
        Ok(self.profiles.clone())
    }

    fn create_profile(&self, _token: &str, name: &str) -> Result<Profile, Error> {
        self.record(Call::CreateProfile(name.to_string()));
        Ok(profile(99, name, None))
    }

    fn validate_pin(&self, _token: &str, profile: &Id, pin: &str) -> Result<bool, Error> {
        self.record(Call::ValidatePin(profile.clone(), pin.to_string()));
        Ok(pin == self.pin)
    }

    fn favorite(&self, _token: &str, content: &Id) -> Result<(), Error> {
        self.record(Call::Favorite(content.clone()));
        Ok(())
    }

    fn register_watch(&self, _token: &str, content: &Id) -> Result<(), Error> {
        self.record(Call::Watch(content.clone()));
        Ok(())
    }
}

fn profile(id: u64, name: &str, pin: Option<&str>) -> Profile {
    Profile {
        id: Id::from(id),
        name: name.into(),
        avatar: None,
        pin: pin.map(Into::into),
    }
}

fn items(prefix: &str, first_id: u64, n: u64) -> serde_json::Value {
    (0..n)
        .map(|i| {
            json!({
                "id": first_id + i,
                "nome": format!("{prefix} {i}"),
                "descricao": "",
                "url": format!("http://media.test/{prefix}{i}.mp4"),
            })
        })
        .collect()
}

fn catalog(movies: u64, series: u64) -> serde_json::Value {
    json!({
        "lancamentos": { "filmes": items("Movie", 1, movies), "series": items("Series", 100, series) },
        "em_alta": { "filmes": [{ "id": 500, "nome": "Lost in Time", "url": "https://cdn.test/lost.mp4" }] },
    })
}

struct NullEngine {
    disposed: Arc<AtomicUsize>,
}

impl PlaybackEngine for NullEngine {
    fn attach(&mut self, _url: &str) -> Result<(), Error> {
        Ok(())
    }

    fn play(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    delegate: Delegate,
    backend: Arc<FakeBackend>,
    disposed: Arc<AtomicUsize>,
}

impl Harness {
    fn new(backend: Arc<FakeBackend>) -> Self {
        Self::with_session(backend, SessionStore::in_memory())
    }

    fn with_session(backend: Arc<FakeBackend>, session: SessionStore) -> Self {
        let config = Config {
            hero_interval_secs: 3600,
            ..Config::default()
        };
        let disposed = Arc::new(AtomicUsize::new(0));
        let engines = {
            let disposed = disposed.clone();
            Box::new(move || -> Box<dyn PlaybackEngine> {
                Box::new(NullEngine {
                    disposed: disposed.clone(),
                })
            })
        };
        let delegate = Delegate::new(
            config,
            backend.clone(),
            session,
            Box::new(Inline),
            engines,
        )
        .unwrap();
        Self {
            delegate,
            backend,
            disposed,
        }
    }

    fn run(&mut self, cmd: Command) {
        assert!(self.delegate.command(cmd));
        assert!(self.delegate.drain());
    }

    fn signed_in() -> Self {
        let mut this = Self::new(FakeBackend::new());
        this.run(Command::Login {
            email: "ana@mail.test".into(),
            password: "secret".into(),
        });
        this
    }

    fn browsing() -> Self {
        let mut this = Self::signed_in();
        this.run(Command::SelectProfile {
            index: 0,
            pin: None,
        });
        this
    }

    fn featured_names(&self) -> Vec<String> {
        let catalog = &self.delegate.state.catalog.catalog;
        catalog.featured.iter().map(|item| item.name.clone()).collect()
    }
}

#[test]
fn login_lists_profiles() {
    let harness = Harness::signed_in();
    assert_eq!(harness.delegate.state.route, Route::ProfileSelect);
    assert_eq!(harness.delegate.state.profiles.list().len(), 2);
    assert_eq!(
        harness.backend.calls(),
        [Call::Login("ana@mail.test".into()), Call::Profiles]
    );
}

#[test]
fn blank_credentials_never_reach_the_backend() {
    let mut harness = Harness::new(FakeBackend::new());
    harness.run(Command::Login {
        email: "  ".into(),
        password: "secret".into(),
    });
    assert!(harness.backend.calls().is_empty());
    assert_eq!(harness.delegate.state.route, Route::SignedOut);
    assert_eq!(harness.delegate.state.alerts.len(), 1);
}

#[test]
fn registration_signs_in_afterwards() {
    let mut harness = Harness::new(FakeBackend::new());
    harness.run(Command::Register {
        name: "Ana".into(),
        email: "ana@mail.test".into(),
        password: "secret".into(),
    });
    assert_eq!(
        harness.backend.calls()[..2],
        [
            Call::Register("ana@mail.test".into()),
            Call::Login("ana@mail.test".into())
        ]
    );
    assert!(harness.delegate.state.identity.is_some());
}

#[test]
fn featured_bucket_merges_movies_then_series() {
    let harness = Harness::browsing();
    assert_eq!(harness.delegate.state.route, Route::Browse);
    assert_eq!(
        harness.featured_names(),
        ["Movie 0", "Movie 1", "Movie 2", "Series 0", "Series 1"]
    );
    assert_eq!(harness.delegate.state.hero.current(), Some(0));
    assert!(harness.delegate.hero_timer_running());
}

#[test]
fn empty_pin_profile_selects_immediately() {
    let harness = Harness::browsing();
    assert_eq!(
        harness.delegate.state.active_profile.as_ref().map(|p| &p.name[..]),
        Some("Ana")
    );
    assert_eq!(
        harness.backend.count(|call| matches!(call, Call::ValidatePin(..))),
        0
    );
}

#[test]
fn protected_profile_prompts_for_pin() {
    let mut harness = Harness::signed_in();
    harness.run(Command::SelectProfile {
        index: 1,
        pin: None,
    });
    assert!(matches!(
        harness.delegate.state.profiles.prompt,
        PinPrompt::Required(_)
    ));
    assert!(harness.delegate.state.active_profile.is_none());
    harness.run(Command::Dismiss);
    assert_eq!(harness.delegate.state.profiles.prompt, PinPrompt::Closed);
}

#[test]
fn wrong_pin_never_selects() {
    let mut harness = Harness::signed_in();
    harness.run(Command::SelectProfile {
        index: 1,
        pin: Some("0000".into()),
    });
    assert!(harness.delegate.state.active_profile.is_none());
    assert_eq!(harness.delegate.state.route, Route::ProfileSelect);
    assert_eq!(harness.backend.count(|call| *call == Call::Content), 0);
    let alert = harness.delegate.state.alerts.last().unwrap();
    assert_eq!(&*alert.message, "Invalid PIN.");
}

#[test]
fn right_pin_selects() {
    let mut harness = Harness::signed_in();
    harness.run(Command::SelectProfile {
        index: 1,
        pin: Some("1234".into()),
    });
    assert_eq!(
        harness.delegate.state.active_profile.as_ref().map(|p| p.id.clone()),
        Some(Id::from(2))
    );
    assert_eq!(harness.delegate.state.route, Route::Browse);
}

#[test]
fn created_profile_is_appended_without_refetch() {
    let mut harness = Harness::signed_in();
    harness.run(Command::CreateProfile { name: "  ".into() });
    assert_eq!(
        harness.backend.count(|call| matches!(call, Call::CreateProfile(_))),
        0
    );
    harness.run(Command::CreateProfile {
        name: "Guest".into(),
    });
    assert_eq!(harness.delegate.state.profiles.list().len(), 3);
    assert_eq!(harness.backend.count(|call| *call == Call::Profiles), 1);
}

#[test]
fn empty_account_diff_makes_no_call() {
    let mut harness = Harness::signed_in();
    harness.run(Command::UpdateAccount(AccountForm {
        name: "Ana".into(),
        email: "ana@mail.test".into(),
        ..AccountForm::default()
    }));
    assert_eq!(
        harness
            .backend
            .count(|call| matches!(call, Call::UpdateAccount(_))),
        0
    );
    let alert = harness.delegate.state.alerts.last().unwrap();
    assert_eq!(&*alert.message, "No changes were made.");
}

#[test]
fn rejected_account_update_keeps_the_saved_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SessionStore::FILENAME);
    let backend = FakeBackend::new();
    let mut harness = Harness::with_session(backend.clone(), SessionStore::new(&path));
    harness.run(Command::Login {
        email: "ana@mail.test".into(),
        password: "secret".into(),
    });
    let before = harness.delegate.state.identity.clone().unwrap();

    *backend.update_rejection.lock() = Some("Email already registered".into());
    harness.run(Command::UpdateAccount(AccountForm {
        name: "Ana".into(),
        email: "taken@mail.test".into(),
        ..AccountForm::default()
    }));

    assert_eq!(backend.count(|call| matches!(call, Call::UpdateAccount(_))), 1);
    let alert = harness.delegate.state.alerts.last().unwrap();
    assert_eq!(&*alert.message, "Email already registered");
    assert_eq!(harness.delegate.state.identity.as_ref(), Some(&before));

    let reloaded = SessionStore::new(&path);
    reloaded.load().unwrap();
    assert_eq!(reloaded.identity(), Some(before));
}

#[test]
fn account_update_sends_changed_fields_and_chosen_avatar() {
    let mut harness = Harness::browsing();
    harness.run(Command::OpenAccount);
    assert_eq!(harness.delegate.state.route, Route::Account);
    harness.run(Command::ChooseAvatar {
        category: AvatarCategory::Perfix,
        index: 1,
    });
    harness.run(Command::UpdateAccount(AccountForm {
        name: "Ana B".into(),
        ..AccountForm::default()
    }));
    let expected = AccountUpdate {
        name: Some("Ana B".into()),
        avatar: Some("assets/perfilx/x1.png".into()),
        ..AccountUpdate::default()
    };
    assert!(harness
        .backend
        .calls()
        .contains(&Call::UpdateAccount(expected)));
    let identity = harness.delegate.state.identity.as_ref().unwrap();
    assert_eq!(identity.name, "Ana B");
    assert_eq!(identity.avatar, "assets/perfilx/x1.png");
}

#[test]
fn missing_synopsis_is_looked_up_once_by_name() {
    let mut harness = Harness::browsing();
    harness.run(Command::OpenDetail(ItemRef::Shelf { shelf: 1, index: 0 }));
    assert_eq!(
        harness
            .backend
            .count(|call| *call == Call::Synopsis("Lost in Time".into())),
        1
    );
    let view = harness.delegate.state.focus.detail().unwrap();
    assert_eq!(view.description(), "A remote synopsis.");
}

#[test]
fn failed_synopsis_lookup_shows_the_name() {
    let backend = FakeBackend::new();
    *backend.synopsis.lock() = None;
    let mut harness = Harness::new(backend);
    harness.run(Command::Login {
        email: "ana@mail.test".into(),
        password: "secret".into(),
    });
    harness.run(Command::SelectProfile {
        index: 0,
        pin: None,
    });
    harness.run(Command::OpenDetail(ItemRef::Shelf { shelf: 1, index: 0 }));
    assert_eq!(
        harness.backend.count(|call| matches!(call, Call::Synopsis(_))),
        1
    );
    let view = harness.delegate.state.focus.detail().unwrap();
    assert_eq!(view.description(), "Lost in Time");
}

#[test]
fn late_synopsis_for_closed_detail_is_discarded() {
    let mut harness = Harness::browsing();
    // The lookup result is queued but not yet applied.
    assert!(harness
        .delegate
        .command(Command::OpenDetail(ItemRef::Shelf { shelf: 1, index: 0 })));
    assert!(harness.delegate.command(Command::CloseDetail));
    assert!(harness.delegate.drain());
    assert!(matches!(harness.delegate.state.focus, Focus::None));
}

#[test]
fn favorite_marks_the_open_item() {
    let mut harness = Harness::browsing();
    harness.run(Command::OpenDetail(ItemRef::Featured(1)));
    harness.run(Command::Favorite);
    harness.run(Command::Favorite);
    assert_eq!(
        harness
            .backend
            .count(|call| *call == Call::Favorite(Id::from(2))),
        2
    );
    assert!(harness.delegate.state.focus.detail().unwrap().favorited);
}

#[test]
fn play_replaces_detail_with_player() {
    let mut harness = Harness::browsing();
    harness.run(Command::OpenDetail(ItemRef::Featured(0)));
    harness.run(Command::Play);
    let session = harness.delegate.state.focus.player().unwrap();
    assert!(harness.delegate.state.focus.detail().is_none());
    assert_eq!(session.state(), &PlaybackState::Ready { attached: true });
    let url = session.url().unwrap();
    assert!(url.is_proxied());
    assert!(url.as_str().contains("url=http%3A%2F%2Fmedia.test%2FMovie0.mp4"));
}

#[test]
fn open_then_close_registers_no_watch() {
    let mut harness = Harness::browsing();
    harness.run(Command::OpenDetail(ItemRef::Featured(0)));
    harness.run(Command::Play);
    harness.run(Command::ClosePlayer);
    assert!(matches!(harness.delegate.state.focus, Focus::None));
    assert_eq!(harness.backend.count(|call| matches!(call, Call::Watch(_))), 0);
    assert_eq!(harness.disposed.load(Ordering::SeqCst), 1);
}

#[test]
fn watch_is_registered_once_per_session() {
    let mut harness = Harness::browsing();
    harness.run(Command::OpenDetail(ItemRef::Featured(0)));
    harness.run(Command::Play);
    harness.run(Command::Play);
    harness.run(Command::Pause);
    harness.run(Command::TogglePlayback);
    harness.run(Command::Play);
    assert_eq!(
        harness.backend.count(|call| *call == Call::Watch(Id::from(1))),
        1
    );
    harness.run(Command::Dismiss);
    assert!(matches!(harness.delegate.state.focus, Focus::None));
    assert_eq!(harness.disposed.load(Ordering::SeqCst), 1);
}

#[test]
fn network_failure_keeps_the_old_catalog() {
    let mut harness = Harness::browsing();
    let before = harness.featured_names();
    *harness.backend.content.lock() = None;
    harness.run(Command::LoadCatalog);
    assert_eq!(harness.featured_names(), before);
    let alert = harness.delegate.state.alerts.last().unwrap();
    assert_eq!(&*alert.message, "Could not connect to the server.");
}

#[test]
fn missing_featured_bucket_is_reported() {
    let mut harness = Harness::browsing();
    *harness.backend.content.lock() = Some(json!({ "em_alta": { "filmes": [] } }));
    harness.run(Command::LoadCatalog);
    assert!(harness.featured_names().is_empty());
    assert_eq!(harness.delegate.state.hero.current(), None);
    assert!(!harness.delegate.hero_timer_running());
    let alert = harness.delegate.state.alerts.last().unwrap();
    assert_eq!(&*alert.message, "No new releases are available right now.");
}

#[test]
fn empty_catalog_starts_no_timer() {
    let backend = FakeBackend::new();
    *backend.content.lock() = Some(catalog(0, 0));
    let mut harness = Harness::new(backend);
    harness.run(Command::Login {
        email: "ana@mail.test".into(),
        password: "secret".into(),
    });
    harness.run(Command::SelectProfile {
        index: 0,
        pin: None,
    });
    assert!(!harness.delegate.state.hero.is_cycling());
    assert!(!harness.delegate.hero_timer_running());
    harness.run(Command::SelectHero);
    assert!(harness.delegate.state.focus.detail().is_none());
}

#[test]
fn hero_ticks_cycle_and_stale_ticks_are_ignored() {
    let mut harness = Harness::browsing();
    let generation = harness.delegate.hero_generation();
    for _ in 0..7 {
        assert!(harness.delegate.handle(Event::HeroTick { generation }));
    }
    assert_eq!(harness.delegate.state.hero.current(), Some(7 % 5));

    harness.run(Command::LoadCatalog);
    assert_ne!(harness.delegate.hero_generation(), generation);
    assert_eq!(harness.delegate.state.hero.current(), Some(0));
    assert!(harness.delegate.handle(Event::HeroTick { generation }));
    assert_eq!(harness.delegate.state.hero.current(), Some(0));
}

#[test]
fn selecting_the_hero_opens_the_current_item() {
    let mut harness = Harness::browsing();
    let generation = harness.delegate.hero_generation();
    harness.delegate.handle(Event::HeroTick { generation });
    harness.delegate.handle(Event::HeroTick { generation });
    harness.run(Command::SelectHero);
    let view = harness.delegate.state.focus.detail().unwrap();
    assert_eq!(view.item.name, "Movie 2");
    assert_eq!(harness.delegate.hero_generation(), generation);
}

#[test]
fn avatar_pages_grow_until_exhausted() {
    let mut harness = Harness::signed_in();
    harness.run(Command::LoadAvatars);
    let avatars = &harness.delegate.state.avatars;
    assert_eq!(avatars.visible(AvatarCategory::Perfil).len(), 10);
    assert_eq!(avatars.visible(AvatarCategory::Perfix).len(), 3);

    harness.run(Command::LoadMoreAvatars(AvatarCategory::Perfil));
    harness.run(Command::LoadMoreAvatars(AvatarCategory::Perfil));
    harness.run(Command::LoadMoreAvatars(AvatarCategory::Perfix));
    let avatars = &harness.delegate.state.avatars;
    assert_eq!(avatars.cursor(AvatarCategory::Perfil), 12);
    assert_eq!(avatars.cursor(AvatarCategory::Perfix), 3);
    assert_eq!(harness.backend.count(|call| *call == Call::Avatars), 1);
}

#[test]
fn logout_clears_everything() {
    let mut harness = Harness::browsing();
    harness.run(Command::OpenDetail(ItemRef::Featured(0)));
    harness.run(Command::Play);
    harness.run(Command::Logout);
    let state = &harness.delegate.state;
    assert_eq!(state.route, Route::SignedOut);
    assert!(state.identity.is_none());
    assert!(matches!(state.focus, Focus::None));
    assert!(state.catalog.catalog.featured.is_empty());
    assert!(!harness.delegate.hero_timer_running());
    assert_eq!(harness.disposed.load(Ordering::SeqCst), 1);
}

#[test]
fn quit_stops_the_loop() {
    let mut harness = Harness::new(FakeBackend::new());
    assert!(!harness.delegate.command(Command::Quit));
}
