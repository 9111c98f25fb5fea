use streamify_core::{
    error::Error,
    session::{AccountForm, Identity},
    webapi::{AccountUpdate, AvatarSets, ContentBuckets, Id, Profile},
};

use crate::data::{AvatarCategory, ItemRef, RequestId};

/// User intents, as produced by the front end.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    // Session
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    Logout,
    OpenAccount,
    CloseAccount,
    UpdateAccount(AccountForm),

    // Profiles
    LoadProfiles,
    SelectProfile {
        index: usize,
        pin: Option<String>,
    },
    CancelPin,
    CreateProfile {
        name: String,
    },

    // Browse
    LoadCatalog,
    SelectHero,
    OpenDetail(ItemRef),
    CloseDetail,
    Favorite,

    // Playback
    Play,
    Pause,
    TogglePlayback,
    ClosePlayer,
    /// Escape gesture: closes whatever has focus.
    Dismiss,

    // Avatars
    LoadAvatars,
    LoadMoreAvatars(AvatarCategory),
    ChooseAvatar {
        category: AvatarCategory,
        index: usize,
    },

    DismissAlert(usize),
    CleanupAlerts,
    Quit,
}

/// Everything the dispatcher reacts to: commands, timer ticks and the
/// results of backend requests.
#[derive(Debug)]
pub enum Event {
    Command(Command),
    HeroTick {
        generation: u64,
    },
    LoggedIn {
        key: RequestId,
        result: Result<Identity, Error>,
    },
    AccountUpdated {
        key: RequestId,
        update: AccountUpdate,
        result: Result<(), Error>,
    },
    ProfilesLoaded {
        key: RequestId,
        result: Result<Vec<Profile>, Error>,
    },
    PinChecked {
        key: RequestId,
        result: Result<bool, Error>,
    },
    ProfileCreated {
        key: RequestId,
        result: Result<Profile, Error>,
    },
    CatalogLoaded {
        key: RequestId,
        result: Result<ContentBuckets, Error>,
    },
    SynopsisLoaded {
        key: RequestId,
        result: Result<Option<String>, Error>,
    },
    Favorited {
        item: Id,
        result: Result<(), Error>,
    },
    WatchRegistered {
        item: Id,
        result: Result<(), Error>,
    },
    AvatarsLoaded {
        key: RequestId,
        result: Result<AvatarSets, Error>,
    },
}

impl From<Command> for Event {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}
