use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{
    error::Error,
    webapi::{model::AuthResponse, AccountUpdate, Profile},
};

/// Authenticated account.  Only the session store writes it, everyone else
/// works with snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    pub token: String,
}

impl Identity {
    pub fn from_auth(response: AuthResponse) -> Self {
        Self {
            name: response.user.name,
            email: response.user.email,
            avatar: response.user.avatar.unwrap_or_default(),
            token: response.token,
        }
    }
}

/// Values submitted from the account form.  Blank fields mean "keep".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountForm {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub password: String,
}

impl AccountForm {
    /// Changed fields relative to `current`.  Name, email and avatar count
    /// only when non-blank and different, the password whenever non-blank.
    pub fn diff(&self, current: &Identity) -> AccountUpdate {
        fn changed(new: &str, old: &str) -> Option<String> {
            let new = new.trim();
            (!new.is_empty() && new != old).then(|| new.to_string())
        }
        AccountUpdate {
            name: changed(&self.name, &current.name),
            email: changed(&self.email, &current.email),
            avatar: changed(&self.avatar, &current.avatar),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct PersistedSession {
    identity: Option<Identity>,
    active_profile: Option<Profile>,
}

/// Cheap to clone handle of the process-wide session.  Loaded once at
/// startup, cleared at logout.  Every mutation is written to disk before the
/// in-memory copy changes, so a failed write leaves both untouched.
#[derive(Clone)]
pub struct SessionStore {
    path: Option<Arc<PathBuf>>,
    state: Arc<Mutex<PersistedSession>>,
}

impl SessionStore {
    pub const FILENAME: &'static str = "session.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(Arc::new(path.into())),
            state: Arc::default(),
        }
    }

    /// Store that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Arc::default(),
        }
    }

    /// Read the persisted session, if any.  A missing file is not an error.
    pub fn load(&self) -> Result<(), Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = match File::open(path.as_path()) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("no saved session at {:?}", path);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let persisted: PersistedSession = serde_json::from_reader(file)?;
        log::info!("loaded session from {:?}", path);
        *self.state.lock() = persisted;
        Ok(())
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.lock().identity.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().identity.as_ref().map(|i| i.token.clone())
    }

    pub fn active_profile(&self) -> Option<Profile> {
        self.state.lock().active_profile.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.lock().identity.is_some()
    }

    /// Start a new session, forgetting any previously active profile.
    pub fn sign_in(&self, identity: Identity) -> Result<(), Error> {
        self.replace(PersistedSession {
            identity: Some(identity),
            active_profile: None,
        })
    }

    /// Compute the update to send for `form`.  Fails with `NoChanges` when
    /// nothing differs, so the caller never issues an empty request.
    pub fn diff(&self, form: &AccountForm) -> Result<AccountUpdate, Error> {
        let state = self.state.lock();
        let identity = state.identity.as_ref().ok_or(Error::NotSignedIn)?;
        let update = form.diff(identity);
        if update.is_empty() {
            Err(Error::NoChanges)
        } else {
            Ok(update)
        }
    }

    /// Merge an update the backend has accepted.  The password is never kept.
    pub fn apply(&self, update: &AccountUpdate) -> Result<Identity, Error> {
        let mut next = self.state.lock().clone();
        let identity = next.identity.as_mut().ok_or(Error::NotSignedIn)?;
        if let Some(name) = &update.name {
            identity.name = name.clone();
        }
        if let Some(email) = &update.email {
            identity.email = email.clone();
        }
        if let Some(avatar) = &update.avatar {
            identity.avatar = avatar.clone();
        }
        let identity = identity.clone();
        self.replace(next)?;
        Ok(identity)
    }

    pub fn set_active_profile(&self, profile: Option<Profile>) -> Result<(), Error> {
        let mut next = self.state.lock().clone();
        if next.identity.is_none() {
            return Err(Error::NotSignedIn);
        }
        next.active_profile = profile;
        self.replace(next)
    }

    /// End the session and remove the persisted copy.
    pub fn clear(&self) -> Result<(), Error> {
        if let Some(path) = &self.path {
            match fs::remove_file(path.as_path()) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        *self.state.lock() = PersistedSession::default();
        log::info!("session cleared");
        Ok(())
    }

    fn replace(&self, next: PersistedSession) -> Result<(), Error> {
        if let Some(path) = &self.path {
            write_atomically(path, &next)?;
        }
        *self.state.lock() = next;
        Ok(())
    }
}

fn write_atomically(path: &Path, session: &PersistedSession) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, session)?;
    file.flush()?;
    file.persist(path).map_err(|err| Error::IoError(err.error))?;
    Ok(())
}
