mod client;
pub mod model;

use url::Url;

use crate::{error::Error, session::Identity};

pub use self::{
    client::WebApi,
    model::{
        AccountUpdate, AvatarSets, Bucket, CatalogItem, ContentBuckets, Credentials, Id, Profile,
        Registration,
    },
};

/// Everything the client needs from the backend.  Implemented over HTTP by
/// `WebApi`; calls are blocking and are expected to run off the dispatcher
/// thread.
pub trait Backend: Send + Sync {
    fn login(&self, credentials: &Credentials) -> Result<Identity, Error>;

    fn register(&self, registration: &Registration) -> Result<(), Error>;

    fn update_account(&self, token: &str, update: &AccountUpdate) -> Result<(), Error>;

    fn content(&self, token: &str) -> Result<ContentBuckets, Error>;

    /// Remote synopsis keyed by the display name, `None` if the backend has
    /// nothing for it.
    fn synopsis(&self, token: &str, name: &str) -> Result<Option<String>, Error>;

    fn avatars(&self) -> Result<AvatarSets, Error>;

    /// Decode failures yield an empty list, transport failures are errors.
    fn profiles(&self, token: &str) -> Result<Vec<Profile>, Error>;

    fn create_profile(&self, token: &str, name: &str) -> Result<Profile, Error>;

    fn validate_pin(&self, token: &str, profile: &Id, pin: &str) -> Result<bool, Error>;

    fn favorite(&self, token: &str, content: &Id) -> Result<(), Error>;

    fn register_watch(&self, token: &str, content: &Id) -> Result<(), Error>;
}

/// Root of the backend deployment.  API endpoints live under `api/`, static
/// assets (avatars, posters) directly under the root.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRoot {
    base: Url,
}

impl ApiRoot {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let url = self
            .base
            .join("api/")?
            .join(path.trim_start_matches('/'))?;
        Ok(url)
    }

    /// Absolute URL of an asset reference.  Absolute references are kept,
    /// relative ones are resolved against the root.
    pub fn asset_url(&self, reference: &str) -> String {
        if is_absolute(reference) {
            return reference.to_string();
        }
        match self.base.join(reference.trim_start_matches('/')) {
            Ok(url) => url.into(),
            Err(err) => {
                log::warn!("cannot resolve asset {:?}: {}", reference, err);
                reference.to_string()
            }
        }
    }
}

fn is_absolute(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
