use std::fmt;

use crate::{error::Error, webapi::ApiRoot};

const INSECURE_SCHEME: &str = "http://";

/// Where the playback engine should fetch the media from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackUrl {
    Direct(String),
    /// Insecure source, relayed through the backend proxy.
    Proxied(String),
}

impl PlaybackUrl {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Direct(url) | Self::Proxied(url) => url,
        }
    }

    pub fn is_proxied(&self) -> bool {
        matches!(self, Self::Proxied(_))
    }
}

impl fmt::Display for PlaybackUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide how a media reference is played.  Plain `http://` sources are
/// never played directly, they go through `{api}/proxy?url=...` with the
/// original escaped as the parameter.  Anything else is used unchanged.
pub fn resolve_playback_url(root: &ApiRoot, reference: &str) -> Result<PlaybackUrl, Error> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(Error::Validation("media reference"));
    }
    let is_insecure = reference
        .get(..INSECURE_SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(INSECURE_SCHEME));
    if is_insecure {
        let mut proxy = root.endpoint("proxy")?;
        proxy.query_pairs_mut().append_pair("url", reference);
        Ok(PlaybackUrl::Proxied(proxy.into()))
    } else {
        Ok(PlaybackUrl::Direct(reference.to_string()))
    }
}
