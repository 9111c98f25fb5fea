use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Backend identifiers arrive either as numbers or as strings, and have to be
/// sent back in the same form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

impl Registration {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPayload,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserPayload {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "url_avatar", default)]
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Id,
    #[serde(rename = "nome", alias = "title")]
    pub name: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(rename = "descricao", alias = "description", default)]
    pub synopsis: Option<String>,
    #[serde(rename = "url", default)]
    pub media: String,
    #[serde(rename = "categoria", alias = "category", default)]
    pub category: Option<String>,
}

/// One category bucket of the `/content` response.
#[derive(Clone, Debug, Default)]
pub struct Bucket {
    pub movies: Vec<CatalogItem>,
    pub series: Vec<CatalogItem>,
}

/// Wire form of a bucket.  An object with neither list is not a bucket.
#[derive(Deserialize)]
struct RawBucket {
    #[serde(rename = "filmes", alias = "movies")]
    movies: Option<Vec<CatalogItem>>,
    series: Option<Vec<CatalogItem>>,
}

impl RawBucket {
    fn into_bucket(self) -> Option<Bucket> {
        if self.movies.is_none() && self.series.is_none() {
            return None;
        }
        Some(Bucket {
            movies: self.movies.unwrap_or_default(),
            series: self.series.unwrap_or_default(),
        })
    }
}

impl Bucket {
    /// Movies first, then series, each in backend order.
    pub fn merged(self) -> Vec<CatalogItem> {
        let mut items = self.movies;
        items.extend(self.series);
        items
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Category buckets keyed by their backend name, e.g. `lancamentos`.
#[derive(Clone, Debug, Default)]
pub struct ContentBuckets {
    pub buckets: BTreeMap<String, Bucket>,
}

impl ContentBuckets {
    /// Decode the nested `/content` body.  Entries that are not buckets are
    /// skipped instead of failing the whole catalog.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let value = match value {
            serde_json::Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        };
        let entries: BTreeMap<String, serde_json::Value> = serde_json::from_value(value)?;
        let mut buckets = BTreeMap::new();
        for (key, entry) in entries {
            match serde_json::from_value::<RawBucket>(entry).map(RawBucket::into_bucket) {
                Ok(Some(bucket)) => {
                    buckets.insert(key, bucket);
                }
                Ok(None) => {
                    log::debug!("skipping content entry {:?} without lists", key);
                }
                Err(err) => {
                    log::debug!("skipping content entry {:?}: {}", key, err);
                }
            }
        }
        Ok(Self { buckets })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Id,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "url_avatar", alias = "avatar", default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "pin_text", skip_serializing)]
    pub pin: Option<String>,
}

/// PINs come as strings or as bare numbers.
fn pin_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Id>::deserialize(deserializer)?.map(|pin| pin.to_string()))
}

impl Profile {
    pub fn is_protected(&self) -> bool {
        matches!(&self.pin, Some(pin) if !pin.trim().is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AvatarSets {
    #[serde(default)]
    pub perfil: Vec<String>,
    #[serde(default)]
    pub perfix: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum AvatarEnvelope {
    Wrapped { data: AvatarSets },
    Bare(AvatarSets),
}

impl From<AvatarEnvelope> for AvatarSets {
    fn from(envelope: AvatarEnvelope) -> Self {
        match envelope {
            AvatarEnvelope::Wrapped { data } | AvatarEnvelope::Bare(data) => data,
        }
    }
}

/// Payload of `PUT /auth/profile`, holding only changed fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AccountUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "url_avatar", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(rename = "senha", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.avatar.is_none()
            && self.password.is_none()
    }
}

#[derive(Deserialize)]
pub(crate) struct SynopsisResponse {
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct PinCheck {
    #[serde(alias = "valido", default)]
    pub valid: bool,
}

#[derive(Serialize)]
pub(crate) struct ContentRef<'a> {
    pub conteudo_id: &'a Id,
}

#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
