use std::sync::Arc;

use streamify_core::{util::non_blank, webapi::CatalogItem};

use crate::data::{Promise, RequestId};

/// Synopsis values the backend uses for "nothing written yet".
const PLACEHOLDER_SYNOPSES: &[&str] = &["Descrição do conteúdo (mockup)", "N/A", "null"];

/// Open detail view of one catalog item.
#[derive(Clone, Debug)]
pub struct DetailView {
    pub item: Arc<CatalogItem>,
    pub synopsis: Promise<Arc<str>, RequestId>,
    pub favorited: bool,
}

impl DetailView {
    pub fn new(item: Arc<CatalogItem>) -> Self {
        let synopsis = match local_synopsis(&item) {
            Some(text) => Promise::Resolved(text.into()),
            None => Promise::Empty,
        };
        Self {
            item,
            synopsis,
            favorited: false,
        }
    }

    /// Whether a remote lookup is still needed.
    pub fn needs_lookup(&self) -> bool {
        matches!(self.synopsis, Promise::Empty)
    }

    /// Text to display.  While the lookup is pending, and after it failed,
    /// this is the item name.
    pub fn description(&self) -> &str {
        match &self.synopsis {
            Promise::Resolved(text) => text,
            _ => &self.item.name,
        }
    }

    /// Take the result of lookup `key`.  Empty results and failures fall back
    /// to the item name.  Returns false for a stale key.
    pub fn resolve_synopsis(&mut self, key: RequestId, text: Option<String>) -> bool {
        let text: Arc<str> = text
            .as_deref()
            .and_then(usable_synopsis)
            .unwrap_or(self.item.name.as_str())
            .into();
        self.synopsis.update((key, Ok(text)))
    }
}

/// The item's own synopsis, unless it is blank or a placeholder.
pub fn local_synopsis(item: &CatalogItem) -> Option<&str> {
    item.synopsis.as_deref().and_then(usable_synopsis)
}

fn usable_synopsis(text: &str) -> Option<&str> {
    non_blank(Some(text)).filter(|text| {
        !PLACEHOLDER_SYNOPSES
            .iter()
            .any(|placeholder| placeholder.eq_ignore_ascii_case(text))
    })
}
