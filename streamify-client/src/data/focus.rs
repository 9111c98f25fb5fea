use std::{mem, sync::Arc};

use streamify_core::{player::PlaybackSession, webapi::CatalogItem};

use crate::data::DetailView;

/// What the browse surface is focused on.  Detail and player are never open
/// at the same time.
#[derive(Default)]
pub enum Focus {
    #[default]
    None,
    Detail(DetailView),
    Player(PlaybackSession),
}

impl Focus {
    pub fn detail(&self) -> Option<&DetailView> {
        match self {
            Self::Detail(view) => Some(view),
            _ => None,
        }
    }

    pub fn detail_mut(&mut self) -> Option<&mut DetailView> {
        match self {
            Self::Detail(view) => Some(view),
            _ => None,
        }
    }

    pub fn player(&self) -> Option<&PlaybackSession> {
        match self {
            Self::Player(session) => Some(session),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlaybackSession> {
        match self {
            Self::Player(session) => Some(session),
            _ => None,
        }
    }

    pub fn item(&self) -> Option<&Arc<CatalogItem>> {
        match self {
            Self::None => None,
            Self::Detail(view) => Some(&view.item),
            Self::Player(session) => Some(session.item()),
        }
    }

    /// Replace the focus, tearing down an open player first.
    pub fn replace(&mut self, focus: Focus) -> Focus {
        if let Self::Player(session) = self {
            session.close();
        }
        mem::replace(self, focus)
    }

    pub fn clear(&mut self) {
        self.replace(Focus::None);
    }
}
