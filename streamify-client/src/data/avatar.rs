use std::{fmt, str::FromStr};

use streamify_core::webapi::AvatarSets;

use crate::data::{Promise, RequestId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AvatarCategory {
    Perfil,
    Perfix,
}

impl AvatarCategory {
    pub const ALL: [AvatarCategory; 2] = [AvatarCategory::Perfil, AvatarCategory::Perfix];

    /// Folder the chosen file is stored under, relative to the asset root.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Perfil => "assets/perfil",
            Self::Perfix => "assets/perfilx",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Perfil => 0,
            Self::Perfix => 1,
        }
    }
}

impl fmt::Display for AvatarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Perfil => f.write_str("perfil"),
            Self::Perfix => f.write_str("perfix"),
        }
    }
}

impl FromStr for AvatarCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perfil" => Ok(Self::Perfil),
            "perfix" | "perfilx" => Ok(Self::Perfix),
            _ => Err(()),
        }
    }
}

/// Avatar lists with one rendering window per category.  Pagination never
/// refetches, it only widens the window.
#[derive(Clone, Debug)]
pub struct AvatarPicker {
    pub sets: Promise<AvatarSets, RequestId>,
    shown: [usize; 2],
    page_size: usize,
}

impl AvatarPicker {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            sets: Promise::Empty,
            shown: [page_size; 2],
            page_size,
        }
    }

    pub fn names(&self, category: AvatarCategory) -> &[String] {
        match (self.sets.resolved(), category) {
            (Some(sets), AvatarCategory::Perfil) => sets.perfil.as_slice(),
            (Some(sets), AvatarCategory::Perfix) => sets.perfix.as_slice(),
            (None, _) => &[],
        }
    }

    /// Number of names currently rendered for `category`.
    pub fn cursor(&self, category: AvatarCategory) -> usize {
        self.shown[category.index()].min(self.names(category).len())
    }

    pub fn visible(&self, category: AvatarCategory) -> &[String] {
        &self.names(category)[..self.cursor(category)]
    }

    pub fn has_more(&self, category: AvatarCategory) -> bool {
        self.cursor(category) < self.names(category).len()
    }

    /// Show one more page of `category`.  Returns false, changing nothing,
    /// when everything is already shown.
    pub fn load_more(&mut self, category: AvatarCategory) -> bool {
        if !self.has_more(category) {
            return false;
        }
        let total = self.names(category).len();
        let shown = &mut self.shown[category.index()];
        *shown = (*shown + self.page_size).min(total);
        true
    }

    /// Stored reference for avatar `name` of `category`.  The caller decides
    /// whether to persist it.
    pub fn choose(category: AvatarCategory, name: &str) -> String {
        format!("{}/{}", category.folder(), name.trim_start_matches('/'))
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }
}
