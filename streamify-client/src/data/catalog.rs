use std::sync::Arc;

use itertools::Itertools;
use streamify_core::webapi::{CatalogItem, ContentBuckets};

/// Buckets with a fixed place and title, in display order.
const KNOWN_SHELVES: &[(&str, &str)] = &[
    ("lancamentos", "New releases"),
    ("em_alta", "Trending"),
    ("para_voce", "For you"),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Shelf {
    pub key: String,
    pub title: String,
    pub items: Vec<Arc<CatalogItem>>,
}

/// Catalog of one successful fetch.  Replaced wholesale, never patched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    /// Merged featured bucket, the sequence the hero rotator cycles over.
    pub featured: Vec<Arc<CatalogItem>>,
    pub shelves: Vec<Shelf>,
}

impl Catalog {
    /// Partition a `/content` response.  The flag is false when
    /// `featured_key` is not among the buckets.
    pub fn from_buckets(content: ContentBuckets, featured_key: &str) -> (Self, bool) {
        let found = content.buckets.contains_key(featured_key);
        let mut featured = Vec::new();
        let shelves = content
            .buckets
            .into_iter()
            .sorted_by_key(|(key, _)| shelf_rank(key))
            .map(|(key, bucket)| {
                let items: Vec<_> = bucket.merged().into_iter().map(Arc::new).collect();
                if key == featured_key {
                    featured = items.clone();
                }
                Shelf {
                    title: shelf_title(&key),
                    key,
                    items,
                }
            })
            .collect();
        (Self { featured, shelves }, found)
    }

    pub fn is_empty(&self) -> bool {
        self.featured.is_empty() && self.shelves.iter().all(|shelf| shelf.items.is_empty())
    }

    pub fn get(&self, item: ItemRef) -> Option<&Arc<CatalogItem>> {
        match item {
            ItemRef::Featured(index) => self.featured.get(index),
            ItemRef::Shelf { shelf, index } => self.shelves.get(shelf)?.items.get(index),
        }
    }
}

/// Position of an item in the loaded catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemRef {
    Featured(usize),
    Shelf { shelf: usize, index: usize },
}

fn shelf_rank(key: &str) -> (usize, String) {
    let rank = KNOWN_SHELVES
        .iter()
        .position(|(known, _)| *known == key)
        .unwrap_or(KNOWN_SHELVES.len());
    (rank, key.to_string())
}

fn shelf_title(key: &str) -> String {
    KNOWN_SHELVES
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, title)| title.to_string())
        .unwrap_or_else(|| key.replace('_', " "))
}
