use std::sync::Arc;

use streamify_core::{error::Error, webapi::ContentBuckets};

use crate::{
    cmd::Event,
    data::{Catalog, RequestId},
    delegate::Delegate,
};

impl Delegate {
    pub(crate) fn load_catalog(&mut self) {
        let Some(token) = self.token() else {
            return;
        };
        let key = self.state.next_request();
        self.state.catalog.pending = Some(key);
        self.spawn(move |backend| Event::CatalogLoaded {
            key,
            result: backend.content(&token),
        });
    }

    /// Replace the catalog wholesale on success.  Failures keep whatever was
    /// loaded before.
    pub(crate) fn catalog_loaded(&mut self, key: RequestId, result: Result<ContentBuckets, Error>) {
        if self.state.catalog.pending != Some(key) {
            log::info!("discarding stale catalog {}", key);
            return;
        }
        self.state.catalog.pending = None;
        let content = match result {
            Ok(content) => content,
            Err(err) => {
                log::error!("failed to load catalog: {}", err);
                self.state.error_alert(&err);
                return;
            }
        };
        let featured_key = &self.config.featured_bucket;
        let (catalog, found) = Catalog::from_buckets(content, featured_key);
        if !found {
            log::warn!("catalog has no {:?} bucket", featured_key);
            self.state.info_alert("No new releases are available right now.");
        }
        log::info!(
            "loaded catalog: {} featured, {} shelves",
            catalog.featured.len(),
            catalog.shelves.len()
        );
        self.state.catalog.catalog = Arc::new(catalog);
        self.restart_hero();
    }
}
