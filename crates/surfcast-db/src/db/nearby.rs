//! Distance-ordered beach feed built from fixed-size catalog pages.

use surfcast_core::models::NearbyBeach;
use surfcast_core::{AppError, Coordinates};

use super::beach::BeachStore;

/// Accumulates catalog pages and keeps them sorted by distance from `origin`.
///
/// Loading stops once a page comes back empty or shorter than `page_size`.
#[derive(Debug, Clone)]
pub struct NearbyBeaches {
    origin: Coordinates,
    page_size: u32,
    offset: i64,
    has_more: bool,
    beaches: Vec<NearbyBeach>,
}

impl NearbyBeaches {
    pub fn new(origin: Coordinates, page_size: u32) -> Self {
        Self {
            origin,
            page_size: page_size.max(1),
            offset: 0,
            has_more: true,
            beaches: Vec::new(),
        }
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn beaches(&self) -> &[NearbyBeach] {
        &self.beaches
    }

    /// Fetch the next page and merge it into the sorted list.
    ///
    /// Returns how many beaches were added. A no-op once the catalog is exhausted.
    pub async fn load_next(&mut self, store: &dyn BeachStore) -> Result<usize, AppError> {
        if !self.has_more {
            return Ok(0);
        }

        let page = store
            .list_page(self.offset, i64::from(self.page_size))
            .await?;

        if page.len() < self.page_size as usize {
            self.has_more = false;
        }
        self.offset += page.len() as i64;

        let before = self.beaches.len();
        for beach in page {
            if self.beaches.iter().any(|b| b.beach.id == beach.id) {
                continue;
            }
            self.beaches.push(NearbyBeach::from_origin(beach, &self.origin));
        }
        self.beaches
            .sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        let added = self.beaches.len() - before;
        tracing::debug!(
            added,
            total = self.beaches.len(),
            has_more = self.has_more,
            "Loaded beach page"
        );

        Ok(added)
    }

    /// Drop everything loaded so far and start again from the first page.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.has_more = true;
        self.beaches.clear();
    }
}
