use std::collections::HashMap;

use image::{imageops, RgbaImage};
use log::debug;

use crate::edit::PastedRegion;

/// One cached rasterization: the snapshot scaled to the size the region is
/// currently drawn at.
struct CachedScale {
    width: u32,
    height: u32,
    image: RgbaImage,
}

/// Memoizes the scaled pixel buffer for each pasted region so a full
/// re-render does not rescale every snapshot again. Keyed by region id and
/// invalidated when the drawn size changes; a derived cache, never a second
/// owner of the pixels.
#[derive(Default)]
pub struct RegionCache {
    cache: HashMap<u64, CachedScale>,
}

impl RegionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The region's snapshot scaled to its current drawn size, rescaling
    /// only on a miss or a stale entry.
    pub fn get_scaled(&mut self, region: &PastedRegion) -> &RgbaImage {
        let width = (region.width().round() as u32).max(1);
        let height = (region.height().round() as u32).max(1);

        let stale = self
            .cache
            .get(&region.id())
            .map_or(true, |entry| entry.width != width || entry.height != height);

        if stale {
            debug!("region cache: rescaling region {} to {width}x{height}", region.id());
            let image = if region.pixels().width() == width && region.pixels().height() == height {
                region.pixels().clone()
            } else {
                imageops::resize(region.pixels(), width, height, imageops::FilterType::Triangle)
            };
            self.cache.insert(region.id(), CachedScale { width, height, image });
        }

        &self.cache[&region.id()].image
    }

    /// Drop the entry for a single region (its drawn size changed).
    pub fn invalidate(&mut self, id: u64) {
        self.cache.remove(&id);
    }

    /// Drop entries for regions no longer present in the log.
    pub fn retain_ids(&mut self, live: impl Fn(u64) -> bool) {
        self.cache.retain(|id, _| live(*id));
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
