//! Intrinsic sizes of the raster images available to a layout pass.

use dossier_types::geometry::Size;
use std::collections::HashMap;

/// Pixel dimensions of every image that could be loaded, keyed by source.
/// Image nodes whose source is missing here are omitted from the layout.
#[derive(Debug, Clone, Default)]
pub struct ImageMetrics {
    sizes: HashMap<String, Size>,
}

impl ImageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, src: impl Into<String>, width_px: u32, height_px: u32) {
        self.sizes
            .insert(src.into(), Size::new(width_px as f32, height_px as f32));
    }

    pub fn get(&self, src: &str) -> Option<Size> {
        self.sizes.get(src).copied()
    }

    pub fn contains(&self, src: &str) -> bool {
        self.sizes.contains_key(src)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
