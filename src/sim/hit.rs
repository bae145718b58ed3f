//! Pointer hit testing
//!
//! Pointers are normalized against the rendered image box, not its container:
//! with `object-fit: contain` the image is letterboxed and the container's box
//! does not match the level's coordinate space.

use std::collections::HashSet;

use glam::Vec2;

use crate::level::Item;

/// Rendered box of the background image, in container pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    /// Offset of the image box inside its container
    pub origin: Vec2,
    /// Rendered image size
    pub size: Vec2,
}

impl SurfaceMetrics {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Surface filling its container exactly
    pub fn fill(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    /// Box of an image with intrinsic size `image` scaled to fit `container`
    /// (CSS `object-fit: contain`, centered).
    ///
    /// An image with no intrinsic size yet (still decoding) yields an empty
    /// surface, so no pointer lands on it.
    pub fn contain(container: Vec2, image: Vec2) -> Self {
        if !(image.x > 0.0 && image.y > 0.0) {
            return Self::new(container / 2.0, Vec2::ZERO);
        }
        let scale = (container.x / image.x).min(container.y / image.y);
        let size = image * scale;
        Self::new((container - size) / 2.0, size)
    }

    fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Convert a container-space pointer to surface space.
    ///
    /// Returns `None` for points in the letterbox bands.
    pub fn locate(&self, container_point: Vec2) -> Option<Vec2> {
        if self.is_degenerate() {
            return None;
        }
        let local = container_point - self.origin;
        let inside = local.cmpge(Vec2::ZERO).all() && local.cmple(self.size).all();
        inside.then_some(local)
    }

    /// Surface-space point to normalized level space
    #[inline]
    pub fn normalize(&self, surface_point: Vec2) -> Vec2 {
        surface_point / self.size
    }

    /// Normalized level point back to container pixels (feedback placement)
    pub fn to_container(&self, normalized: Vec2) -> Vec2 {
        self.origin + normalized * self.size
    }
}

/// Topmost unfound item under a surface-space pointer, if any.
///
/// Later items occlude earlier ones, so the scan runs back to front.
pub fn hit_test<'a>(
    pointer: Vec2,
    surface: &SurfaceMetrics,
    items: &'a [Item],
    found: &HashSet<String>,
) -> Option<&'a Item> {
    if surface.is_degenerate() {
        return None;
    }
    let point = surface.normalize(pointer);
    items
        .iter()
        .rev()
        .filter(|item| !found.contains(&item.id))
        .find(|item| item.contains(point))
}
