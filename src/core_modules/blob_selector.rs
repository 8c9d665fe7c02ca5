// THEORY:
// The `blob_selector` decides which traced regions stand for a marker. It is the
// geometric heart of the engine and applies two rules:
//
// 1.  **Body**: among top-level regions only, the one with the largest enclosed
//     area is the body candidate. Ties go to the first region traced. A body
//     whose minimal enclosing circle is not larger than the configured radius is
//     discarded; a smaller top-level region is never tried in its place.
// 2.  **Orientation**: among the *direct* children of the body (its holes), the
//     one with the largest area is the nose. It too must clear its own radius
//     gate. Siblings of the body and anything nested deeper are ignored, which
//     is what makes "nose inside body" a reliable signal when several blobs of
//     the same color overlap.
//
// Like the rest of the spatial layer, selection is a stateless utility: it
// reads one `RegionTree` and keeps nothing.

use crate::core_modules::moment::{Circle, Moments};
use crate::core_modules::region::{Region, RegionId, RegionTree};

pub mod blob_selector {
    use super::*;

    /// A region that won a selection, with the shape data computed for it.
    #[derive(Debug, Clone)]
    pub struct Candidate<'a> {
        pub region: &'a Region,
        pub moments: Moments,
        pub circle: Circle,
    }

    /// Result of body selection.
    #[derive(Debug, Clone)]
    pub enum BodySelection<'a> {
        /// The tree has no top-level region.
        Missing,
        /// The largest top-level region failed the radius gate.
        TooSmall { radius: f64 },
        Found(Candidate<'a>),
    }

    /// Result of orientation selection.
    #[derive(Debug, Clone)]
    pub enum OrientationSelection<'a> {
        /// The body has no direct children.
        Missing,
        /// The largest direct child failed the radius gate.
        TooSmall { radius: f64 },
        Found(Candidate<'a>),
    }

    /// Largest-area region from `regions`; first one wins a tie.
    pub fn largest<'a>(regions: impl Iterator<Item = &'a Region>) -> Option<(&'a Region, Moments)> {
        let mut best: Option<(&Region, Moments)> = None;
        for region in regions {
            let moments = region.moments();
            let replace = match &best {
                Some((_, current)) => moments.area() > current.area(),
                None => true,
            };
            if replace {
                best = Some((region, moments));
            }
        }
        best
    }

    fn gate(region: &Region, moments: Moments, min_radius: f64) -> Result<Candidate<'_>, f64> {
        let circle = region.enclosing_circle().unwrap_or(Circle {
            center: (0.0, 0.0),
            radius: 0.0,
        });
        if circle.radius > min_radius {
            Ok(Candidate {
                region,
                moments,
                circle,
            })
        } else {
            Err(circle.radius)
        }
    }

    /// Picks the body: largest top-level region, radius strictly above `min_radius`.
    pub fn select_body(tree: &RegionTree, min_radius: f64) -> BodySelection<'_> {
        let Some((region, moments)) = largest(tree.roots()) else {
            return BodySelection::Missing;
        };
        match gate(region, moments, min_radius) {
            Ok(candidate) => BodySelection::Found(candidate),
            Err(radius) => BodySelection::TooSmall { radius },
        }
    }

    /// Picks the nose: largest direct child of `body`, radius strictly above `min_radius`.
    pub fn select_orientation(tree: &RegionTree, body: RegionId, min_radius: f64) -> OrientationSelection<'_> {
        let Some((region, moments)) = largest(tree.children(body)) else {
            return OrientationSelection::Missing;
        };
        match gate(region, moments, min_radius) {
            Ok(candidate) => OrientationSelection::Found(candidate),
            Err(radius) => OrientationSelection::TooSmall { radius },
        }
    }
}
