// THEORY:
// The `region` module is the spatial grouping layer of the marker engine. It
// takes a refined mask and produces every traced border in it, outer borders
// and hole borders alike, together with their containment tree.
//
// Key architectural principles:
// 1.  **Full Hierarchy**: a nose marker is a different color than its body, so
//     in the body's mask it appears as a hole. Only a full tree of borders
//     (outer -> hole -> island -> ...) lets the selectors ask "which regions are
//     directly inside this one".
// 2.  **Arena With Handles**: regions live in one `Vec` and refer to each other
//     through `RegionId` handles. Parent lookup is O(1), and each region also
//     lists its direct children so the orientation selector never scans the
//     whole arena.
// 3.  **Stateless Data Container**: a `RegionTree` describes one mask from one
//     frame. Handles are meaningless outside the tree that issued them and
//     nothing persists across frames.

use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::core_modules::moment::{min_enclosing_circle, Circle, Moments};
use crate::core_modules::segmenter::Mask;

/// Handle of a region inside the `RegionTree` that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(usize);

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a border wraps foreground (outer) or background (hole).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

impl From<BorderType> for BorderKind {
    fn from(border: BorderType) -> Self {
        match border {
            BorderType::Outer => BorderKind::Outer,
            BorderType::Hole => BorderKind::Hole,
        }
    }
}

/// One traced border and its place in the containment tree.
#[derive(Debug, Clone)]
pub struct Region {
    /// Handle of this region in its tree.
    pub id: RegionId,
    pub kind: BorderKind,
    /// Border pixels in tracing order, forming a closed polygon.
    pub points: Vec<Point<i32>>,
    /// The region directly enclosing this one, `None` at the top level.
    pub parent: Option<RegionId>,
    /// Regions whose parent is this one, in tracing order.
    pub children: Vec<RegionId>,
}

impl Region {
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    pub fn moments(&self) -> Moments {
        Moments::of_contour(&self.points)
    }

    /// Polygon area enclosed by the border.
    pub fn area(&self) -> f64 {
        self.moments().area()
    }

    pub fn enclosing_circle(&self) -> Option<Circle> {
        min_enclosing_circle(&self.points)
    }
}

/// All borders traced from one mask.
#[derive(Debug, Clone, Default)]
pub struct RegionTree {
    regions: Vec<Region>,
}

impl RegionTree {
    /// Traces every border in `mask`. An empty mask gives an empty tree.
    pub fn extract(mask: &Mask) -> Self {
        let contours = find_contours::<i32>(mask);
        let mut regions: Vec<Region> = contours
            .into_iter()
            .enumerate()
            .map(|(index, contour)| Region {
                id: RegionId(index),
                kind: contour.border_type.into(),
                points: contour.points,
                parent: contour.parent.map(RegionId),
                children: Vec::new(),
            })
            .collect();

        let links: Vec<(usize, RegionId)> = regions
            .iter()
            .filter_map(|r| r.parent.map(|p| (p.index(), r.id)))
            .collect();
        for (parent, child) in links {
            if let Some(region) = regions.get_mut(parent) {
                region.children.push(child);
            }
        }

        Self { regions }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.index())
    }

    /// Regions with no parent, in tracing order.
    pub fn roots(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.is_top_level())
    }

    /// Direct children of `id`. Grandchildren are not included.
    pub fn children(&self, id: RegionId) -> impl Iterator<Item = &Region> {
        self.get(id)
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|child| self.get(*child))
    }

    pub fn parent(&self, id: RegionId) -> Option<&Region> {
        self.get(id).and_then(|r| r.parent).and_then(|p| self.get(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::segmenter::FOREGROUND;
    use image::{GrayImage, Luma};

    fn fill(mask: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, value: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                mask.put_pixel(x, y, Luma([value]));
            }
        }
    }

    #[test]
    fn empty_mask_has_no_regions() {
        let tree = RegionTree::extract(&GrayImage::new(16, 16));
        assert!(tree.is_empty());
        assert_eq!(tree.roots().count(), 0);
    }

    #[test]
    fn nested_square_builds_three_levels() {
        // Body with a hole, and an island inside the hole.
        let mut mask = GrayImage::new(60, 60);
        fill(&mut mask, 5, 5, 55, 55, FOREGROUND);
        fill(&mut mask, 15, 15, 45, 45, 0);
        fill(&mut mask, 25, 25, 35, 35, FOREGROUND);

        let tree = RegionTree::extract(&mask);
        assert_eq!(tree.len(), 3);

        let roots: Vec<&Region> = tree.roots().collect();
        assert_eq!(roots.len(), 1);
        let body = roots[0];
        assert_eq!(body.kind, BorderKind::Outer);

        let holes: Vec<&Region> = tree.children(body.id).collect();
        assert_eq!(holes.len(), 1);
        assert_eq!(holes[0].kind, BorderKind::Hole);
        assert_eq!(tree.parent(holes[0].id).map(|r| r.id), Some(body.id));

        let islands: Vec<&Region> = tree.children(holes[0].id).collect();
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].kind, BorderKind::Outer);
        assert_eq!(islands[0].parent, Some(holes[0].id));
        assert!(islands[0].children.is_empty());
    }

    #[test]
    fn disjoint_blobs_are_separate_roots() {
        let mut mask = GrayImage::new(50, 20);
        fill(&mut mask, 2, 2, 12, 12, FOREGROUND);
        fill(&mut mask, 30, 2, 46, 18, FOREGROUND);

        let tree = RegionTree::extract(&mask);
        assert_eq!(tree.roots().count(), 2);
        let largest = tree
            .roots()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .unwrap();
        assert!(largest.points.iter().all(|p| p.x >= 30));
    }

    #[test]
    fn square_area_and_circle() {
        let mut mask = GrayImage::new(30, 30);
        fill(&mut mask, 5, 5, 16, 16, FOREGROUND);
        let tree = RegionTree::extract(&mask);
        let region = tree.roots().next().unwrap();
        // Border runs through pixel centers 5..=15, a 10x10 polygon.
        assert!((region.area() - 100.0).abs() < 1e-9);
        let circle = region.enclosing_circle().unwrap();
        assert!((circle.radius - 50f64.sqrt()).abs() < 1e-6);
        assert_eq!(region.moments().centroid().map(|c| (c.x, c.y)), Some((10, 10)));
    }

    #[test]
    fn unknown_handle_yields_nothing() {
        let tree = RegionTree::default();
        assert!(tree.get(RegionId(3)).is_none());
        assert_eq!(tree.children(RegionId(3)).count(), 0);
        assert!(tree.parent(RegionId(0)).is_none());
    }
}
