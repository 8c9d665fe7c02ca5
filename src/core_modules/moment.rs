// THEORY:
// The `moment` module holds the shape math that turns a traced border into
// numbers the selectors can compare: area moments and the minimal enclosing
// circle.
//
// Key principles:
// 1.  **Border Moments**: moments are computed from the border polygon with
//     Green's theorem rather than by summing pixels. The zeroth moment is the
//     signed polygon area; the first moments give the centroid. Winding order is
//     normalized so the area is never negative.
// 2.  **Fallible Centroid**: a polygon with no enclosed area (a single point, a
//     straight run of pixels) has no centroid. `Moments::centroid` returns `None`
//     for it; there is no division by zero anywhere.
// 3.  **Enclosing Circle**: the size gates use the radius of the smallest circle
//     containing every border point. It is computed on the convex hull, which
//     holds the same extreme points and is much shorter than the border.

use imageproc::geometry::convex_hull;
use imageproc::point::Point;

/// Zeroth moments below this are treated as an empty polygon.
const DEGENERATE_AREA: f64 = 1e-9;
/// Slack for floating point noise when testing circle containment.
const CONTAINMENT_EPSILON: f64 = 1e-7;

/// Zeroth and first order area moments of a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

/// Integer pixel position of a region's center of mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
}

impl Moments {
    /// Moments of the polygon through `points`, closed back to the first point.
    pub fn of_contour(points: &[Point<i32>]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }

        let mut a00 = 0.0;
        let mut a10 = 0.0;
        let mut a01 = 0.0;
        for (i, current) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            let (xi, yi) = (f64::from(current.x), f64::from(current.y));
            let (xj, yj) = (f64::from(next.x), f64::from(next.y));
            let cross = xi * yj - xj * yi;
            a00 += cross;
            a10 += cross * (xi + xj);
            a01 += cross * (yi + yj);
        }

        let mut moments = Self {
            m00: a00 / 2.0,
            m10: a10 / 6.0,
            m01: a01 / 6.0,
        };
        if moments.m00 < 0.0 {
            moments.m00 = -moments.m00;
            moments.m10 = -moments.m10;
            moments.m01 = -moments.m01;
        }
        moments
    }

    /// Enclosed polygon area in square pixels.
    pub fn area(&self) -> f64 {
        self.m00
    }

    pub fn is_degenerate(&self) -> bool {
        self.m00.abs() <= DEGENERATE_AREA
    }

    /// Center of mass truncated toward zero, or `None` for an empty polygon.
    pub fn centroid(&self) -> Option<Centroid> {
        if self.is_degenerate() {
            return None;
        }
        Some(Centroid {
            x: (self.m10 / self.m00) as i32,
            y: (self.m01 / self.m00) as i32,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
}

impl Circle {
    fn from_point(p: (f64, f64)) -> Self {
        Self {
            center: p,
            radius: 0.0,
        }
    }

    fn from_diameter(a: (f64, f64), b: (f64, f64)) -> Self {
        let center = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        Self {
            center,
            radius: distance(center, a).max(distance(center, b)),
        }
    }

    fn through(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let (bx, by) = (b.0 - a.0, b.1 - a.1);
        let (cx, cy) = (c.0 - a.0, c.1 - a.1);
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() <= f64::EPSILON {
            // Collinear: the widest pair spans all three.
            let candidates = [Self::from_diameter(a, b), Self::from_diameter(a, c), Self::from_diameter(b, c)];
            return candidates
                .into_iter()
                .fold(Self::from_point(a), |best, next| if next.radius > best.radius { next } else { best });
        }
        let b_sq = bx * bx + by * by;
        let c_sq = cx * cx + cy * cy;
        let ux = (cy * b_sq - by * c_sq) / d;
        let uy = (bx * c_sq - cx * b_sq) / d;
        let center = (a.0 + ux, a.1 + uy);
        Self {
            center,
            radius: distance(center, a).max(distance(center, b)).max(distance(center, c)),
        }
    }

    pub fn contains(&self, p: (f64, f64)) -> bool {
        distance(self.center, p) <= self.radius + CONTAINMENT_EPSILON
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Smallest circle containing every point, or `None` for an empty slice.
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Option<Circle> {
    if points.is_empty() {
        return None;
    }
    let hull = convex_hull(points);
    let source = if hull.is_empty() { points } else { &hull[..] };
    let pts: Vec<(f64, f64)> = source
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();

    // Incremental Welzl: every point that falls outside the current circle
    // must lie on the boundary of the circle for the prefix ending at it.
    let mut circle = Circle::from_point(pts[0]);
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::from_point(pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_diameter(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::through(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    Some(circle)
}
