// THEORY:
// Heading is the planar angle of the vector from the nose centroid to the body
// centroid, `atan2(body.y - nose.y, body.x - nose.x)`. Coordinates are image
// coordinates, so y grows downward: a positive heading turns clockwise on
// screen. No calibration or world-frame flip is applied here.

use std::f64::consts::PI;

use crate::core_modules::moment::Centroid;

/// Signed heading in radians, in `(-PI, PI]`.
pub fn heading(body: Centroid, orientation: Centroid) -> f64 {
    let dy = f64::from(body.y) - f64::from(orientation.y);
    let dx = f64::from(body.x) - f64::from(orientation.x);
    let angle = dy.atan2(dx);
    // atan2 only reaches -PI for a negative-zero dy; fold it onto PI.
    if angle <= -PI { PI } else { angle }
}
