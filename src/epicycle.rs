use serde::Serialize;
use std::f32::consts::PI;

/// Base radius unit used by the scale denominator
pub const RADIUS_UNIT: f32 = 35.0;

/// First frame recorded into the trace
pub const RECORD_START: u64 = 1;
/// Last frame recorded into the trace (inclusive)
pub const RECORD_END: u64 = RECORD_START + 720;

/// One rotating circle in the chain
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Circle {
    /// Frequency multiplier (negative = counter-rotation)
    pub freq: f32,
    /// Phase offset in radians
    pub phase: f32,
    /// Base radius, in unscaled units
    pub radius: f32,
}

impl Circle {
    pub const fn new(freq: f32, phase: f32, radius: f32) -> Self {
        Self {
            freq,
            phase,
            radius,
        }
    }
}

/// A 2D point in unscaled figure coordinates
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
}

/// Named circle sets the user can pick from
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub circles: &'static [Circle],
}

impl Preset {
    pub const PRESETS: [Preset; 3] = [
        Preset {
            name: "Classic",
            circles: &[
                Circle::new(3.0, 0.0, RADIUS_UNIT),
                Circle::new(-4.0, 0.0, 7.0),
                Circle::new(10.0, 0.0, 4.0),
            ],
        },
        Preset {
            name: "Trefoil",
            circles: &[
                Circle::new(1.0, 0.0, RADIUS_UNIT),
                Circle::new(-2.0, 0.0, 14.0),
            ],
        },
        Preset {
            name: "Star",
            circles: &[
                Circle::new(2.0, 0.0, RADIUS_UNIT),
                Circle::new(-3.0, 0.0, 12.0),
                Circle::new(7.0, 0.0, 5.0),
            ],
        },
    ];
}

/// Animation angle for a given frame count
pub fn angle_at(frame: u64) -> f32 {
    frame as f32 * PI / 360.0
}

/// Positions of every joint in the chain, scaled. Index 0 is the origin,
/// index i is the tip of circle i-1; the last entry is the chain endpoint.
pub fn chain_joints(circles: &[Circle], t: f32, scale: f32) -> Vec<Point> {
    let mut joints = Vec::with_capacity(circles.len() + 1);
    let mut p = Point::ZERO;
    joints.push(p);

    for c in circles {
        let angle = (c.phase + t) * c.freq;
        let r = c.radius * scale;
        // Screen coordinates: y grows downward, so the "up" direction is -cos
        p.x += angle.sin() * r;
        p.y -= angle.cos() * r;
        joints.push(p);
    }

    joints
}

/// Chain endpoint in unscaled coordinates, as stored in the trace
pub fn tip_unscaled(circles: &[Circle], t: f32) -> Point {
    *chain_joints(circles, t, 1.0)
        .last()
        .unwrap_or(&Point::ZERO)
}

/// Scale factor fitting the full chain extent into the canvas
pub fn scale_factor(width: f32, height: f32, circle_count: usize) -> f32 {
    width.min(height) / (circle_count as f32 * RADIUS_UNIT)
}

/// Whether a frame falls inside the fixed recording window
pub fn in_record_window(frame: u64) -> bool {
    (RECORD_START..=RECORD_END).contains(&frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_tip_at_rest() {
        // At t = 0 every angle is 0, so each circle points straight up
        let circles = Preset::PRESETS[0].circles;
        let tip = tip_unscaled(circles, 0.0);
        assert!(tip.x.abs() < EPS);
        assert!((tip.y - -(35.0 + 7.0 + 4.0)).abs() < EPS);
    }

    #[test]
    fn test_tip_matches_closed_form() {
        let circles = [Circle::new(1.0, 0.0, 10.0), Circle::new(2.0, 0.0, 5.0)];
        // t = pi/2: first circle at angle pi/2 -> (10, 0),
        // second at angle pi -> (0, +5)
        let tip = tip_unscaled(&circles, PI / 2.0);
        assert!((tip.x - 10.0).abs() < EPS);
        assert!((tip.y - 5.0).abs() < EPS);
    }

    #[test]
    fn test_phase_offset_shifts_angle() {
        let shifted = [Circle::new(2.0, 0.25, 10.0)];
        let unshifted = [Circle::new(2.0, 0.0, 10.0)];
        let a = tip_unscaled(&shifted, 0.5);
        let b = tip_unscaled(&unshifted, 0.75);
        assert!((a.x - b.x).abs() < EPS);
        assert!((a.y - b.y).abs() < EPS);
    }

    #[test]
    fn test_joints_scale_linearly() {
        let circles = Preset::PRESETS[0].circles;
        let t = angle_at(137);
        let unit = chain_joints(circles, t, 1.0);
        let scaled = chain_joints(circles, t, 3.0);
        assert_eq!(unit.len(), circles.len() + 1);
        for (u, s) in unit.iter().zip(&scaled) {
            assert!((u.x * 3.0 - s.x).abs() < EPS);
            assert!((u.y * 3.0 - s.y).abs() < EPS);
        }
    }

    #[test]
    fn test_scale_factor_uses_min_dimension() {
        let s = scale_factor(1050.0, 700.0, 3);
        assert!((s - 700.0 / 105.0).abs() < EPS);
        let s = scale_factor(700.0, 1050.0, 3);
        assert!((s - 700.0 / 105.0).abs() < EPS);
    }

    #[test]
    fn test_record_window_bounds() {
        assert!(!in_record_window(0));
        assert!(in_record_window(RECORD_START));
        assert!(in_record_window(360));
        assert!(in_record_window(RECORD_END));
        assert!(!in_record_window(RECORD_END + 1));
    }

    #[test]
    fn test_angle_advances_half_degree_per_frame() {
        // 720 frames = one full turn of the base angle
        assert!((angle_at(720) - 2.0 * PI).abs() < EPS);
    }
}
