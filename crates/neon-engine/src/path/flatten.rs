use std::iter::FusedIterator;

use crate::coords::Vec2;

use super::{Path, PathCmd};

/// Smallest tolerance accepted by [`flatten`]; smaller or invalid values are raised to it.
pub const MIN_TOLERANCE: f32 = 1e-3;

const MIN_QUAD_STEPS: u32 = 2;
const MIN_CUBIC_STEPS: u32 = 3;

/// Flattens `cmds` into a lazy sequence of points.
///
/// - `MoveTo` / `LineTo` yield their endpoint.
/// - Curves yield `steps` points at `t = i / steps` for `i in 1..=steps`, where
///   `steps = max(2, round(chord / tolerance))` for quadratics and
///   `max(3, round(chord / tolerance))` for cubics. The chord is the distance
///   between the curve's start and end points, so curvature is not taken into
///   account and even a straight curve produces `steps` points.
/// - `Close` yields nothing.
///
/// Commands before the first `MoveTo` start from the origin, which is not
/// itself yielded. All `MoveTo`s land in the same sequence; use
/// [`flatten_path`] to keep subpaths apart.
pub fn flatten(cmds: &[PathCmd], tolerance: f32) -> Flatten<'_> {
    let tolerance = if tolerance.is_finite() {
        tolerance.max(MIN_TOLERANCE)
    } else {
        MIN_TOLERANCE
    };

    Flatten {
        cmds: cmds.iter(),
        tolerance,
        current: Vec2::zero(),
        curve: None,
    }
}

/// Flattens each subpath of `path` into its own polyline.
///
/// Subpaths that yield no points are dropped.
pub fn flatten_path(path: &Path, tolerance: f32) -> Vec<Vec<Vec2>> {
    path.subpaths()
        .map(|sub| flatten(sub, tolerance).collect::<Vec<_>>())
        .filter(|points| !points.is_empty())
        .collect()
}

/// Iterator returned by [`flatten`].
#[derive(Debug, Clone)]
pub struct Flatten<'a> {
    cmds: std::slice::Iter<'a, PathCmd>,
    tolerance: f32,
    current: Vec2,
    curve: Option<CurveSteps>,
}

#[derive(Debug, Copy, Clone)]
enum Curve {
    Quad { p0: Vec2, p1: Vec2, p2: Vec2 },
    Cubic { p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2 },
}

impl Curve {
    fn eval(self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        match self {
            Curve::Quad { p0, p1, p2 } => p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t),
            Curve::Cubic { p0, p1, p2, p3 } => {
                p0 * (mt * mt * mt)
                    + p1 * (3.0 * mt * mt * t)
                    + p2 * (3.0 * mt * t * t)
                    + p3 * (t * t * t)
            }
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct CurveSteps {
    curve: Curve,
    step: u32,
    steps: u32,
}

fn step_count(from: Vec2, to: Vec2, tolerance: f32, min_steps: u32) -> u32 {
    // `as u32` saturates and maps NaN to 0.
    let by_chord = (from.distance(to) / tolerance).round() as u32;
    by_chord.max(min_steps)
}

impl Flatten<'_> {
    fn start_curve(&mut self, curve: Curve, to: Vec2, min_steps: u32) {
        let steps = step_count(self.current, to, self.tolerance, min_steps);
        self.curve = Some(CurveSteps {
            curve,
            step: 0,
            steps,
        });
        self.current = to;
    }
}

impl Iterator for Flatten<'_> {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        loop {
            if let Some(cs) = self.curve.as_mut() {
                cs.step += 1;
                let t = cs.step as f32 / cs.steps as f32;
                let p = cs.curve.eval(t);
                if cs.step >= cs.steps {
                    self.curve = None;
                }
                return Some(p);
            }

            match *self.cmds.next()? {
                PathCmd::MoveTo(p) | PathCmd::LineTo(p) => {
                    self.current = p;
                    return Some(p);
                }
                PathCmd::QuadTo { ctrl, to } => {
                    let curve = Curve::Quad {
                        p0: self.current,
                        p1: ctrl,
                        p2: to,
                    };
                    self.start_curve(curve, to, MIN_QUAD_STEPS);
                }
                PathCmd::CubicTo { ctrl1, ctrl2, to } => {
                    let curve = Curve::Cubic {
                        p0: self.current,
                        p1: ctrl1,
                        p2: ctrl2,
                        p3: to,
                    };
                    self.start_curve(curve, to, MIN_CUBIC_STEPS);
                }
                PathCmd::Close => {}
            }
        }
    }
}

impl FusedIterator for Flatten<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) <= 1e-4
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(flatten(&[], 1.0).count(), 0);
    }

    #[test]
    fn line_yields_exactly_its_endpoints() {
        let cmds = [PathCmd::MoveTo(v(0.0, 0.0)), PathCmd::LineTo(v(100.0, 0.0))];
        for tol in [0.01, 1.0, 500.0] {
            let pts: Vec<_> = flatten(&cmds, tol).collect();
            assert_eq!(pts, vec![v(0.0, 0.0), v(100.0, 0.0)], "tolerance {tol}");
        }
    }

    #[test]
    fn close_adds_no_edge() {
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::LineTo(v(1.0, 0.0)),
            PathCmd::LineTo(v(1.0, 1.0)),
            PathCmd::Close,
        ];
        let pts: Vec<_> = flatten(&cmds, 1.0).collect();
        assert_eq!(pts.len(), 3);
        assert_eq!(*pts.last().unwrap(), v(1.0, 1.0));
    }

    #[test]
    fn quad_step_count_follows_chord() {
        // chord = 10, tolerance = 1 → 10 steps
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::QuadTo { ctrl: v(5.0, 8.0), to: v(10.0, 0.0) },
        ];
        let pts: Vec<_> = flatten(&cmds, 1.0).collect();
        assert_eq!(pts.len(), 1 + 10);
        assert_eq!(pts[10], v(10.0, 0.0));
        // Midpoint of the quad: 0.25*p0 + 0.5*p1 + 0.25*p2.
        assert!(close(pts[5], v(5.0, 4.0)), "got {:?}", pts[5]);
    }

    #[test]
    fn quad_has_minimum_two_steps() {
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::QuadTo { ctrl: v(0.5, 0.5), to: v(1.0, 0.0) },
        ];
        assert_eq!(flatten(&cmds, 100.0).count(), 1 + 2);
    }

    #[test]
    fn cubic_has_minimum_three_steps() {
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::CubicTo { ctrl1: v(0.0, 1.0), ctrl2: v(1.0, 1.0), to: v(1.0, 0.0) },
        ];
        let pts: Vec<_> = flatten(&cmds, 100.0).collect();
        assert_eq!(pts.len(), 1 + 3);
        assert_eq!(pts[3], v(1.0, 0.0));
    }

    #[test]
    fn cubic_points_lie_on_curve() {
        let (p0, p1, p2, p3) = (v(0.0, 0.0), v(0.0, 30.0), v(30.0, 30.0), v(30.0, 0.0));
        let cmds = [
            PathCmd::MoveTo(p0),
            PathCmd::CubicTo { ctrl1: p1, ctrl2: p2, to: p3 },
        ];
        let pts: Vec<_> = flatten(&cmds, 2.0).collect();
        // chord 30 / tol 2 → 15 steps
        assert_eq!(pts.len(), 16);
        let curve = Curve::Cubic { p0, p1, p2, p3 };
        for (i, p) in pts.iter().enumerate().skip(1) {
            assert!(close(*p, curve.eval(i as f32 / 15.0)));
        }
    }

    // Straight "curves" are not special-cased: they still emit every step.
    #[test]
    fn degenerate_straight_quad_still_emits_steps() {
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::QuadTo { ctrl: v(2.0, 0.0), to: v(4.0, 0.0) },
        ];
        let pts: Vec<_> = flatten(&cmds, 1.0).collect();
        assert_eq!(pts.len(), 1 + 4);
        assert!(pts.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn degenerate_straight_cubic_still_emits_steps() {
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::CubicTo { ctrl1: v(1.0, 1.0), ctrl2: v(2.0, 2.0), to: v(3.0, 3.0) },
        ];
        // chord ≈ 4.24 → round(4.24) = 4 steps
        assert_eq!(flatten(&cmds, 1.0).count(), 1 + 4);
    }

    // Short chords under-sample sharp curves; this is accepted behavior.
    #[test]
    fn sharp_curve_with_short_chord_is_coarse() {
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::CubicTo { ctrl1: v(0.0, 500.0), ctrl2: v(1.0, 500.0), to: v(1.0, 0.0) },
        ];
        assert_eq!(flatten(&cmds, 1.0).count(), 1 + 3);
    }

    #[test]
    fn curve_without_move_to_starts_at_origin() {
        let cmds = [PathCmd::QuadTo { ctrl: v(0.0, 4.0), to: v(4.0, 4.0) }];
        let pts: Vec<_> = flatten(&cmds, 1.0).collect();
        // chord = sqrt(32) ≈ 5.66 → 6 steps; origin is not emitted.
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[5], v(4.0, 4.0));
    }

    #[test]
    fn invalid_tolerance_is_clamped() {
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::QuadTo { ctrl: v(0.0, 1.0), to: v(1.0, 1.0) },
        ];
        let chord = v(0.0, 0.0).distance(v(1.0, 1.0));
        let expected = 1 + (chord / MIN_TOLERANCE).round() as usize;
        for tol in [0.0, -3.0, f32::NAN] {
            assert_eq!(flatten(&cmds, tol).count(), expected, "tolerance {tol}");
        }
    }

    #[test]
    fn long_curve_step_count_is_not_capped() {
        // chord = 5000, tolerance = 1 → 5000 steps
        let cmds = [
            PathCmd::MoveTo(v(0.0, 0.0)),
            PathCmd::QuadTo { ctrl: v(2500.0, 100.0), to: v(5000.0, 0.0) },
        ];
        let pts: Vec<_> = flatten(&cmds, 1.0).collect();
        assert_eq!(pts.len(), 1 + 5000);
        assert_eq!(pts[5000], v(5000.0, 0.0));
    }

    #[test]
    fn output_has_at_least_two_points_for_a_drawn_segment() {
        let cmds = [PathCmd::MoveTo(v(3.0, 3.0)), PathCmd::LineTo(v(4.0, 9.0))];
        assert!(flatten(&cmds, 0.5).count() >= 2);
    }

    #[test]
    fn iterator_is_fused() {
        let cmds = [PathCmd::MoveTo(v(1.0, 1.0))];
        let mut it = flatten(&cmds, 1.0);
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn flatten_path_separates_subpaths() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .close()
            .move_to(0.0, 5.0)
            .line_to(10.0, 5.0);
        let lines = flatten_path(&path, 1.0);
        assert_eq!(lines, vec![vec![v(0.0, 0.0), v(10.0, 0.0)], vec![v(0.0, 5.0), v(10.0, 5.0)]]);
    }

    #[test]
    fn flatten_path_drops_empty_subpaths() {
        let path = Path::from_cmds(vec![PathCmd::Close, PathCmd::MoveTo(v(1.0, 1.0))]);
        assert_eq!(flatten_path(&path, 1.0), vec![vec![v(1.0, 1.0)]]);
    }
}
