// Copyright (c) 2017-2021 Fabian Schuiki

//! Piecewise-linear output waveforms
//!
//! A `Path` records the analog output of a single gate as a sequence of
//! vertices `(t, v)`, connected by straight lines. Times never decrease along
//! the path and levels stay within `[0, 1]`. Two consecutive vertices share a
//! timestamp only where the output jumps instantaneously.
//!
//! Paths are kept minimal: a vertex that merely continues the trend of the
//! final segment replaces the current end point instead of being added.

use crate::ratio::{level, one, one_half, zero, Ratio};
use itertools::Itertools;
use std::cmp::Ordering;

/// A vertex of a path, as `(time, level)`.
pub type Point = (Ratio, Ratio);

/// The output waveform of a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    /// Create a path that holds `initial` from time zero until `until`.
    pub fn new(initial: bool, until: Ratio) -> Path {
        let v = level(initial);
        Path {
            points: vec![(zero(), v.clone()), (until, v)],
        }
    }

    /// The vertices of the path.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The consecutive vertex pairs of the path.
    pub fn segments(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points.iter().tuple_windows()
    }

    /// The final vertex of the path.
    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    /// The time up to which the path is known.
    pub fn last_time(&self) -> &Ratio {
        &self.last().0
    }

    /// The output level at the end of the path.
    pub fn last_value(&self) -> &Ratio {
        &self.last().1
    }

    /// Extend the path with new vertices.
    ///
    /// Each vertex either extends the final segment, if it continues in the
    /// same direction (rising, falling, or flat), or is added as a new vertex.
    /// A vertex identical to the current end is dropped.
    ///
    /// Panics if a level lies outside `[0, 1]`, if times decrease, or if the
    /// final vertex does not lie strictly after the current end of the path.
    pub fn append(&mut self, points: impl IntoIterator<Item = Point>) {
        let points: Vec<Point> = points.into_iter().collect();
        let last = match points.last() {
            Some(last) => last,
            None => return,
        };
        assert!(
            &last.0 > self.last_time(),
            "path must advance past {}, got {}",
            self.last_time(),
            last.0
        );
        let mut prior_t = self.last_time();
        for (t, v) in &points {
            assert!(t >= prior_t, "path time regresses from {} to {}", prior_t, t);
            assert!(
                v >= &zero() && v <= &one(),
                "path level {} outside [0, 1]",
                v
            );
            prior_t = t;
        }

        for point in points {
            let n = self.points.len();
            let continues = n > 1 && {
                let earlier = &self.points[n - 2].1;
                let prior = &self.points[n - 1].1;
                earlier.cmp(prior) == prior.cmp(&point.1)
            };
            if continues {
                self.points[n - 1] = point;
            } else if &point != self.last() {
                self.points.push(point);
            }
        }
    }

    /// Clip the path such that it ends exactly at `time`.
    ///
    /// Vertices after `time` are dropped, and a segment straddling `time` is
    /// cut short at its linearly interpolated level. Does nothing if the path
    /// ends before `time`.
    pub fn truncate(&mut self, time: &Ratio) {
        for i in (1..self.points.len()).rev() {
            let (start, end) = (&self.points[i - 1], &self.points[i]);
            if &start.0 >= time {
                self.points.remove(i);
            } else if &end.0 <= time {
                break;
            } else {
                let v = interpolate(start, end, time);
                self.points[i] = (time.clone(), v);
                break;
            }
        }
    }

    /// Locate the segment to start reading the path from at time `t0`.
    ///
    /// Returns the index of the last vertex at or before `t0`, such that the
    /// vertex after it lies strictly after `t0`. Scans backward from the end,
    /// which is cheap for queries close to the end of the path.
    ///
    /// Panics if the path does not extend past `t0`.
    pub(crate) fn segment_at(&self, t0: &Ratio) -> usize {
        let mut index = None;
        for i in (1..self.points.len()).rev() {
            if &self.points[i].0 > t0 {
                index = Some(i - 1);
            } else {
                break;
            }
        }
        match index {
            Some(index) => index,
            None => panic!(
                "path ends at {} and cannot be read at {}",
                self.last_time(),
                t0
            ),
        }
    }
}

/// The level of a segment at time `time`, which must lie within it.
pub fn interpolate(start: &Point, end: &Point, time: &Ratio) -> Ratio {
    let (start_t, start_v) = start;
    let (end_t, end_v) = end;
    start_v + (end_v - start_v) * (time - start_t) / (end_t - start_t)
}

/// The logic reading of a path segment, thresholded at one half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    /// The segment reads as the same value throughout.
    Steady(bool),
    /// The segment crosses the threshold at the given time, reading as the
    /// first value before and the second value after.
    Crossing(bool, bool, Ratio),
}

impl Reading {
    /// Classify the segment from `start` to `end`.
    ///
    /// A vertex exactly on the threshold reads as the side of the other end of
    /// the segment. Panics if both ends lie on the threshold, which the engine
    /// never produces.
    pub fn of(start: &Point, end: &Point) -> Reading {
        let half = one_half();
        let (start_t, start_v) = start;
        let (end_t, end_v) = end;
        assert!(
            start_v != &half || end_v != &half,
            "segment from {} to {} rests on the threshold",
            start_t,
            end_t
        );
        match (start_v.cmp(&half), end_v.cmp(&half)) {
            (Ordering::Less, Ordering::Greater) | (Ordering::Greater, Ordering::Less) => {
                let rising = start_v < end_v;
                let crossing =
                    start_t + (&half - start_v) / (end_v - start_v) * (end_t - start_t);
                Reading::Crossing(!rising, rising, crossing)
            }
            (Ordering::Less, _) | (_, Ordering::Less) => Reading::Steady(false),
            _ => Reading::Steady(true),
        }
    }

    /// The reading at the start of the segment.
    pub fn start(&self) -> bool {
        match *self {
            Reading::Steady(b) => b,
            Reading::Crossing(b, _, _) => b,
        }
    }

    /// The reading at the end of the segment.
    pub fn end(&self) -> bool {
        match *self {
            Reading::Steady(b) => b,
            Reading::Crossing(_, b, _) => b,
        }
    }

    /// The time at which the reading changes, if it does.
    pub fn crossing(&self) -> Option<&Ratio> {
        match self {
            Reading::Steady(_) => None,
            Reading::Crossing(_, _, t) => Some(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratio::{int, ratio};

    fn pt(t: Ratio, v: Ratio) -> Point {
        (t, v)
    }

    #[test]
    fn initial_path() {
        let path = Path::new(true, ratio(3, 2));
        assert_eq!(path.points(), &[pt(int(0), int(1)), pt(ratio(3, 2), int(1))]);
        assert_eq!(path.last_time(), &ratio(3, 2));
        assert_eq!(path.last_value(), &int(1));
        assert_eq!(path.segments().count(), 1);
    }

    #[test]
    fn segments_from_located_start() {
        let mut path = Path::new(true, int(1));
        path.append(vec![pt(int(2), int(0)), pt(int(4), int(0))]);
        let first = path.segment_at(&ratio(3, 2));
        assert_eq!(first, 1);
        let segments: Vec<_> = path.segments().skip(first).collect();
        assert_eq!(
            segments,
            vec![
                (&pt(int(1), int(1)), &pt(int(2), int(0))),
                (&pt(int(2), int(0)), &pt(int(4), int(0))),
            ]
        );
    }

    #[test]
    fn flat_extension_coalesces() {
        let mut path = Path::new(false, int(1));
        path.append(vec![pt(int(3), int(0))]);
        assert_eq!(path.points(), &[pt(int(0), int(0)), pt(int(3), int(0))]);
    }

    #[test]
    fn ramps_coalesce_by_direction() {
        let mut path = Path::new(false, int(1));
        path.append(vec![pt(int(2), ratio(1, 2))]);
        path.append(vec![pt(int(3), int(1))]);
        assert_eq!(
            path.points(),
            &[pt(int(0), int(0)), pt(int(1), int(0)), pt(int(3), int(1))]
        );
        path.append(vec![pt(int(4), int(1))]);
        path.append(vec![pt(int(5), ratio(1, 4))]);
        path.append(vec![pt(int(6), int(0))]);
        assert_eq!(
            path.points(),
            &[
                pt(int(0), int(0)),
                pt(int(1), int(0)),
                pt(int(3), int(1)),
                pt(int(4), int(1)),
                pt(int(6), int(0)),
            ]
        );
    }

    #[test]
    fn instantaneous_jump_keeps_both_vertices() {
        let mut path = Path::new(true, int(1));
        path.append(vec![pt(int(1), int(0)), pt(int(2), int(0))]);
        assert_eq!(
            path.points(),
            &[
                pt(int(0), int(1)),
                pt(int(1), int(1)),
                pt(int(1), int(0)),
                pt(int(2), int(0)),
            ]
        );
    }

    #[test]
    fn duplicate_vertex_is_dropped() {
        let mut path = Path::new(false, int(1));
        path.append(vec![pt(int(2), int(1))]);
        path.append(vec![pt(int(2), int(1)), pt(int(3), int(1))]);
        assert_eq!(
            path.points(),
            &[
                pt(int(0), int(0)),
                pt(int(1), int(0)),
                pt(int(2), int(1)),
                pt(int(3), int(1)),
            ]
        );
    }

    #[test]
    #[should_panic]
    fn append_must_advance() {
        let mut path = Path::new(false, int(1));
        path.append(vec![pt(int(1), int(1))]);
    }

    #[test]
    #[should_panic]
    fn append_rejects_out_of_range_levels() {
        let mut path = Path::new(false, int(1));
        path.append(vec![pt(int(2), ratio(3, 2))]);
    }

    #[test]
    fn truncate_interpolates() {
        let mut path = Path::new(false, int(1));
        path.append(vec![pt(int(3), int(1)), pt(int(5), int(1))]);
        let mut clipped = path.clone();
        clipped.truncate(&int(2));
        assert_eq!(
            clipped.points(),
            &[pt(int(0), int(0)), pt(int(1), int(0)), pt(int(2), ratio(1, 2))]
        );
        let mut clipped = path.clone();
        clipped.truncate(&int(3));
        assert_eq!(
            clipped.points(),
            &[pt(int(0), int(0)), pt(int(1), int(0)), pt(int(3), int(1))]
        );
        let mut clipped = path.clone();
        clipped.truncate(&int(7));
        assert_eq!(clipped, path);
    }

    #[test]
    fn truncate_drops_jump_at_cut() {
        let mut path = Path::new(true, int(1));
        path.append(vec![pt(int(1), int(0)), pt(int(2), int(0))]);
        path.truncate(&int(1));
        assert_eq!(path.points(), &[pt(int(0), int(1)), pt(int(1), int(1))]);
    }

    #[test]
    fn segment_lookup() {
        let mut path = Path::new(false, int(1));
        path.append(vec![pt(int(3), int(1)), pt(int(5), int(1))]);
        assert_eq!(path.segment_at(&int(0)), 0);
        assert_eq!(path.segment_at(&ratio(1, 2)), 0);
        assert_eq!(path.segment_at(&int(1)), 1);
        assert_eq!(path.segment_at(&int(4)), 2);
    }

    #[test]
    #[should_panic]
    fn segment_lookup_past_end() {
        Path::new(false, int(1)).segment_at(&int(1));
    }

    #[test]
    fn readings() {
        let r = Reading::of(&pt(int(0), int(0)), &pt(int(1), int(1)));
        assert_eq!(r, Reading::Crossing(false, true, ratio(1, 2)));
        let r = Reading::of(&pt(int(2), int(1)), &pt(int(6), ratio(1, 4)));
        assert_eq!(r, Reading::Crossing(true, false, ratio(14, 3)));
        assert_eq!(r.start(), true);
        assert_eq!(r.end(), false);
        assert_eq!(r.crossing(), Some(&ratio(14, 3)));
        let r = Reading::of(&pt(int(0), int(1)), &pt(int(1), ratio(1, 2)));
        assert_eq!(r, Reading::Steady(true));
        let r = Reading::of(&pt(int(0), ratio(1, 2)), &pt(int(1), int(0)));
        assert_eq!(r, Reading::Steady(false));
        assert_eq!(r.crossing(), None);
    }

    #[test]
    #[should_panic]
    fn reading_on_threshold() {
        Reading::of(&pt(int(0), ratio(1, 2)), &pt(int(1), ratio(1, 2)));
    }
}
