use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::CorneringError;
use crate::track_metadata::SegmentLabel;

use super::LabeledSample;

/// A position on the lap
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LapPoint {
    /// Meters from the start/finish line
    pub distance: f64,
    /// Seconds since the start of the lap
    pub time: f64,
}

impl From<&LabeledSample> for LapPoint {
    fn from(sample: &LabeledSample) -> Self {
        Self {
            distance: sample.distance,
            time: sample.time,
        }
    }
}

/// A maximal run of samples sharing one label
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub label: SegmentLabel,
    pub start: LapPoint,
    pub end: LapPoint,
}

impl Segment {
    pub fn distance(&self) -> f64 {
        self.end.distance - self.start.distance
    }

    pub fn duration(&self) -> f64 {
        self.end.time - self.start.time
    }
}

/// Split a labeled lap into contiguous segments.
///
/// The lap always opens with a STRAIGHT segment at (0, 0), whatever the
/// first sample's label: the start/finish straight is assumed until a label
/// change is observed. A label change between samples `i` and `i + 1` closes
/// the open segment at sample `i` and opens one labeled like sample `i + 1`
/// at that same point. The last sample closes the open segment and is
/// followed by a zero-length closing segment carrying the last sample's label,
/// so each segment's end is the next segment's start.
///
/// Samples are expected to be ordered by distance and time; this is not
/// checked and the output for unordered input is unspecified.
pub fn segment_lap(samples: &[LabeledSample]) -> Result<Vec<Segment>, CorneringError> {
    let last = samples.last().ok_or(CorneringError::EmptyLap)?;

    let mut segments = Vec::new();
    let mut open_label = SegmentLabel::Straight;
    let mut open_start = LapPoint::default();

    for (prev, next) in samples.iter().tuple_windows() {
        if prev.label != next.label {
            let boundary = LapPoint::from(prev);
            segments.push(Segment {
                label: open_label,
                start: open_start,
                end: boundary,
            });
            open_label = next.label;
            open_start = boundary;
        }
    }

    let finish = LapPoint::from(last);
    segments.push(Segment {
        label: open_label,
        start: open_start,
        end: finish,
    });
    segments.push(Segment {
        label: last.label,
        start: finish,
        end: finish,
    });
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labeled(points: &[(f64, f64, SegmentLabel)]) -> Vec<LabeledSample> {
        points
            .iter()
            .map(|&(distance, time, label)| LabeledSample {
                distance,
                time,
                label,
            })
            .collect()
    }

    fn point(distance: f64, time: f64) -> LapPoint {
        LapPoint { distance, time }
    }

    #[test]
    fn test_empty_lap() {
        assert!(matches!(segment_lap(&[]), Err(CorneringError::EmptyLap)));
    }

    #[test]
    fn test_single_sample_lap() {
        let samples = labeled(&[(12., 0.2, SegmentLabel::Low)]);
        let segments = segment_lap(&samples).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment {
                    label: SegmentLabel::Straight,
                    start: point(0., 0.),
                    end: point(12., 0.2),
                },
                Segment {
                    label: SegmentLabel::Low,
                    start: point(12., 0.2),
                    end: point(12., 0.2),
                },
            ]
        );
    }

    #[test]
    fn test_reference_lap_segments() {
        // Table [("LOW", 0, 100), ("HIGH", 100, 300)] applied to these distances
        let samples = labeled(&[
            (0., 0., SegmentLabel::Straight),
            (50., 5., SegmentLabel::Low),
            (100., 10., SegmentLabel::Low),
            (200., 20., SegmentLabel::High),
            (300., 30., SegmentLabel::High),
        ]);
        let segments = segment_lap(&samples).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment {
                    label: SegmentLabel::Straight,
                    start: point(0., 0.),
                    end: point(0., 0.),
                },
                Segment {
                    label: SegmentLabel::Low,
                    start: point(0., 0.),
                    end: point(100., 10.),
                },
                Segment {
                    label: SegmentLabel::High,
                    start: point(100., 10.),
                    end: point(300., 30.),
                },
                Segment {
                    label: SegmentLabel::High,
                    start: point(300., 30.),
                    end: point(300., 30.),
                },
            ]
        );
    }

    #[test]
    fn test_first_segment_is_straight_even_in_a_corner() {
        let samples = labeled(&[
            (5., 0.1, SegmentLabel::MediumHigh),
            (40., 0.8, SegmentLabel::MediumHigh),
            (80., 1.5, SegmentLabel::Straight),
        ]);
        let segments = segment_lap(&samples).unwrap();
        assert_eq!(segments[0].label, SegmentLabel::Straight);
        assert_eq!(segments[0].start, point(0., 0.));
        assert_eq!(segments[0].end, point(40., 0.8));
        assert_eq!(segments[1].label, SegmentLabel::Straight);
        assert_eq!(segments[1].start, point(40., 0.8));
    }

    #[test]
    fn test_unordered_samples_are_not_rejected() {
        // Non-monotonic input is the provider's responsibility: segmentation
        // still succeeds but the spans it produces carry no guarantee
        let samples = labeled(&[
            (100., 10., SegmentLabel::Low),
            (50., 5., SegmentLabel::High),
        ]);
        assert!(segment_lap(&samples).is_ok());
    }

    fn lap_strategy() -> impl Strategy<Value = Vec<LabeledSample>> {
        prop::collection::vec((0.1f64..50., 0.01f64..1., 0usize..5), 1..200).prop_map(|steps| {
            let mut distance = 0.;
            let mut time = 0.;
            steps
                .into_iter()
                .map(|(d, t, label)| {
                    distance += d;
                    time += t;
                    LabeledSample {
                        distance,
                        time,
                        label: SegmentLabel::ALL[label],
                    }
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_segments_are_contiguous(samples in lap_strategy()) {
            let segments = segment_lap(&samples).unwrap();

            prop_assert_eq!(segments[0].label, SegmentLabel::Straight);
            prop_assert_eq!(segments[0].start, LapPoint::default());
            for (a, b) in segments.iter().tuple_windows() {
                prop_assert_eq!(a.end, b.start);
                prop_assert!(a.distance() >= 0.);
                prop_assert!(a.duration() >= 0.);
            }

            let last = samples.last().unwrap();
            let closing = segments.last().unwrap();
            prop_assert_eq!(closing.label, last.label);
            prop_assert_eq!(closing.distance(), 0.);
            prop_assert_eq!(closing.end, LapPoint::from(last));
        }

        #[test]
        fn prop_adjacent_segments_change_label(samples in lap_strategy()) {
            let segments = segment_lap(&samples).unwrap();
            let open = &segments[1..segments.len() - 1];
            // Apart from the seeded STRAIGHT and the closing segment, a new
            // segment is only opened on a label change
            for (a, b) in open.iter().tuple_windows() {
                prop_assert_ne!(a.label, b.label);
            }
        }
    }
}
