//! Mood chart layout
//!
//! Turns the 30-day mood series into drawing-surface-agnostic geometry:
//! axes, gap-broken line segments, a marker per plotted point, and integer
//! labels on the value axis. Pure function of the series and the target
//! surface size; whoever owns a real surface just replays the layout.

/// Padding around the plot area, in surface units
pub const PADDING: f64 = 40.0;

const MOOD_MIN: f64 = 1.0;
const MOOD_MAX: f64 = 5.0;

/// A point in surface coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A straight line between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

/// A text label anchored at a point
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub at: Point,
}

/// Complete layout for one chart render
///
/// `segments` holds one polyline per unbroken run of plotted days; a gap in
/// the series ends the current run and the next plotted day starts a new
/// one. Nothing ever connects across a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    /// Value axis and day axis
    pub axes: [Line; 2],
    /// Maximal runs of consecutive plotted points (singletons included)
    pub segments: Vec<Vec<Point>>,
    /// One marker dot per plotted point
    pub markers: Vec<Point>,
    /// Integer mood labels along the value axis
    pub value_labels: Vec<AxisLabel>,
}

/// Lay out the mood series on a surface of the given size
pub fn layout(series: &[Option<u8>], width: f64, height: f64) -> ChartLayout {
    let chart_width = width - PADDING * 2.0;
    let chart_height = height - PADDING * 2.0;

    let axes = [
        // Value axis (left)
        Line {
            from: Point {
                x: PADDING,
                y: PADDING,
            },
            to: Point {
                x: PADDING,
                y: height - PADDING,
            },
        },
        // Day axis (bottom)
        Line {
            from: Point {
                x: PADDING,
                y: height - PADDING,
            },
            to: Point {
                x: width - PADDING,
                y: height - PADDING,
            },
        },
    ];

    let slots = series.len().max(2) - 1;
    let x_of = |index: usize| PADDING + (index as f64 / slots as f64) * chart_width;
    let y_of = |mood: u8| {
        height - PADDING - ((mood as f64 - MOOD_MIN) / (MOOD_MAX - MOOD_MIN)) * chart_height
    };

    let mut segments: Vec<Vec<Point>> = Vec::new();
    let mut markers = Vec::new();
    let mut run: Vec<Point> = Vec::new();

    for (index, slot) in series.iter().enumerate() {
        match slot {
            Some(mood) => {
                let point = Point {
                    x: x_of(index),
                    y: y_of(*mood),
                };
                run.push(point);
                markers.push(point);
            }
            None => {
                if !run.is_empty() {
                    segments.push(std::mem::take(&mut run));
                }
            }
        }
    }
    if !run.is_empty() {
        segments.push(run);
    }

    let value_labels = (1..=5)
        .map(|mood| AxisLabel {
            text: mood.to_string(),
            at: Point {
                x: PADDING - 20.0,
                y: y_of(mood) + 3.0,
            },
        })
        .collect();

    ChartLayout {
        width,
        height,
        axes,
        segments,
        markers,
        value_labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::CHART_DAYS;

    fn series_with(indices: &[(usize, u8)]) -> Vec<Option<u8>> {
        let mut series = vec![None; CHART_DAYS];
        for &(i, mood) in indices {
            series[i] = Some(mood);
        }
        series
    }

    #[test]
    fn test_gap_breaks_line_into_segments() {
        // Entries on days 1, 2 and 10: two disconnected segments, no bridge
        let series = series_with(&[(1, 3), (2, 4), (10, 2)]);
        let chart = layout(&series, 400.0, 200.0);

        assert_eq!(chart.segments.len(), 2);
        assert_eq!(chart.segments[0].len(), 2);
        assert_eq!(chart.segments[1].len(), 1);
        assert_eq!(chart.markers.len(), 3);
    }

    #[test]
    fn test_unbroken_run_is_one_segment() {
        let series = series_with(&[(5, 1), (6, 2), (7, 3), (8, 4)]);
        let chart = layout(&series, 400.0, 200.0);

        assert_eq!(chart.segments.len(), 1);
        assert_eq!(chart.segments[0].len(), 4);
    }

    #[test]
    fn test_empty_series_draws_axes_only() {
        let series = vec![None; CHART_DAYS];
        let chart = layout(&series, 400.0, 200.0);

        assert!(chart.segments.is_empty());
        assert!(chart.markers.is_empty());
        assert_eq!(chart.value_labels.len(), 5);
        assert_eq!(chart.axes[0].from.x, PADDING);
    }

    #[test]
    fn test_mood_scale_maps_to_plot_area() {
        let (width, height) = (400.0, 200.0);
        let series = series_with(&[(0, 1), (CHART_DAYS - 1, 5)]);
        let chart = layout(&series, width, height);

        let low = chart.markers[0];
        let high = chart.markers[1];

        // Mood 1 sits on the day axis, mood 5 at the top of the plot area
        assert!((low.y - (height - PADDING)).abs() < 1e-9);
        assert!((high.y - PADDING).abs() < 1e-9);
        assert!((low.x - PADDING).abs() < 1e-9);
        assert!((high.x - (width - PADDING)).abs() < 1e-9);
    }

    #[test]
    fn test_value_labels_are_integers_one_to_five() {
        let chart = layout(&vec![None; CHART_DAYS], 400.0, 200.0);
        let texts: Vec<&str> = chart.value_labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["1", "2", "3", "4", "5"]);
    }
}
