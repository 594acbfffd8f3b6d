use crate::domain::TimeLog;
use uuid::Uuid;

/// Default chart density in pixels per worked minute
pub const DEFAULT_PIXELS_PER_MINUTE: f64 = 3.0;

/// Horizontal padding reserved when fitting the chart to a container
const FIT_MARGIN_PX: f64 = 20.0;

/// Bar colors, cycled by chronological segment index
pub const SEGMENT_COLORS: [&str; 7] = [
    "#3B82F6", // blue
    "#EF4444", // red
    "#22C55E", // green
    "#EAB308", // yellow
    "#A855F7", // purple
    "#EC4899", // pink
    "#6366F1", // indigo
];

/// One log rendered as a contiguous bar segment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub log_id: Uuid,
    pub label: String,
    pub duration_minutes: i64,
    pub width_px: f64,
    pub color: &'static str,
}

/// Stacked (cumulative-minutes) timeline for one task's logs
///
/// The horizontal axis is total worked minutes, not calendar time: segments
/// are laid out back to back in `start_time` order with lengths proportional
/// to their durations.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Total worked minutes across all logs, rounded up
    pub total_minutes: i64,
    /// Tick positions in minutes, every 30 up to one interval past the total
    pub ticks: Vec<i64>,
    /// Effective chart density after fitting to the container
    pub pixels_per_minute: f64,
    pub segments: Vec<Segment>,
}

impl Timeline {
    /// Full chart width in pixels (position of the last tick)
    pub fn width_px(&self) -> f64 {
        self.ticks.last().copied().unwrap_or(0) as f64 * self.pixels_per_minute
    }
}

/// Lay out a task's logs as a stacked timeline
///
/// `container_width` is the rendering surface's width in pixels, if known.
/// The chart shrinks to fit the container but never grows denser than
/// [`DEFAULT_PIXELS_PER_MINUTE`].
pub fn stacked_timeline(logs: &[TimeLog], container_width: Option<f64>) -> Timeline {
    let mut sorted: Vec<&TimeLog> = logs.iter().collect();
    sorted.sort_by_key(|log| log.start_time);

    let total_seconds: i64 = sorted.iter().map(|log| log.duration_seconds).sum();
    let total_minutes = (total_seconds as f64 / 60.0).ceil() as i64;

    let ticks = tick_marks(total_minutes);
    let max_tick = *ticks.last().unwrap_or(&0);

    let pixels_per_minute = match container_width {
        Some(width) if max_tick > 0 => {
            let fit = (width - FIT_MARGIN_PX) / max_tick as f64;
            DEFAULT_PIXELS_PER_MINUTE.min(fit)
        }
        _ => DEFAULT_PIXELS_PER_MINUTE,
    };

    let segments = sorted
        .iter()
        .enumerate()
        .filter_map(|(index, log)| {
            let duration_minutes = log.duration_minutes();
            let width_px = duration_minutes as f64 * pixels_per_minute;
            if width_px <= 0.0 {
                return None;
            }
            Some(Segment {
                log_id: log.id,
                label: log.sub_task_name.clone(),
                duration_minutes,
                width_px,
                color: SEGMENT_COLORS[index % SEGMENT_COLORS.len()],
            })
        })
        .collect();

    Timeline {
        total_minutes,
        ticks,
        pixels_per_minute,
        segments,
    }
}

/// Tick positions: every 30 minutes from 0 through the smallest multiple of
/// 30 strictly greater than the total, so the chart always ends with padding.
fn tick_marks(total_minutes: i64) -> Vec<i64> {
    let max_tick = (total_minutes / 30 + 1) * 30;
    (0..=max_tick).step_by(30).collect()
}

/// Axis label for a tick position: "0", "30m", "1h", "90m", "2h", ...
pub fn tick_label(minutes: i64) -> String {
    if minutes == 0 {
        "0".to_string()
    } else if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn log_at(start: DateTime<Local>, minutes: i64, label: &str) -> TimeLog {
        TimeLog {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            sub_task_name: label.to_string(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            duration_seconds: minutes * 60,
            created_at: start + Duration::minutes(minutes),
        }
    }

    fn base() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_segments_contiguous_and_proportional() {
        // Deliberately out of chronological order in the input
        let logs = vec![
            log_at(base() + Duration::hours(2), 20, "清書"),
            log_at(base(), 10, "下書き"),
            log_at(base() + Duration::hours(5), 5, "見直し"),
        ];

        let timeline = stacked_timeline(&logs, None);
        assert_eq!(timeline.total_minutes, 35);
        assert_eq!(timeline.ticks, vec![0, 30, 60]);

        let labels: Vec<&str> = timeline.segments.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["下書き", "清書", "見直し"]);

        let widths: Vec<f64> = timeline.segments.iter().map(|s| s.width_px).collect();
        assert_eq!(widths, vec![30.0, 60.0, 15.0]); // 10:20:5 at 3 px/min
    }

    #[test]
    fn test_colors_cycle_by_index() {
        let logs: Vec<TimeLog> = (0..9)
            .map(|i| log_at(base() + Duration::hours(i), 10, "作業"))
            .collect();

        let timeline = stacked_timeline(&logs, None);
        assert_eq!(timeline.segments[0].color, SEGMENT_COLORS[0]);
        assert_eq!(timeline.segments[6].color, SEGMENT_COLORS[6]);
        assert_eq!(timeline.segments[7].color, SEGMENT_COLORS[0]);
        assert_eq!(timeline.segments[8].color, SEGMENT_COLORS[1]);
    }

    #[test]
    fn test_zero_duration_segments_dropped() {
        let logs = vec![
            log_at(base(), 10, "下書き"),
            log_at(base() + Duration::hours(1), 0, "空"),
        ];

        let timeline = stacked_timeline(&logs, None);
        assert_eq!(timeline.segments.len(), 1);
        assert_eq!(timeline.segments[0].label, "下書き");
    }

    #[test]
    fn test_scale_shrinks_to_fit_but_never_grows() {
        let logs = vec![log_at(base(), 35, "作業")]; // ticks 0..=60

        // Narrow container: (140 - 20) / 60 = 2 px/min
        let narrow = stacked_timeline(&logs, Some(140.0));
        assert_eq!(narrow.pixels_per_minute, 2.0);

        // Wide container: fit scale exceeds the default, default wins
        let wide = stacked_timeline(&logs, Some(10_000.0));
        assert_eq!(wide.pixels_per_minute, DEFAULT_PIXELS_PER_MINUTE);
    }

    #[test]
    fn test_empty_logs_still_pad_one_interval() {
        let timeline = stacked_timeline(&[], None);
        assert_eq!(timeline.total_minutes, 0);
        assert_eq!(timeline.ticks, vec![0, 30]);
        assert!(timeline.segments.is_empty());
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(0), "0");
        assert_eq!(tick_label(30), "30m");
        assert_eq!(tick_label(60), "1h");
        assert_eq!(tick_label(90), "90m");
        assert_eq!(tick_label(120), "2h");
    }
}
