pub mod calendar;
pub mod summary;
pub mod timeline;

pub use calendar::{deadline_events, status_color, CalendarEvent};
pub use summary::{actual_minutes, format_minutes, summarize, TaskSummary};
pub use timeline::{
    stacked_timeline, tick_label, Segment, Timeline, DEFAULT_PIXELS_PER_MINUTE, SEGMENT_COLORS,
};
