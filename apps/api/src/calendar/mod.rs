// Calendar export: proposal phases as all-day events in an iCalendar feed.

pub mod events;
pub mod ics;

pub use events::{events_from_schedule, CalendarEvent};
pub use ics::render_ics;
