pub mod calendar;
pub mod clock;
pub mod page;
pub mod time_utils;

pub use calendar::ReportingCalendar;
pub use clock::{Clock, FixedClock, SystemClock};
pub use page::{Page, PageRequest};
