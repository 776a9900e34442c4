use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::content_line::{param_value, ContentLines};

// Calendar event
//------------------------------------------------------------------------------

const PRODID: &str = "-//barcode-kit//EN";

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum PriorityBand {
    Low,
    Medium,
    High,
}

/// A single event, serialized as an iCalendar VEVENT. Times are floating local times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub is_all_day: bool,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: Option<String>,
    pub description: Option<String>,
    pub event_class: Option<String>,
    pub organizer: Option<String>,
    /// 1 is the highest priority, 9 the lowest.
    pub priority: i32,
    pub show_as_busy: bool,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            is_all_day: false,
            start,
            end,
            location: None,
            description: None,
            event_class: None,
            organizer: None,
            priority: 5,
            show_as_busy: true,
        }
    }

    pub fn priority(&self) -> i32 {
        self.priority.clamp(1, 9)
    }

    pub fn priority_band(&self) -> PriorityBand {
        match self.priority() {
            1..=4 => PriorityBand::Low,
            5 => PriorityBand::Medium,
            _ => PriorityBand::High,
        }
    }

    /// VCALENDAR holding this event. No UID or DTSTAMP is written, so the same event always
    /// serializes to the same text.
    pub fn to_ical(&self) -> String {
        let mut cal = ContentLines::new();
        cal.raw("BEGIN", "VCALENDAR")
            .raw("VERSION", "2.0")
            .raw("PRODID", PRODID)
            .raw("BEGIN", "VEVENT")
            .text("SUMMARY", &self.title);
        self.write_time(&mut cal, "DTSTART", &self.start);
        self.write_time(&mut cal, "DTEND", &self.end);

        for (name, value) in [
            ("LOCATION", &self.location),
            ("DESCRIPTION", &self.description),
            ("CLASS", &self.event_class),
        ] {
            cal.text_opt(name, value.as_deref().unwrap_or_default());
        }
        if let Some(organizer) = self.organizer.as_deref().filter(|o| !o.is_empty()) {
            cal.raw(&format!("ORGANIZER;CN={}", param_value(organizer)), "");
        }

        let transparency = if self.show_as_busy { "OPAQUE" } else { "TRANSPARENT" };
        cal.raw("PRIORITY", &self.priority().to_string())
            .raw("TRANSP", transparency)
            .raw("END", "VEVENT")
            .raw("END", "VCALENDAR")
            .finish()
    }

    fn write_time(&self, cal: &mut ContentLines, name: &str, t: &NaiveDateTime) {
        if self.is_all_day {
            cal.raw(&format!("{name};VALUE=DATE"), &t.format("%Y%m%d").to_string());
        } else {
            cal.raw(name, &t.format("%Y%m%dT%H%M%S").to_string());
        }
    }
}
