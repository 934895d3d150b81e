use chrono::{Local, TimeZone};
use std::fmt::{self, Debug, Display};
use tracing::debug;

use crate::feed::EventRecord;

/// Date rendering used in popups, e.g. `Tue Oct 17 2023 14:02:11 GMT+0200`
pub const POPUP_TIME_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

const UNKNOWN_PLACE: &str = "Unknown location";
const UNKNOWN_TIME: &str = "Unknown time";

/// Popup HTML for an event, with the time rendered in the local time zone.
pub fn describe(event: &EventRecord) -> String {
    describe_in(event, &Local)
}

pub fn describe_in<Tz>(event: &EventRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let place = event.place.as_deref().unwrap_or(UNKNOWN_PLACE);
    let time = event
        .time
        .and_then(|millis| format_timestamp(millis, tz))
        .unwrap_or_else(|| UNKNOWN_TIME.to_string());

    format!(
        "<h3>{}</h3><hr><p>{}</p><p>Magnitude: {}</p><p>Depth: {}</p>",
        handlebars::html_escape(place),
        time,
        event.magnitude,
        event.depth
    )
}

/// Renders epoch milliseconds, or `None` when the instant is out of range.
pub fn format_timestamp<Tz>(millis: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format(POPUP_TIME_FORMAT).to_string())
}

/// Identifies the shape a user activated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation<'a> {
    pub overlay: &'a str,
    pub index: usize,
}

impl Display for Activation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.overlay, self.index)
    }
}

/// Slot for reacting to a click on a marker or boundary shape.
///
/// Nothing downstream depends on what a handler does.
pub trait InteractionHandler: Debug + Send + Sync {
    fn on_activate(&self, activation: &Activation<'_>);

    /// Browser-side statement run on click, if any
    fn client_script(&self) -> Option<String> {
        None
    }
}

/// Logs activations; the exported page logs clicks to the browser console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInteraction;

impl InteractionHandler for LogInteraction {
    fn on_activate(&self, activation: &Activation<'_>) {
        debug!("Shape activated: {}", activation);
    }

    fn client_script(&self) -> Option<String> {
        Some("console.log(\"clicked\", e.latlng);".to_string())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInteraction;

impl InteractionHandler for NoopInteraction {
    fn on_activate(&self, _activation: &Activation<'_>) {}
}
