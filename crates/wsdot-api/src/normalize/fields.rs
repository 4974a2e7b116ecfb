//! Field-name tables consulted by the normalizer.

use super::dates::DateFormat;

/// Undocumented vessel-watch metadata returned by the WSF vessels API.
///
/// The values are unreliable and absent from the published schemas.
pub const EXCLUDED_FIELDS: &[&str] = &[
    "VesselWatchShutID",
    "VesselWatchShutMsg",
    "VesselWatchShutFlag",
    "VesselWatchStatus",
    "VesselWatchMsg",
];

/// Returns `true` if `name` must be dropped from every parsed object.
#[must_use]
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_FIELDS.contains(&name)
}

/// Returns the date parser registered for `name`.
///
/// `MM/DD/YYYY` strings are only converted under these names, since the same
/// shape is an ordinary string elsewhere.
#[must_use]
pub fn date_format_for(name: &str) -> Option<DateFormat> {
    match name {
        "TimeStamp" | "Eta" | "LeftDock" | "ScheduledDeparture" => Some(DateFormat::EpochWrapper),
        "FromDate" | "ThruDate" => Some(DateFormat::UsDate),
        "ModifiedDate" => Some(DateFormat::UsDateTime),
        _ => None,
    }
}
