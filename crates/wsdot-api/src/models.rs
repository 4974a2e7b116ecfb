//! Typed response models.
//!
//! Decoded from normalized values, so every date field is already a
//! `DateTime<Utc>`. Fields the upstream may omit or null are `Option`s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point on a state route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoadwayLocation {
    /// Free-text location.
    pub description: Option<String>,
    /// Travel direction.
    pub direction: Option<String>,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// State route milepost.
    pub mile_post: f64,
    /// Route name, e.g. `005`.
    pub road_name: Option<String>,
}

/// A highway alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HighwayAlert {
    /// Alert identifier.
    #[serde(rename = "AlertID")]
    pub alert_id: i64,
    /// County name.
    pub county: Option<String>,
    /// Where the affected stretch ends.
    pub end_roadway_location: Option<RoadwayLocation>,
    /// Expected end, if known.
    pub end_time: Option<DateTime<Utc>>,
    /// E.g. `Collision`, `Construction`.
    pub event_category: String,
    /// E.g. `Open`.
    pub event_status: String,
    /// Long description.
    pub extended_description: Option<String>,
    /// Short description.
    pub headline_description: String,
    /// Last modification time.
    pub last_updated_time: DateTime<Utc>,
    /// E.g. `Highest`, `Low`.
    pub priority: String,
    /// WSDOT region.
    pub region: String,
    /// Where the affected stretch begins.
    pub start_roadway_location: Option<RoadwayLocation>,
    /// Start time.
    pub start_time: DateTime<Utc>,
}

/// A travel-time route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelTime {
    /// Typical minutes.
    pub average_time: i64,
    /// Current minutes.
    pub current_time: i64,
    /// Route description.
    pub description: String,
    /// Miles.
    pub distance: f64,
    /// Route end.
    pub end_point: Option<RoadwayLocation>,
    /// Route name.
    pub name: String,
    /// Route start.
    pub start_point: Option<RoadwayLocation>,
    /// Time of the reading.
    pub time_updated: DateTime<Utc>,
    /// Route identifier.
    #[serde(rename = "TravelTimeID")]
    pub travel_time_id: i64,
}

/// Real-time position of a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VesselLocation {
    /// Vessel identifier.
    #[serde(rename = "VesselID")]
    pub vessel_id: i64,
    /// Vessel name.
    pub vessel_name: String,
    /// AIS identifier.
    pub mmsi: Option<i64>,
    /// Last departure terminal.
    #[serde(rename = "DepartingTerminalID")]
    pub departing_terminal_id: i64,
    /// Last departure terminal name.
    pub departing_terminal_name: String,
    /// Next arrival terminal, when under way.
    #[serde(rename = "ArrivingTerminalID")]
    pub arriving_terminal_id: Option<i64>,
    /// Next arrival terminal name.
    pub arriving_terminal_name: Option<String>,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Knots.
    pub speed: f64,
    /// Degrees from north.
    pub heading: i64,
    /// In service.
    pub in_service: bool,
    /// Docked.
    pub at_dock: bool,
    /// When the vessel left the dock.
    pub left_dock: Option<DateTime<Utc>>,
    /// Estimated arrival.
    pub eta: Option<DateTime<Utc>>,
    /// Scheduled departure of the current sailing.
    pub scheduled_departure: Option<DateTime<Utc>>,
    /// Route abbreviations.
    #[serde(default)]
    pub op_route_abbrev: Vec<String>,
    /// Time of the fix.
    pub time_stamp: DateTime<Utc>,
}

/// First and last date with published data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidDateRange {
    /// First date.
    pub date_from: DateTime<Utc>,
    /// Last date.
    pub date_thru: DateTime<Utc>,
}

impl ValidDateRange {
    /// Returns `true` if `at` falls inside the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.date_from <= at && at <= self.date_thru
    }
}
