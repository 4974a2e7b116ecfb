//! Washington State Ferries endpoints.

use chrono::Local;

use crate::cache::CacheStrategy;
use crate::endpoint::{ApiFamily, Endpoint, ParamKind, ParamSpec, Params, SampleParams};
use crate::schema::{Schema, fields};

const OPT_STRING: Schema = Schema::Nullable(&Schema::String);
const OPT_INTEGER: Schema = Schema::Nullable(&Schema::Integer);
const OPT_DATE: Schema = Schema::Nullable(&Schema::Date);

const TRIP_DATE: ParamSpec = ParamSpec {
    name: "TripDate",
    kind: ParamKind::Date,
    description: "Sailing date, YYYY-MM-DD",
};

/// Real-time position of one vessel.
pub const VESSEL_LOCATION: Schema = Schema::Object(fields![
    "VesselID": Schema::Integer,
    "VesselName": Schema::String,
    "Mmsi": OPT_INTEGER,
    "DepartingTerminalID": Schema::Integer,
    "DepartingTerminalName": Schema::String,
    "DepartingTerminalAbbrev": Schema::String,
    "ArrivingTerminalID": OPT_INTEGER,
    "ArrivingTerminalName": OPT_STRING,
    "ArrivingTerminalAbbrev": OPT_STRING,
    "Latitude": Schema::Number,
    "Longitude": Schema::Number,
    "Speed": Schema::Number,
    "Heading": Schema::Integer,
    "InService": Schema::Boolean,
    "AtDock": Schema::Boolean,
    "LeftDock": OPT_DATE,
    "Eta": OPT_DATE,
    "EtaBasis": OPT_STRING,
    "ScheduledDeparture": OPT_DATE,
    "OpRouteAbbrev": Schema::Array(&Schema::String),
    "VesselPositionNum": OPT_INTEGER,
    "SortSeq": Schema::Integer,
    "ManagedBy": Schema::Integer,
    "TimeStamp": Schema::Date,
]);

/// First and last date with published data.
pub const VALID_DATE_RANGE: Schema = Schema::Object(fields![
    "DateFrom": Schema::Date,
    "DateThru": Schema::Date,
]);

const VESSEL_CLASS: Schema = Schema::Object(fields![
    "ClassID": Schema::Integer,
    "ClassName": Schema::String,
    "PublicDisplayName": OPT_STRING,
]);

const VESSEL_BASIC: Schema = Schema::Object(fields![
    "VesselID": Schema::Integer,
    "VesselName": Schema::String,
    "VesselAbbrev": Schema::String,
    "Class": Schema::Nullable(&VESSEL_CLASS),
    "Status": Schema::Integer,
    "OwnedByWSF": Schema::Boolean,
]);

const ARRIVAL_SPACE: Schema = Schema::Object(fields![
    "TerminalID": Schema::Integer,
    "TerminalName": Schema::String,
    "VesselID": Schema::Integer,
    "VesselName": Schema::String,
    "DisplayReservableSpace": Schema::Boolean,
    "ReservableSpaceCount": OPT_INTEGER,
    "DisplayDriveUpSpace": Schema::Boolean,
    "DriveUpSpaceCount": OPT_INTEGER,
    "MaxSpaceCount": Schema::Integer,
    "ArrivalTerminalIDs": Schema::Array(&Schema::Integer),
]);

const DEPARTING_SPACE: Schema = Schema::Object(fields![
    "Departure": Schema::Date,
    "IsCancelled": Schema::Boolean,
    "VesselID": Schema::Integer,
    "VesselName": Schema::String,
    "MaxSpaceCount": Schema::Integer,
    "SpaceForArrivalTerminals": Schema::Array(&ARRIVAL_SPACE),
]);

const TERMINAL_SAILING_SPACE: Schema = Schema::Object(fields![
    "TerminalID": Schema::Integer,
    "TerminalName": Schema::String,
    "TerminalAbbrev": Schema::String,
    "SortSeq": Schema::Integer,
    "DepartingSpaces": Schema::Array(&DEPARTING_SPACE),
    "IsNoFareCollected": Schema::Nullable(&Schema::Boolean),
    "NoFareCollectedMsg": OPT_STRING,
]);

const TERMINAL_BASIC: Schema = Schema::Object(fields![
    "TerminalID": Schema::Integer,
    "RegionID": Schema::Integer,
    "TerminalName": Schema::String,
    "TerminalAbbrev": Schema::String,
    "SortSeq": Schema::Integer,
    "Elevator": Schema::Boolean,
    "WaitingRoom": Schema::Boolean,
    "FoodService": Schema::Boolean,
    "Restroom": Schema::Boolean,
]);

const ROUTE: Schema = Schema::Object(fields![
    "RouteID": Schema::Integer,
    "RouteAbbrev": Schema::String,
    "Description": Schema::String,
    "RegionID": Schema::Integer,
]);

const SAILING_TIME: Schema = Schema::Object(fields![
    "DepartingTime": Schema::Date,
    "ArrivingTime": OPT_DATE,
    "LoadingRule": Schema::Integer,
    "VesselID": Schema::Integer,
    "VesselName": Schema::String,
    "VesselHandicapAccessible": Schema::Boolean,
    "Routes": Schema::Array(&Schema::Integer),
    "AnnotationIndexes": Schema::Array(&Schema::Integer),
]);

const TERMINAL_COMBO: Schema = Schema::Object(fields![
    "DepartingTerminalID": Schema::Integer,
    "DepartingTerminalName": Schema::String,
    "ArrivingTerminalID": Schema::Integer,
    "ArrivingTerminalName": Schema::String,
    "SailingNotes": Schema::String,
    "Annotations": Schema::Array(&Schema::String),
    "Times": Schema::Array(&SAILING_TIME),
]);

const SCHEDULE: Schema = Schema::Object(fields![
    "ScheduleID": Schema::Integer,
    "ScheduleName": Schema::String,
    "ScheduleSeason": Schema::Integer,
    "SchedulePDFUrl": Schema::String,
    "ScheduleStart": Schema::Date,
    "ScheduleEnd": Schema::Date,
    "AllRoutes": Schema::Array(&Schema::Integer),
    "TerminalCombos": Schema::Array(&TERMINAL_COMBO),
]);

const FARES_TERMINAL: Schema = Schema::Object(fields![
    "TerminalID": Schema::Integer,
    "Description": Schema::String,
    "SortSeq": Schema::Integer,
]);

/// Today's date in local time, the only trip date guaranteed to be valid.
fn today_trip_date() -> Params {
    Params::new().with(TRIP_DATE.name, Local::now().date_naive().format("%Y-%m-%d"))
}

/// Every ferries endpoint.
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getVesselLocations",
        path_template: "vessels/rest/vessellocations",
        description: "Real-time position of every vessel",
        params: &[],
        output: Schema::Array(&VESSEL_LOCATION),
        sample: SampleParams::None,
        cache: CacheStrategy::Realtime,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getVesselLocationsByVesselId",
        path_template: "vessels/rest/vessellocations/{VesselID}",
        description: "Real-time position of one vessel",
        params: &[ParamSpec {
            name: "VesselID",
            kind: ParamKind::Integer,
            description: "Vessel identifier",
        }],
        output: VESSEL_LOCATION,
        sample: SampleParams::Literal(&[("VesselID", "18")]),
        cache: CacheStrategy::Realtime,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getVesselBasics",
        path_template: "vessels/rest/vesselbasics",
        description: "Name, class and status of every vessel",
        params: &[],
        output: Schema::Array(&VESSEL_BASIC),
        sample: SampleParams::None,
        cache: CacheStrategy::Static,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getVesselsCacheFlushDate",
        path_template: "vessels/rest/cacheflushdate",
        description: "When static vessel data last changed",
        params: &[],
        output: Schema::Date,
        sample: SampleParams::None,
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getTerminalSailingSpace",
        path_template: "terminals/rest/terminalsailingspace",
        description: "Remaining vehicle space on upcoming departures",
        params: &[],
        output: Schema::Array(&TERMINAL_SAILING_SPACE),
        sample: SampleParams::None,
        cache: CacheStrategy::Realtime,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getTerminalBasics",
        path_template: "terminals/rest/terminalbasics",
        description: "Name and amenities of every terminal",
        params: &[],
        output: Schema::Array(&TERMINAL_BASIC),
        sample: SampleParams::None,
        cache: CacheStrategy::Static,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getScheduleValidDateRange",
        path_template: "schedule/rest/validdaterange",
        description: "Date range covered by published schedules",
        params: &[],
        output: VALID_DATE_RANGE,
        sample: SampleParams::None,
        cache: CacheStrategy::Daily,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getRoutes",
        path_template: "schedule/rest/routes/{TripDate}",
        description: "Routes in service on a trip date",
        params: &[TRIP_DATE],
        output: Schema::Array(&ROUTE),
        sample: SampleParams::Computed(today_trip_date),
        cache: CacheStrategy::Daily,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getScheduleToday",
        path_template: "schedule/rest/scheduletoday/{RouteID}/{OnlyRemainingTimes}",
        description: "Today's sailings on a route",
        params: &[
            ParamSpec {
                name: "RouteID",
                kind: ParamKind::Integer,
                description: "Route identifier",
            },
            ParamSpec {
                name: "OnlyRemainingTimes",
                kind: ParamKind::Boolean,
                description: "Omit sailings that already departed",
            },
        ],
        output: SCHEDULE,
        sample: SampleParams::Literal(&[("RouteID", "9"), ("OnlyRemainingTimes", "false")]),
        cache: CacheStrategy::Hourly,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getFaresTerminals",
        path_template: "fares/rest/terminals/{TripDate}",
        description: "Terminals with fares on a trip date",
        params: &[TRIP_DATE],
        output: Schema::Array(&FARES_TERMINAL),
        sample: SampleParams::Computed(today_trip_date),
        cache: CacheStrategy::Daily,
    },
    Endpoint {
        api: ApiFamily::Wsf,
        function_name: "getFaresValidDateRange",
        path_template: "fares/rest/validdaterange",
        description: "Date range covered by published fares",
        params: &[],
        output: VALID_DATE_RANGE,
        sample: SampleParams::None,
        cache: CacheStrategy::Daily,
    },
];
