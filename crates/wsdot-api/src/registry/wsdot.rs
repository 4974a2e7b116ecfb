//! WSDOT traveler information endpoints.

use crate::cache::CacheStrategy;
use crate::endpoint::{ApiFamily, Endpoint, ParamKind, ParamSpec, SampleParams};
use crate::schema::{Schema, fields};

const OPT_STRING: Schema = Schema::Nullable(&Schema::String);
const OPT_NUMBER: Schema = Schema::Nullable(&Schema::Number);
const OPT_INTEGER: Schema = Schema::Nullable(&Schema::Integer);

/// Point on a state route.
pub const ROADWAY_LOCATION: Schema = Schema::Object(fields![
    "Description": OPT_STRING,
    "Direction": OPT_STRING,
    "Latitude": Schema::Number,
    "Longitude": Schema::Number,
    "MilePost": Schema::Number,
    "RoadName": OPT_STRING,
]);

/// One highway alert.
pub const HIGHWAY_ALERT: Schema = Schema::Object(fields![
    "AlertID": Schema::Integer,
    "County": OPT_STRING,
    "EndRoadwayLocation": Schema::Nullable(&ROADWAY_LOCATION),
    "EndTime": Schema::Nullable(&Schema::Date),
    "EventCategory": Schema::String,
    "EventStatus": Schema::String,
    "ExtendedDescription": OPT_STRING,
    "HeadlineDescription": Schema::String,
    "LastUpdatedTime": Schema::Date,
    "Priority": Schema::String,
    "Region": Schema::String,
    "StartRoadwayLocation": Schema::Nullable(&ROADWAY_LOCATION),
    "StartTime": Schema::Date,
]);

const TRAFFIC_FLOW: Schema = Schema::Object(fields![
    "FlowDataID": Schema::Integer,
    "FlowReadingValue": Schema::Integer,
    "FlowStationLocation": Schema::Nullable(&ROADWAY_LOCATION),
    "Region": Schema::String,
    "StationName": Schema::String,
    "Time": Schema::Date,
]);

/// One travel-time route.
pub const TRAVEL_TIME: Schema = Schema::Object(fields![
    "AverageTime": Schema::Integer,
    "CurrentTime": Schema::Integer,
    "Description": Schema::String,
    "Distance": Schema::Number,
    "EndPoint": Schema::Nullable(&ROADWAY_LOCATION),
    "Name": Schema::String,
    "StartPoint": Schema::Nullable(&ROADWAY_LOCATION),
    "TimeUpdated": Schema::Date,
    "TravelTimeID": Schema::Integer,
]);

const PASS_RESTRICTION: Schema = Schema::Object(fields![
    "RestrictionText": OPT_STRING,
    "TravelDirection": OPT_STRING,
]);

const MOUNTAIN_PASS: Schema = Schema::Object(fields![
    "DateUpdated": Schema::Date,
    "ElevationInFeet": Schema::Integer,
    "Latitude": Schema::Number,
    "Longitude": Schema::Number,
    "MountainPassId": Schema::Integer,
    "MountainPassName": Schema::String,
    "RestrictionOne": Schema::Nullable(&PASS_RESTRICTION),
    "RestrictionTwo": Schema::Nullable(&PASS_RESTRICTION),
    "RoadCondition": Schema::String,
    "TemperatureInFahrenheit": OPT_INTEGER,
    "TravelAdvisoryActive": Schema::Boolean,
    "WeatherCondition": Schema::String,
]);

const WEATHER_INFO: Schema = Schema::Object(fields![
    "StationID": Schema::Integer,
    "StationName": Schema::String,
    "Latitude": Schema::Number,
    "Longitude": Schema::Number,
    "ReadingTime": Schema::Date,
    "TemperatureInFahrenheit": OPT_NUMBER,
    "PrecipitationInInches": OPT_NUMBER,
    "WindSpeedInMPH": OPT_NUMBER,
    "WindDirectionCardinal": OPT_STRING,
    "Visibility": OPT_INTEGER,
]);

const TOLL_RATE: Schema = Schema::Object(fields![
    "CurrentMessage": OPT_STRING,
    "CurrentToll": Schema::Integer,
    "EndLocationName": Schema::String,
    "EndMilepost": Schema::Number,
    "StartLocationName": Schema::String,
    "StartMilepost": Schema::Number,
    "StateRoute": Schema::String,
    "TimeUpdated": Schema::Date,
    "TravelDirection": Schema::String,
    "TripName": Schema::String,
]);

const BORDER_CROSSING: Schema = Schema::Object(fields![
    "BorderCrossingLocation": Schema::Nullable(&ROADWAY_LOCATION),
    "CrossingName": Schema::String,
    "Time": Schema::Date,
    "WaitTime": Schema::Integer,
]);

const CV_RESTRICTION: Schema = Schema::Object(fields![
    "DateEffective": Schema::Date,
    "DateExpires": Schema::Date,
    "DatePosted": Schema::Date,
    "IsDetourAvailable": Schema::Boolean,
    "IsPermanentRestriction": Schema::Boolean,
    "LocationName": Schema::String,
    "RestrictionComment": OPT_STRING,
    "RestrictionType": Schema::Integer,
    "StateRouteID": Schema::String,
    "VehicleType": OPT_STRING,
]);

const BRIDGE_CLEARANCE: Schema = Schema::Object(fields![
    "BridgeNumber": Schema::String,
    "CrossingDescription": Schema::String,
    "CrossingLocationId": Schema::Integer,
    "Latitude": Schema::Number,
    "Longitude": Schema::Number,
    "MaximumVerticalClearanceInches": Schema::Integer,
    "MinimumVerticalClearanceInches": Schema::Integer,
    "RouteDate": Schema::Date,
    "SRMP": Schema::Number,
    "StateRouteID": Schema::String,
]);

const CAMERA: Schema = Schema::Object(fields![
    "CameraID": Schema::Integer,
    "CameraLocation": Schema::Nullable(&ROADWAY_LOCATION),
    "CameraOwner": OPT_STRING,
    "Description": OPT_STRING,
    "ImageURL": Schema::String,
    "IsActive": Schema::Boolean,
    "Region": Schema::String,
    "Title": Schema::String,
]);

/// Every WSDOT traveler endpoint.
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getHighwayAlerts",
        path_template: "HighwayAlerts/HighwayAlertsREST.svc/GetAlertsAsJson",
        description: "All active highway alerts",
        params: &[],
        output: Schema::Array(&HIGHWAY_ALERT),
        sample: SampleParams::None,
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getHighwayAlertById",
        path_template: "HighwayAlerts/HighwayAlertsREST.svc/GetAlertAsJson?AlertID={AlertID}",
        description: "A single highway alert",
        params: &[ParamSpec {
            name: "AlertID",
            kind: ParamKind::Integer,
            description: "Alert identifier",
        }],
        output: HIGHWAY_ALERT,
        sample: SampleParams::Literal(&[("AlertID", "468632")]),
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getTrafficFlows",
        path_template: "TrafficFlow/TrafficFlowREST.svc/GetTrafficFlowsAsJson",
        description: "Current readings from every traffic flow station",
        params: &[],
        output: Schema::Array(&TRAFFIC_FLOW),
        sample: SampleParams::None,
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getTravelTimes",
        path_template: "TravelTimes/TravelTimesREST.svc/GetTravelTimesAsJson",
        description: "Current and average travel times for every route",
        params: &[],
        output: Schema::Array(&TRAVEL_TIME),
        sample: SampleParams::None,
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getTravelTimeById",
        path_template: "TravelTimes/TravelTimesREST.svc/GetTravelTimeAsJson?TravelTimeID={TravelTimeID}",
        description: "Travel time for a single route",
        params: &[ParamSpec {
            name: "TravelTimeID",
            kind: ParamKind::Integer,
            description: "Travel time route identifier",
        }],
        output: TRAVEL_TIME,
        sample: SampleParams::Literal(&[("TravelTimeID", "2")]),
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getMountainPassConditions",
        path_template: "MountainPassConditions/MountainPassConditionsREST.svc/GetMountainPassConditionsAsJson",
        description: "Road and weather conditions on mountain passes",
        params: &[],
        output: Schema::Array(&MOUNTAIN_PASS),
        sample: SampleParams::None,
        cache: CacheStrategy::Hourly,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getWeatherInformation",
        path_template: "WeatherInformation/WeatherInformationREST.svc/GetCurrentWeatherInformationAsJson",
        description: "Latest reading from every road weather station",
        params: &[],
        output: Schema::Array(&WEATHER_INFO),
        sample: SampleParams::None,
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getTollRates",
        path_template: "TollRates/TollRatesREST.svc/GetTollRatesAsJson",
        description: "Current toll for every tolled trip",
        params: &[],
        output: Schema::Array(&TOLL_RATE),
        sample: SampleParams::None,
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getBorderCrossings",
        path_template: "BorderCrossings/BorderCrossingsREST.svc/GetBorderCrossingsAsJson",
        description: "Wait times at Canadian border crossings",
        params: &[],
        output: Schema::Array(&BORDER_CROSSING),
        sample: SampleParams::None,
        cache: CacheStrategy::Minute,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getCommercialVehicleRestrictions",
        path_template: "CVRestrictions/CVRestrictionsREST.svc/GetCommercialVehicleRestrictionsAsJson",
        description: "Weight and size restrictions for commercial vehicles",
        params: &[],
        output: Schema::Array(&CV_RESTRICTION),
        sample: SampleParams::None,
        cache: CacheStrategy::Daily,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getBridgeClearances",
        path_template: "Bridges/ClearanceREST.svc/GetClearancesAsJson?Route={Route}",
        description: "Vertical clearances of bridges on a state route",
        params: &[ParamSpec {
            name: "Route",
            kind: ParamKind::String,
            description: "Three-digit state route, e.g. 005",
        }],
        output: Schema::Array(&BRIDGE_CLEARANCE),
        sample: SampleParams::Literal(&[("Route", "005")]),
        cache: CacheStrategy::Static,
    },
    Endpoint {
        api: ApiFamily::Wsdot,
        function_name: "getHighwayCameras",
        path_template: "HighwayCameras/HighwayCamerasREST.svc/GetCamerasAsJson",
        description: "Every highway camera and its image URL",
        params: &[],
        output: Schema::Array(&CAMERA),
        sample: SampleParams::None,
        cache: CacheStrategy::Daily,
    },
];
