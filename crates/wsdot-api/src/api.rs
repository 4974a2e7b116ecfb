//! `WsdotApi` trait definition.
#![allow(clippy::future_not_send)]

use chrono::{DateTime, Utc};

use crate::client::WsdotClient;
use crate::endpoint::Params;
use crate::error::{Error, Result};
use crate::fetch::LocalFetchStrategy;
use crate::models::{HighwayAlert, TravelTime, ValidDateRange, VesselLocation};
use crate::registry::find_endpoint;

/// Typed access to the most commonly used endpoints.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(WsdotApi: Send)]
pub trait LocalWsdotApi {
    /// Fetches every active highway alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request, normalization or decoding fails.
    async fn highway_alerts(&self) -> Result<Vec<HighwayAlert>>;

    /// Fetches every travel-time route.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request, normalization or decoding fails.
    async fn travel_times(&self) -> Result<Vec<TravelTime>>;

    /// Fetches the position of every vessel.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request, normalization or decoding fails.
    async fn vessel_locations(&self) -> Result<Vec<VesselLocation>>;

    /// Fetches the date range covered by published ferry schedules.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request, normalization or decoding fails.
    async fn schedule_valid_date_range(&self) -> Result<ValidDateRange>;

    /// Fetches when static vessel data last changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request, normalization or decoding fails.
    async fn vessels_cache_flush_date(&self) -> Result<DateTime<Utc>>;
}

impl<F: LocalFetchStrategy + Sync> WsdotClient<F> {
    async fn fetch_registered<T: serde::de::DeserializeOwned>(
        &self,
        function_name: &str,
    ) -> Result<T> {
        let endpoint = find_endpoint(function_name)
            .ok_or_else(|| Error::UnknownEndpoint(String::from(function_name)))?;
        self.fetch_as(endpoint, &Params::new()).await
    }
}

impl<F: LocalFetchStrategy + Sync> LocalWsdotApi for WsdotClient<F> {
    async fn highway_alerts(&self) -> Result<Vec<HighwayAlert>> {
        self.fetch_registered("getHighwayAlerts").await
    }

    async fn travel_times(&self) -> Result<Vec<TravelTime>> {
        self.fetch_registered("getTravelTimes").await
    }

    async fn vessel_locations(&self) -> Result<Vec<VesselLocation>> {
        self.fetch_registered("getVesselLocations").await
    }

    async fn schedule_valid_date_range(&self) -> Result<ValidDateRange> {
        self.fetch_registered("getScheduleValidDateRange").await
    }

    async fn vessels_cache_flush_date(&self) -> Result<DateTime<Utc>> {
        self.fetch_registered("getVesselsCacheFlushDate").await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use url::Url;

    use super::*;
    use crate::config::ClientConfig;
    use crate::endpoint::ApiFamily;
    use crate::error::ApiError;

    /// Serves canned bodies keyed by URL path suffix.
    #[derive(Debug)]
    struct StubFetch(&'static [(&'static str, &'static str)]);

    impl LocalFetchStrategy for StubFetch {
        async fn fetch_text(&self, endpoint: &str, url: &Url) -> Result<String, ApiError> {
            self.0
                .iter()
                .find(|(suffix, _)| url.path().ends_with(suffix))
                .map(|(_, body)| String::from(*body))
                .ok_or_else(|| {
                    ApiError::new(crate::error::ErrorKind::Api, endpoint, url, "no stub")
                        .with_status(404)
                })
        }
    }

    fn stub_client(routes: &'static [(&'static str, &'static str)]) -> WsdotClient<StubFetch> {
        let config = ClientConfig::new("stub").unwrap();
        WsdotClient::with_fetcher(config, StubFetch(routes))
    }

    #[tokio::test]
    async fn test_highway_alerts() {
        // Arrange
        let client = stub_client(&[(
            "GetAlertsAsJson",
            include_str!("../../../fixtures/wsdot/highway_alerts.json"),
        )]);

        // Act
        let alerts = client.highway_alerts().await.unwrap();

        // Assert
        assert_eq!(alerts.len(), 2);
    }

    #[tokio::test]
    async fn test_travel_times() {
        // Arrange
        let client = stub_client(&[(
            "GetTravelTimesAsJson",
            include_str!("../../../fixtures/wsdot/travel_times.json"),
        )]);

        // Act
        let times = client.travel_times().await.unwrap();

        // Assert
        assert!(times.iter().all(|t| t.current_time > 0));
    }

    #[tokio::test]
    async fn test_vessel_locations() {
        // Arrange
        let client = stub_client(&[(
            "vessellocations",
            include_str!("../../../fixtures/wsf/vessel_locations.json"),
        )]);

        // Act
        let vessels = client.vessel_locations().await.unwrap();

        // Assert
        assert_eq!(vessels.len(), 2);
    }

    #[tokio::test]
    async fn test_schedule_valid_date_range() {
        // Arrange
        let client = stub_client(&[(
            "validdaterange",
            include_str!("../../../fixtures/wsf/schedule_valid_date_range.json"),
        )]);

        // Act
        let range = client.schedule_valid_date_range().await.unwrap();

        // Assert
        assert!(range.date_from < range.date_thru);
    }

    #[tokio::test]
    async fn test_vessels_cache_flush_date() {
        // Arrange
        let client = stub_client(&[("cacheflushdate", r#""\/Date(1734624000000-0800)\/""#)]);

        // Act
        let flushed = client.vessels_cache_flush_date().await.unwrap();

        // Assert
        assert_eq!(flushed.timestamp_millis(), 1_734_624_000_000);
    }

    #[tokio::test]
    async fn test_stub_error_propagates() {
        // Arrange
        let client = stub_client(&[]);

        // Act
        let err = client.vessel_locations().await.unwrap_err();

        // Assert
        assert_eq!(err.kind(), Some(crate::error::ErrorKind::Api));
        assert_eq!(
            client.config().base_url(ApiFamily::Wsf).host_str(),
            Some("www.wsdot.wa.gov")
        );
    }
}
