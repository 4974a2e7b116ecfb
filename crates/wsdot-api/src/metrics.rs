//! Request counters exported through the global OpenTelemetry meter.

use std::sync::LazyLock;

use opentelemetry::KeyValue;
use opentelemetry::metrics::Counter;

static REQUESTS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    opentelemetry::global::meter("wsdot-api")
        .u64_counter("wsdot.api.requests")
        .with_description("Completed upstream requests by endpoint and outcome")
        .build()
});

/// Counts one finished request. `outcome` is `ok` or `error`.
pub(crate) fn record_request(endpoint: &'static str, outcome: &'static str) {
    REQUESTS.add(
        1,
        &[
            KeyValue::new("endpoint", endpoint),
            KeyValue::new("outcome", outcome),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_provider_is_noop() {
        // Arrange & Act & Assert: the global no-op meter accepts records.
        record_request("getVesselLocations", "ok");
        record_request("getVesselLocations", "error");
    }
}
