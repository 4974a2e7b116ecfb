//! Static endpoint registry.
//!
//! One table per API family. The tables drive the generic client call, the
//! OpenAPI generator and the CLI.

pub mod wsdot;
pub mod wsf;

use crate::endpoint::{ApiFamily, Endpoint};

/// Returns the endpoints of `family`.
#[must_use]
pub const fn endpoints_for(family: ApiFamily) -> &'static [Endpoint] {
    match family {
        ApiFamily::Wsdot => wsdot::ENDPOINTS,
        ApiFamily::Wsf => wsf::ENDPOINTS,
    }
}

/// Iterates every registered endpoint, WSDOT first.
pub fn all_endpoints() -> impl Iterator<Item = &'static Endpoint> {
    ApiFamily::ALL
        .into_iter()
        .flat_map(|family| endpoints_for(family).iter())
}

/// Looks up an endpoint by function name (case-sensitive).
#[must_use]
pub fn find_endpoint(function_name: &str) -> Option<&'static Endpoint> {
    all_endpoints().find(|e| e.function_name == function_name)
}
