//! HTTP-based `DistanceProvider` using OSRM's Route API.
//!
//! The [`DistanceProvider`] trait is synchronous so planners stay usable from
//! plain threads. This provider bridges the async HTTP call to the sync
//! interface by blocking on a Tokio runtime internally.

use std::time::Duration;

use geo::Coord;
use reqwest::Client;
use shopwalk_core::{DistanceError, DistanceProvider, Point};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::osrm::RouteResponse;

/// Error type for [`HttpDistanceProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "shopwalk-routing/0.1";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

/// Metres in a statute mile, as used to normalise OSRM distances.
pub const METRES_PER_MILE: f64 = 1609.34;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`HttpDistanceProvider`].
#[derive(Debug, Clone)]
pub struct HttpDistanceProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile segment of the URL, e.g. `"driving"`.
    pub profile: String,
    /// Connect and total request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpDistanceProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpDistanceProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-based distance provider using the OSRM Route API.
///
/// Owns a current-thread Tokio runtime reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider drives requests on its own runtime.
/// Inside a multi-threaded runtime (detected via [`Handle::try_current()`]
/// and [`RuntimeFlavor::MultiThread`]) it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics. Inside a
/// `current_thread` runtime it falls back to its own runtime, which blocks
/// the caller's executor for up to the configured timeout.
pub struct HttpDistanceProvider {
    client: Client,
    config: HttpDistanceProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpDistanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDistanceProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpDistanceProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpDistanceProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpDistanceProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The configuration this provider was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpDistanceProviderConfig {
        &self.config
    }

    /// Build the OSRM Route API URL for a single leg.
    ///
    /// The URL format is:
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=false`.
    fn build_route_url(&self, from: Point, to: Point) -> String {
        let from = Coord::from(from);
        let to = Coord::from(to);
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.x,
            from.y,
            to.x,
            to.y
        )
    }

    async fn fetch_distance_async(&self, url: &str) -> Result<f64, DistanceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        let route_response: RouteResponse =
            response
                .json()
                .await
                .map_err(|err| DistanceError::ParseError {
                    message: err.to_string(),
                })?;

        convert_response(route_response)
    }

    /// Convert a reqwest error to a `DistanceError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> DistanceError {
        if error.is_timeout() {
            return DistanceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return DistanceError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        DistanceError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Convert an OSRM response to a distance in miles.
#[expect(
    clippy::float_arithmetic,
    reason = "OSRM reports metres; planners work in miles"
)]
fn convert_response(response: RouteResponse) -> Result<f64, DistanceError> {
    if !response.is_ok() {
        return Err(DistanceError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let route = response
        .routes
        .first()
        .ok_or_else(|| DistanceError::ServiceError {
            code: "NoRoute".to_owned(),
            message: "OSRM response contained no routes".to_owned(),
        })?;

    if !route.distance.is_finite() || route.distance < 0.0 {
        return Err(DistanceError::ParseError {
            message: format!("OSRM returned an invalid distance: {}", route.distance),
        });
    }

    Ok(route.distance / METRES_PER_MILE)
}

impl DistanceProvider for HttpDistanceProvider {
    /// Fetch the driving distance between two points.
    ///
    /// Identical points cost nothing and never reach the network.
    fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError> {
        if from.key() == to.key() {
            return Ok(0.0);
        }

        let url = self.build_route_url(from, to);
        log::debug!("requesting driving distance from {url}");

        // block_in_place requires a multi-threaded runtime; for current_thread
        // runtimes we fall back to our own stored runtime.
        let future = self.fetch_distance_async(&url);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::osrm::RouteSummary;
    use rstest::{fixture, rstest};

    #[fixture]
    fn legs() -> (Point, Point) {
        (Point::new(51.5, -0.1), Point::new(51.6, -0.2))
    }

    fn ok_response(distance: f64) -> RouteResponse {
        RouteResponse {
            code: "Ok".to_owned(),
            message: None,
            routes: vec![RouteSummary { distance }],
        }
    }

    #[rstest]
    fn build_route_url_formats_coordinates(legs: (Point, Point)) {
        let provider =
            HttpDistanceProvider::new("http://osrm.example.com").expect("provider should build");

        let url = provider.build_route_url(legs.0, legs.1);

        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/driving/-0.1,51.5;-0.2,51.6?overview=false"
        );
    }

    #[rstest]
    fn build_route_url_uses_profile_and_strips_trailing_slash(legs: (Point, Point)) {
        let config = HttpDistanceProviderConfig::new("http://osrm.example.com/").with_profile("foot");
        let provider = HttpDistanceProvider::with_config(config).expect("provider should build");

        let url = provider.build_route_url(legs.0, legs.1);

        assert!(url.starts_with("http://osrm.example.com/route/v1/foot/"));
        assert!(!url.contains("//route"));
    }

    #[rstest]
    fn convert_response_normalises_metres_to_miles() {
        let miles = convert_response(ok_response(3218.68)).expect("should parse");
        assert!((miles - 2.0).abs() < 1e-9);
    }

    #[rstest]
    fn convert_response_handles_service_error() {
        let response = RouteResponse {
            code: "NoRoute".to_owned(),
            message: Some("Impossible route between points".to_owned()),
            routes: Vec::new(),
        };

        let err = convert_response(response).expect_err("should fail");

        match err {
            DistanceError::ServiceError { code, message } => {
                assert_eq!(code, "NoRoute");
                assert_eq!(message, "Impossible route between points");
            }
            other => panic!("expected ServiceError, got {other:?}"),
        }
    }

    #[rstest]
    fn convert_response_requires_a_route() {
        let response = RouteResponse {
            code: "Ok".to_owned(),
            message: None,
            routes: Vec::new(),
        };

        let err = convert_response(response).expect_err("should fail");

        assert!(matches!(err, DistanceError::ServiceError { .. }));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn convert_response_rejects_invalid_distances(#[case] distance: f64) {
        let err = convert_response(ok_response(distance)).expect_err("should fail");
        assert!(matches!(err, DistanceError::ParseError { .. }));
    }

    #[rstest]
    fn identical_points_cost_nothing_without_a_request() {
        // Port 9 (discard) is never contacted for a zero-length leg.
        let provider =
            HttpDistanceProvider::new("http://127.0.0.1:9").expect("provider should build");
        let point = Point::new(40.0, -74.0);

        assert_eq!(provider.distance(point, point), Ok(0.0));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpDistanceProviderConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0")
            .with_profile("cycling");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.profile, "cycling");
    }
}
