//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use reqwest::Error as HttpError;
use tunewire_domain::TuneWireError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TuneWireError);

impl From<InfraError> for TuneWireError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TuneWireError> for InfraError {
    fn from(value: TuneWireError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTuneWireError {
    fn into_tunewire(self) -> TuneWireError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TuneWireError */
/* -------------------------------------------------------------------------- */

impl IntoTuneWireError for HttpError {
    fn into_tunewire(self) -> TuneWireError {
        if self.is_timeout() {
            return TuneWireError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return TuneWireError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return TuneWireError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => TuneWireError::Auth(message),
                404 => TuneWireError::NotFound(message),
                400..=499 => TuneWireError::InvalidInput(message),
                _ => TuneWireError::Network(message),
            };
        }

        TuneWireError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_tunewire())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TuneWireError */
/* -------------------------------------------------------------------------- */

impl IntoTuneWireError for IoError {
    fn into_tunewire(self) -> TuneWireError {
        match self.kind() {
            ErrorKind::NotFound => TuneWireError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                TuneWireError::Storage(format!("permission denied: {self}"))
            }
            _ => TuneWireError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_tunewire())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → TuneWireError */
/* -------------------------------------------------------------------------- */

impl IntoTuneWireError for serde_json::Error {
    fn into_tunewire(self) -> TuneWireError {
        TuneWireError::Config(format!("Invalid JSON format: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_tunewire())
    }
}

impl IntoTuneWireError for toml::de::Error {
    fn into_tunewire(self) -> TuneWireError {
        TuneWireError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_tunewire())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = IoError::new(ErrorKind::NotFound, "missing");
        let mapped: TuneWireError = InfraError::from(err).into();
        assert!(matches!(mapped, TuneWireError::NotFound(_)), "got {mapped:?}");
    }

    #[test]
    fn other_io_errors_map_to_storage() {
        let err = IoError::new(ErrorKind::PermissionDenied, "read-only");
        let mapped: TuneWireError = InfraError::from(err).into();
        match mapped {
            TuneWireError::Storage(msg) => assert!(msg.contains("permission denied")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn parse_errors_map_to_config() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: TuneWireError = InfraError::from(json_err).into();
        assert!(matches!(mapped, TuneWireError::Config(msg) if msg.starts_with("Invalid JSON")));

        let toml_err = toml::from_str::<toml::Table>("a = ").unwrap_err();
        let mapped: TuneWireError = InfraError::from(toml_err).into();
        assert!(matches!(mapped, TuneWireError::Config(msg) if msg.starts_with("Invalid TOML")));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: TuneWireError = InfraError::from(error).into();
        match mapped {
            TuneWireError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get("http://127.0.0.1:9/").send().await.unwrap_err();

        let mapped: TuneWireError = InfraError::from(error).into();
        assert!(matches!(mapped, TuneWireError::Network(_)), "got {mapped:?}");
    }
}
