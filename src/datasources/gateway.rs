use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ONE_CALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";
const GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";
const DEFAULT_EXCLUDE: &str = "minutely,alerts";

/// Structured failure returned to gateway callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayError {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
}

impl GatewayError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: 400,
            error: error.into(),
        }
    }

    pub fn missing_api_key() -> Self {
        Self {
            status: 500,
            error: "API key not configured".into(),
        }
    }

    pub fn upstream(status: u16, reason: &str) -> Self {
        Self {
            status,
            error: format!("OpenWeatherMap API error: {} {}", status, reason),
        }
    }

    /// JSON body, `{"error": "..."}`
    pub fn body(&self) -> String {
        serde_json::json!({ "error": self.error }).to_string()
    }
}

/// A provider call the gateway knows how to forward
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderRequest {
    Weather {
        lat: String,
        lon: String,
        exclude: String,
    },
    GeoReverse {
        lat: String,
        lon: String,
    },
    GeoDirect {
        q: String,
    },
}

impl ProviderRequest {
    pub fn weather(lat: f64, lon: f64, exclude: &str) -> Self {
        ProviderRequest::Weather {
            lat: lat.to_string(),
            lon: lon.to_string(),
            exclude: exclude.to_string(),
        }
    }

    pub fn geo_reverse(lat: f64, lon: f64) -> Self {
        ProviderRequest::GeoReverse {
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    pub fn geo_direct(q: impl Into<String>) -> Self {
        ProviderRequest::GeoDirect { q: q.into() }
    }

    /// Parse `{endpoint, lat, lon}` or `{endpoint, q}` query parameters
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, GatewayError> {
        let param = |name: &str| {
            params
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let endpoint = param("endpoint")
            .ok_or_else(|| GatewayError::bad_request("Missing endpoint parameter"))?;

        match endpoint.as_str() {
            "weather" => match (param("lat"), param("lon")) {
                (Some(lat), Some(lon)) => Ok(ProviderRequest::Weather {
                    lat,
                    lon,
                    exclude: param("exclude").unwrap_or_else(|| DEFAULT_EXCLUDE.to_string()),
                }),
                _ => Err(GatewayError::bad_request(
                    "Missing lat and/or lon parameters for the weather endpoint",
                )),
            },
            "geo-reverse" => match (param("lat"), param("lon")) {
                (Some(lat), Some(lon)) => Ok(ProviderRequest::GeoReverse { lat, lon }),
                _ => Err(GatewayError::bad_request(
                    "Missing lat and/or lon parameters for the geo-reverse endpoint",
                )),
            },
            "geo-direct" => param("q")
                .map(|q| ProviderRequest::GeoDirect { q })
                .ok_or_else(|| {
                    GatewayError::bad_request("Missing q (city) parameter for the geo-direct endpoint")
                }),
            _ => Err(GatewayError::bad_request("Invalid endpoint")),
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ProviderRequest::Weather { .. } => "weather",
            ProviderRequest::GeoReverse { .. } => "geo-reverse",
            ProviderRequest::GeoDirect { .. } => "geo-direct",
        }
    }

    /// Provider URL for this request, credentials included
    pub fn url(&self, api_key: &str) -> Result<String, GatewayError> {
        if api_key.is_empty() {
            return Err(GatewayError::missing_api_key());
        }

        let (base, mut query): (String, Vec<(&str, &str)>) = match self {
            ProviderRequest::Weather { lat, lon, exclude } => (
                ONE_CALL_URL.to_string(),
                vec![
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("units", "metric"),
                    ("exclude", exclude.as_str()),
                ],
            ),
            ProviderRequest::GeoReverse { lat, lon } => (
                format!("{}/reverse", GEO_BASE_URL),
                vec![("lat", lat.as_str()), ("lon", lon.as_str()), ("limit", "1")],
            ),
            ProviderRequest::GeoDirect { q } => (
                format!("{}/direct", GEO_BASE_URL),
                vec![("q", q.as_str()), ("limit", "1")],
            ),
        };
        query.push(("appid", api_key));

        reqwest::Url::parse_with_params(&base, &query)
            .map(|url| url.to_string())
            .map_err(|e| GatewayError {
                status: 500,
                error: format!("Invalid provider URL: {}", e),
            })
    }
}
