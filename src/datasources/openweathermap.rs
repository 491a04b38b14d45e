use super::gateway::{GatewayError, ProviderRequest};
use crate::config::OpenWeatherMapConfig;
use crate::error::{ParaweroError, Result};
use crate::models::RawForecastPayload;
use serde::{Deserialize, Serialize};

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

/// Geocoding API match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
}

impl GeoLocation {
    /// "Name, Country", or just the name when the country is unknown
    pub fn display_name(&self) -> String {
        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// Coordinates rendered as a place label of last resort
pub fn coordinates_label(lat: f64, lon: f64) -> String {
    format!("{:.2}, {:.2}", lat, lon)
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the hourly/daily forecast for a location
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<RawForecastPayload> {
        let request = ProviderRequest::weather(lat, lon, &self.config.exclude);
        let value = self.forward(&request).await?;
        RawForecastPayload::from_value(value)
    }

    /// Resolve a city name to its first geocoding match
    pub async fn geocode(&self, city: &str) -> Result<GeoLocation> {
        let value = self.forward(&ProviderRequest::geo_direct(city)).await?;
        let matches: Vec<GeoLocation> = serde_json::from_value(value)?;
        matches
            .into_iter()
            .next()
            .ok_or_else(|| ParaweroError::NotFound(format!("no city named '{}'", city)))
    }

    /// Human-readable label for coordinates; never fails
    pub async fn location_label(&self, lat: f64, lon: f64) -> String {
        match self.forward(&ProviderRequest::geo_reverse(lat, lon)).await {
            Ok(value) => serde_json::from_value::<Vec<GeoLocation>>(value)
                .ok()
                .and_then(|matches| matches.into_iter().next())
                .map(|location| location.display_name())
                .unwrap_or_else(|| coordinates_label(lat, lon)),
            Err(e) => {
                tracing::warn!("Reverse geocoding failed, using coordinates: {}", e);
                coordinates_label(lat, lon)
            }
        }
    }

    /// Test connection to the geocoding API with the configured coordinates
    pub async fn test_connection(&self) -> Result<bool> {
        let request = ProviderRequest::geo_reverse(self.config.latitude, self.config.longitude);
        let url = request.url(&self.config.api_key)?;

        let response = self.client.get(&url).send().await.map_err(|e| {
            ParaweroError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
        })?;

        Ok(response.status().is_success())
    }

    /// Send a provider request and return its JSON body unchanged
    pub async fn forward(&self, request: &ProviderRequest) -> Result<serde_json::Value> {
        let url = request.url(&self.config.api_key)?;
        tracing::debug!(endpoint = request.endpoint(), "Calling OpenWeatherMap");

        let response = self.client.get(&url).send().await.map_err(|e| {
            ParaweroError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::upstream(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            )
            .into());
        }

        Ok(response.json().await?)
    }
}
