//! HTTP client for the Google Maps Platform web services.
//!
//! The API key is passed per call: it comes either from configuration or
//! from a cookie set by the page embedding the calculator.

use std::time::Duration;

use reqwest::{Client, Url};

use super::error::PlacesError;
use super::types::{
    AutocompleteEnvelope, DetailsEnvelope, DistanceMatrixEnvelope, DriveDistance, PlaceDetails,
    PlacePrediction,
};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";

const AUTOCOMPLETE_PATH: &str = "maps/api/place/autocomplete/json";
const DETAILS_PATH: &str = "maps/api/place/details/json";
const DISTANCE_MATRIX_PATH: &str = "maps/api/distancematrix/json";
const DETAILS_FIELDS: &str = "place_id,formatted_address,geometry,address_components";

pub struct GoogleMapsClient {
    client: Client,
    base_url: Url,
    region: String,
}

impl GoogleMapsClient {
    /// Creates a client pointed at the production Google endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, region: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(timeout_secs, region, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        region: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("fencequote/0.1")
            .build()?;

        // A trailing slash keeps `Url::join` from replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| PlacesError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            base_url,
            region: region.to_lowercase(),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Address suggestions for a partial input, restricted to the region.
    ///
    /// `ZERO_RESULTS` is returned as an empty list.
    ///
    /// # Errors
    ///
    /// [`PlacesError::Http`] on network failure or non-2xx status,
    /// [`PlacesError::Api`] when Google reports an error status.
    pub async fn autocomplete(
        &self,
        input: &str,
        api_key: &str,
    ) -> Result<Vec<PlacePrediction>, PlacesError> {
        let components = format!("country:{}", self.region);
        let url = self.endpoint(
            AUTOCOMPLETE_PATH,
            &[("input", input), ("components", &components), ("key", api_key)],
        )?;

        let envelope: AutocompleteEnvelope = self.get_json(url).await?;
        match envelope.status.as_str() {
            "OK" => Ok(envelope.predictions.into_iter().map(Into::into).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            _ => Err(api_error(envelope.status, envelope.error_message)),
        }
    }

    /// Full address and coordinates for a place id.
    ///
    /// # Errors
    ///
    /// [`PlacesError::Http`] on network failure or non-2xx status,
    /// [`PlacesError::Api`] when Google reports an error status or no result.
    pub async fn place_details(
        &self,
        place_id: &str,
        api_key: &str,
    ) -> Result<PlaceDetails, PlacesError> {
        let url = self.endpoint(
            DETAILS_PATH,
            &[("place_id", place_id), ("fields", DETAILS_FIELDS), ("key", api_key)],
        )?;

        let envelope: DetailsEnvelope = self.get_json(url).await?;
        match (envelope.status.as_str(), envelope.result) {
            ("OK", Some(raw)) => Ok(PlaceDetails::from_raw(place_id, raw)),
            (_, _) => Err(api_error(envelope.status, envelope.error_message)),
        }
    }

    /// Driving distance from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// [`PlacesError::Http`] on network failure or non-2xx status,
    /// [`PlacesError::Api`] when Google reports an error status,
    /// [`PlacesError::NoRoute`] when the element has no drivable route.
    pub async fn distance_matrix(
        &self,
        origin: &str,
        destination: &str,
        api_key: &str,
    ) -> Result<DriveDistance, PlacesError> {
        let url = self.endpoint(
            DISTANCE_MATRIX_PATH,
            &[
                ("origins", origin),
                ("destinations", destination),
                ("mode", "driving"),
                ("units", "metric"),
                ("region", &self.region),
                ("key", api_key),
            ],
        )?;

        let envelope: DistanceMatrixEnvelope = self.get_json(url).await?;
        if envelope.status != "OK" {
            return Err(api_error(envelope.status, envelope.error_message));
        }

        let element = envelope
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| PlacesError::NoRoute(destination.to_string()))?;

        match (element.status.as_str(), element.distance) {
            ("OK", Some(distance)) => Ok(DriveDistance {
                distance_meters: distance.value,
                duration_seconds: element.duration.map(|d| d.value),
            }),
            _ => Err(PlacesError::NoRoute(destination.to_string())),
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|_| PlacesError::InvalidBaseUrl(self.base_url.to_string()))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, PlacesError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

fn api_error(status: String, message: Option<String>) -> PlacesError {
    PlacesError::Api {
        status,
        message: message.unwrap_or_default(),
    }
}
