//! Google Maps Platform wire types and the trimmed shapes handed to the web
//! client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct AutocompleteEnvelope {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<RawPrediction>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPrediction {
    pub description: String,
    pub place_id: String,
    #[serde(default)]
    pub structured_formatting: Option<StructuredFormatting>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StructuredFormatting {
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsEnvelope {
    pub status: String,
    #[serde(default)]
    pub result: Option<RawPlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    pub formatted_address: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DistanceMatrixEnvelope {
    pub status: String,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatrixElement {
    pub status: String,
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextValue {
    pub value: u64,
}

/// Autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePrediction {
    pub description: String,
    pub place_id: String,
    pub main_text: String,
    pub secondary_text: Option<String>,
}

impl From<RawPrediction> for PlacePrediction {
    fn from(raw: RawPrediction) -> Self {
        let (main_text, secondary_text) = match raw.structured_formatting {
            Some(fmt) => (fmt.main_text, fmt.secondary_text),
            None => (raw.description.clone(), None),
        };
        Self {
            description: raw.description,
            place_id: raw.place_id,
            main_text,
            secondary_text,
        }
    }
}

/// Resolved place
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub place_id: String,
    pub formatted_address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub suburb: Option<String>,
    pub postcode: Option<String>,
}

impl PlaceDetails {
    pub(crate) fn from_raw(requested_id: &str, raw: RawPlace) -> Self {
        let component = |kind: &str| {
            raw.address_components
                .iter()
                .find(|c| c.types.iter().any(|t| t == kind))
                .map(|c| c.long_name.clone())
        };
        let suburb = component("locality");
        let postcode = component("postal_code");
        let (lat, lng) = match &raw.geometry {
            Some(g) => (Some(g.location.lat), Some(g.location.lng)),
            None => (None, None),
        };

        Self {
            place_id: raw.place_id.unwrap_or_else(|| requested_id.to_string()),
            formatted_address: raw.formatted_address,
            lat,
            lng,
            suburb,
            postcode,
        }
    }
}

/// Driving distance between two places
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveDistance {
    pub distance_meters: u64,
    pub duration_seconds: Option<u64>,
}

impl DriveDistance {
    /// Kilometres rounded to one decimal place
    pub fn distance_km(&self) -> f64 {
        (self.distance_meters as f64 / 100.0).round() / 10.0
    }
}
