//! Google Maps Platform integration: place autocomplete, place details and
//! driving distance.

pub mod client;
pub mod error;
pub mod types;

pub use client::GoogleMapsClient;
pub use error::PlacesError;
pub use types::{DriveDistance, PlaceDetails, PlacePrediction};
