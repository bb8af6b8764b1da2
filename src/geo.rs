/// Coordinates and geolocation.
///
/// This module handles:
/// - The coordinate pair captured by the sighting form (4-decimal
///   precision, "unset" modelled as `Option::None`)
/// - The device-position lookup used to center the map on first mount
/// - Optional reverse geocoding of sightings into place labels

use serde::Deserialize;

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    /// Round to 4 decimal places, the precision the sighting form
    /// captures and submits.
    pub fn rounded(self) -> Self {
        Coordinates {
            latitude: round4(self.latitude),
            longitude: round4(self.longitude),
        }
    }

    /// Plain textual form, e.g. `43.3438, 17.8078`.
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Where the position lookup asks. Desktop stand-in for browser
/// geolocation: approximate the device position from its public IP.
const GEOLOCATE_URL: &str = "https://ipapi.co/json/";

#[derive(Debug, Clone, Deserialize)]
struct IpLocation {
    latitude: f64,
    longitude: f64,
}

/// Look up the current position.
///
/// Failure is non-fatal by contract: the caller keeps its "unset"
/// coordinates and reports the error to the console only.
pub async fn current_position(http: &reqwest::Client) -> Result<Coordinates, String> {
    let response = http
        .get(GEOLOCATE_URL)
        .send()
        .await
        .map_err(|e| format!("geolocation request failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!(
            "geolocation service answered {}",
            response.status()
        ));
    }

    let location: IpLocation = response
        .json()
        .await
        .map_err(|e| format!("geolocation response unreadable: {e}"))?;

    Ok(Coordinates::new(location.latitude, location.longitude))
}

const OPENCAGE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Compile-time OpenCage key; reverse geocoding is skipped without one.
const OPENCAGE_KEY: Option<&str> = option_env!("FLOWRSPOT_OPENCAGE_KEY");

#[derive(Debug, Clone, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeocodeResult {
    components: GeocodeComponents,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GeocodeComponents {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl GeocodeComponents {
    fn place(&self) -> Option<String> {
        let locality = self
            .city
            .as_ref()
            .or(self.town.as_ref())
            .or(self.village.as_ref());

        match (locality, &self.country) {
            (Some(locality), Some(country)) => Some(format!("{locality}, {country}")),
            (Some(locality), None) => Some(locality.clone()),
            (None, Some(country)) => Some(country.clone()),
            (None, None) => None,
        }
    }
}

/// Resolve a human-readable place label for a coordinate pair, falling
/// back to the plain coordinate text when no key is compiled in, nothing
/// matches, or the lookup fails.
pub async fn place_label(http: &reqwest::Client, coords: Coordinates) -> String {
    let Some(key) = OPENCAGE_KEY else {
        return coords.label();
    };

    match reverse_geocode(http, coords, key).await {
        Ok(Some(place)) => place,
        Ok(None) => coords.label(),
        Err(err) => {
            eprintln!("⚠️  Reverse geocoding failed: {err}");
            coords.label()
        }
    }
}

async fn reverse_geocode(
    http: &reqwest::Client,
    coords: Coordinates,
    key: &str,
) -> Result<Option<String>, String> {
    let response = http
        .get(OPENCAGE_URL)
        .query(&[
            ("q", format!("{}+{}", coords.latitude, coords.longitude)),
            ("key", key.to_string()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("geocoder answered {}", response.status()));
    }

    let decoded: GeocodeResponse = response.json().await.map_err(|e| e.to_string())?;
    Ok(decoded
        .results
        .into_iter()
        .next()
        .and_then(|result| result.components.place()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_four_decimal_places() {
        let coords = Coordinates::new(43.343843, 17.807843).rounded();
        assert_eq!(coords, Coordinates::new(43.3438, 17.8078));

        let negative = Coordinates::new(-33.86785, 151.20732).rounded();
        assert_eq!(negative, Coordinates::new(-33.8679, 151.2073));
    }

    #[test]
    fn label_prints_four_decimals() {
        let coords = Coordinates::new(43.3438, 17.8078);
        assert_eq!(coords.label(), "43.3438, 17.8078");
    }

    #[test]
    fn place_prefers_city_then_town_then_village() {
        let components = GeocodeComponents {
            city: None,
            town: Some("Blagaj".into()),
            village: Some("Unused".into()),
            country: Some("Bosnia and Herzegovina".into()),
        };
        assert_eq!(
            components.place(),
            Some("Blagaj, Bosnia and Herzegovina".into())
        );
    }

    #[test]
    fn place_is_none_without_components() {
        assert_eq!(GeocodeComponents::default().place(), None);
    }
}
