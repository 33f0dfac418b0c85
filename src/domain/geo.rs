//! Geographical coordinates

use serde::{Deserialize, Serialize};

use crate::support::errors::DomainError;

/// Geodetic reference model of a coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GravitationalModel {
    #[default]
    WGS84,
    ETRS89,
}

/// A physical location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub model: GravitationalModel,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let coordinate = Self {
            latitude,
            longitude,
            altitude: None,
            model: GravitationalModel::default(),
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DomainError::validation("Invalid latitude!"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DomainError::validation("Invalid longitude!"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(GeoCoordinate::new(49.7, 10.1).is_ok());
        assert!(GeoCoordinate::new(91.0, 10.1).is_err());
        assert!(GeoCoordinate::new(49.7, -181.0).is_err());
    }
}
