//! Request fields every entity creation body may carry

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{AdminStatus, EntityDraft, GeoCoordinate, I18NText, OperationalStatus};
use crate::support::errors::{DomainError, DomainResult};

/// `{"lat": .., "lng": .., "alt": ..}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct GeoLocationDto {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
}

/// Response of `COUNT`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityFields {
    /// Language code → text
    #[schema(value_type = Option<Object>)]
    pub name: Option<Value>,
    /// Language code → text
    #[schema(value_type = Option<Object>)]
    pub description: Option<Value>,
    pub geo_location: Option<GeoLocationDto>,
    pub admin_status: Option<String>,
    pub status: Option<String>,
}

impl EntityFields {
    /// Check and convert; `label` names the entity in error messages
    /// ("Invalid charging pool name!").
    pub fn into_draft(self, label: &str) -> DomainResult<EntityDraft> {
        let mut draft = EntityDraft::default();
        if let Some(name) = &self.name {
            draft.name = I18NText::from_json(name)
                .ok_or_else(|| DomainError::validation(format!("Invalid {} name!", label)))?;
        }
        if let Some(description) = &self.description {
            draft.description = I18NText::from_json(description)
                .ok_or_else(|| DomainError::validation(format!("Invalid {} description!", label)))?;
        }
        if let Some(location) = self.geo_location {
            let coordinate = GeoCoordinate::new(location.lat, location.lng)?;
            draft.coordinate = Some(match location.alt {
                Some(alt) => coordinate.with_altitude(alt),
                None => coordinate,
            });
        }
        draft.admin_status = self.admin_status.as_deref().map(AdminStatus::parse).transpose()?;
        draft.status = self.status.as_deref().map(OperationalStatus::parse).transpose()?;
        Ok(draft)
    }
}

/// Parse a list of textual ids with the given parser
pub fn parse_all<T>(texts: &[String], parse: impl Fn(&str) -> DomainResult<T>) -> DomainResult<Vec<T>> {
    texts.iter().map(|text| parse(text)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_name_is_rejected_with_label() {
        let fields = EntityFields {
            name: Some(json!("plain")),
            ..Default::default()
        };
        assert_eq!(
            fields.into_draft("charging pool").unwrap_err(),
            DomainError::validation("Invalid charging pool name!")
        );
    }

    #[test]
    fn statuses_and_location_are_converted() {
        let fields: EntityFields = serde_json::from_value(json!({
            "description": {"en": "Car park"},
            "geoLocation": {"lat": 49.73, "lng": 10.14},
            "adminStatus": "Operational",
            "status": "Available",
        }))
        .unwrap();
        let draft = fields.into_draft("charging pool").unwrap();
        assert_eq!(draft.description.get("en"), Some("Car park"));
        assert_eq!(draft.coordinate.map(|c| c.longitude), Some(10.14));
        assert_eq!(draft.admin_status, Some(AdminStatus::Operational));
        assert_eq!(draft.status, Some(OperationalStatus::Available));
    }

    #[test]
    fn out_of_range_location_is_rejected() {
        let fields = EntityFields {
            geo_location: Some(GeoLocationDto {
                lat: 120.0,
                lng: 0.0,
                alt: None,
            }),
            ..Default::default()
        };
        assert!(fields.into_draft("charging pool").is_err());
    }
}
