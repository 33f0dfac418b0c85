//! Organisation DTOs

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{BrandDraft, ChargingStationOperatorDraft, DataLicense, DomainError, DomainResult, I18NText};
use crate::interfaces::http::common::{parse_all, EntityFields};

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargingStationOperatorRequest {
    #[serde(flatten)]
    pub fields: EntityFields,
    #[validate(url(message = "Invalid homepage URL!"))]
    pub homepage: Option<String>,
    /// License ids such as `ODbL`
    #[serde(default)]
    pub data_licenses: Vec<String>,
}

impl CreateChargingStationOperatorRequest {
    pub fn into_draft(self) -> DomainResult<ChargingStationOperatorDraft> {
        Ok(ChargingStationOperatorDraft {
            data_licenses: parse_all(&self.data_licenses, DataLicense::parse)?,
            entity: self.fields.into_draft("charging station operator")?,
            homepage: self.homepage,
        })
    }
}

/// Body for grid operators, parking operators and smart cities
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganisationRequest {
    #[serde(flatten)]
    pub fields: EntityFields,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    /// Language code → text
    #[schema(value_type = Option<Object>)]
    pub name: Option<Value>,
    #[validate(url(message = "Invalid logo URL!"))]
    pub logo: Option<String>,
    #[validate(url(message = "Invalid homepage URL!"))]
    pub homepage: Option<String>,
}

impl CreateBrandRequest {
    pub fn into_draft(self) -> DomainResult<BrandDraft> {
        let name = match &self.name {
            Some(name) => I18NText::from_json(name).ok_or_else(|| DomainError::validation("Invalid brand name!"))?,
            None => I18NText::new(),
        };
        Ok(BrandDraft {
            name,
            logo: self.logo,
            homepage: self.homepage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::http::common::parse_body;

    #[test]
    fn operator_body_flattens_entity_fields() {
        let body: CreateChargingStationOperatorRequest = parse_body(
            br#"{"name": {"de": "GraphDefined"}, "homepage": "https://example.org", "dataLicenses": ["ODbL"]}"#,
        )
        .unwrap();
        let draft = body.into_draft().unwrap();
        assert_eq!(draft.entity.name.get("de"), Some("GraphDefined"));
        assert_eq!(draft.data_licenses, vec![DataLicense::OpenDatabaseLicense]);
        assert_eq!(draft.homepage.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn unknown_license_is_rejected() {
        let body: CreateChargingStationOperatorRequest = parse_body(br#"{"dataLicenses": ["WTFPL"]}"#).unwrap();
        assert_eq!(body.into_draft().unwrap_err(), DomainError::validation("Unknown data license!"));
    }

    #[test]
    fn malformed_homepage_fails_validation() {
        let result = parse_body::<CreateChargingStationOperatorRequest>(br#"{"homepage": "not a url"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn brand_name_must_be_an_object() {
        let body: CreateBrandRequest = parse_body(br#"{"name": "Fast"}"#).unwrap();
        assert_eq!(body.into_draft().unwrap_err(), DomainError::validation("Invalid brand name!"));
    }
}
