//! Infrastructure DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{
    BrandId, ChargingPoolDraft, ChargingPoolId, ChargingStationDraft, ChargingStationId, DataLicense, DomainError,
    DomainResult, EntityDraft, EvseDraft, PlugType, SocketOutletDraft, SocketOutletId,
};
use crate::interfaces::http::common::{parse_all, EntityFields};

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargingPoolRequest {
    #[serde(flatten)]
    pub fields: EntityFields,
    #[validate(length(min = 1, message = "Invalid address!"))]
    pub address: Option<String>,
    #[serde(default)]
    pub brand_ids: Vec<String>,
    #[serde(default)]
    pub data_licenses: Vec<String>,
    /// kW
    #[schema(value_type = Option<String>)]
    pub max_power: Option<Decimal>,
}

impl CreateChargingPoolRequest {
    pub fn into_draft(self) -> DomainResult<ChargingPoolDraft> {
        Ok(ChargingPoolDraft {
            entity: self.fields.into_draft("charging pool")?,
            address: self.address,
            brand_ids: parse_all(&self.brand_ids, BrandId::parse)?,
            data_licenses: parse_all(&self.data_licenses, DataLicense::parse)?,
            max_power: quantity(self.max_power, "maxPower")?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargingStationRequest {
    #[serde(flatten)]
    pub fields: EntityFields,
    pub charging_pool_id: String,
    #[serde(default)]
    pub brand_ids: Vec<String>,
    /// kW
    #[schema(value_type = Option<String>)]
    pub max_power: Option<Decimal>,
}

impl CreateChargingStationRequest {
    /// Parent pool id plus the station draft
    pub fn into_draft(self) -> DomainResult<(ChargingPoolId, ChargingStationDraft)> {
        let pool_id = ChargingPoolId::parse(&self.charging_pool_id)?;
        let draft = ChargingStationDraft {
            entity: self.fields.into_draft("charging station")?,
            brand_ids: parse_all(&self.brand_ids, BrandId::parse)?,
            max_power: quantity(self.max_power, "maxPower")?,
        };
        Ok((pool_id, draft))
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocketOutletRequest {
    /// 1-based position within the EVSE
    pub id: u32,
    /// e.g. `Type2Outlet`
    pub plug: Option<String>,
    pub cable_attached: Option<bool>,
    /// m
    #[schema(value_type = Option<String>)]
    pub cable_length: Option<Decimal>,
}

impl SocketOutletRequest {
    fn into_draft(self) -> DomainResult<(SocketOutletId, SocketOutletDraft)> {
        let id = SocketOutletId::new(self.id)?;
        let draft = SocketOutletDraft {
            entity: EntityDraft::default(),
            plug: self
                .plug
                .as_deref()
                .map(PlugType::parse)
                .transpose()?
                .unwrap_or(PlugType::Unspecified),
            cable_attached: self.cable_attached,
            cable_length: quantity(self.cable_length, "cableLength")?,
        };
        Ok((id, draft))
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvseRequest {
    #[serde(flatten)]
    pub fields: EntityFields,
    pub charging_station_id: String,
    #[serde(default)]
    pub brand_ids: Vec<String>,
    /// V
    #[schema(value_type = Option<String>)]
    pub max_voltage: Option<Decimal>,
    /// A
    #[schema(value_type = Option<String>)]
    pub max_current: Option<Decimal>,
    /// kW
    #[schema(value_type = Option<String>)]
    pub max_power: Option<Decimal>,
    /// kWh
    #[schema(value_type = Option<String>)]
    pub max_capacity: Option<Decimal>,
    #[serde(default)]
    pub socket_outlets: Vec<SocketOutletRequest>,
}

impl CreateEvseRequest {
    /// Parent station id plus the EVSE draft, outlets included
    pub fn into_draft(self) -> DomainResult<(ChargingStationId, EvseDraft)> {
        let station_id = ChargingStationId::parse(&self.charging_station_id)?;
        let socket_outlets = self
            .socket_outlets
            .into_iter()
            .map(SocketOutletRequest::into_draft)
            .collect::<DomainResult<Vec<_>>>()?;

        let draft = EvseDraft {
            entity: self.fields.into_draft("EVSE")?,
            brand_ids: parse_all(&self.brand_ids, BrandId::parse)?,
            max_voltage: quantity(self.max_voltage, "maxVoltage")?,
            max_current: quantity(self.max_current, "maxCurrent")?,
            max_power: quantity(self.max_power, "maxPower")?,
            max_capacity: quantity(self.max_capacity, "maxCapacity")?,
            socket_outlets,
        };
        Ok((station_id, draft))
    }
}

/// Body of `SET .../AdminStatus` and `SET .../Status`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetStatusRequest {
    /// e.g. `OutOfService` or `Charging`
    #[validate(length(min = 1, message = "Invalid status!"))]
    pub value: String,
}

fn quantity(value: Option<Decimal>, field: &str) -> DomainResult<Option<Decimal>> {
    match value {
        Some(value) if value.is_sign_negative() => Err(DomainError::validation(format!("Invalid {}!", field))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::http::common::parse_body;

    #[test]
    fn evse_draft_carries_outlets_in_order() {
        let body: CreateEvseRequest = parse_body(
            br#"{
                "chargingStationId": "DE*GEF*S1111",
                "maxPower": 22,
                "socketOutlets": [
                    {"id": 1, "plug": "Type2Outlet", "cableAttached": false},
                    {"id": 2, "plug": "chademo", "cableLength": 4.5}
                ]
            }"#,
        )
        .unwrap();
        let (station_id, draft) = body.into_draft().unwrap();
        assert_eq!(station_id.to_string(), "DE*GEF*S1111");
        assert_eq!(draft.max_power, Some(Decimal::from(22)));
        let plugs: Vec<_> = draft.socket_outlets.iter().map(|(_, outlet)| outlet.plug).collect();
        assert_eq!(plugs, vec![PlugType::Type2Outlet, PlugType::CHAdeMO]);
    }

    #[test]
    fn unknown_plug_is_rejected() {
        let body: CreateEvseRequest = parse_body(
            br#"{"chargingStationId": "DE*GEF*S1111", "socketOutlets": [{"id": 1, "plug": "Schuko9000"}]}"#,
        )
        .unwrap();
        assert_eq!(body.into_draft().unwrap_err(), DomainError::validation("Invalid plug type!"));
    }

    #[test]
    fn negative_power_is_rejected() {
        let body: CreateChargingPoolRequest = parse_body(br#"{"maxPower": -1}"#).unwrap();
        assert_eq!(body.into_draft().unwrap_err(), DomainError::validation("Invalid maxPower!"));
    }

    #[test]
    fn station_body_requires_its_pool() {
        assert!(parse_body::<CreateChargingStationRequest>(b"{}").is_err());
    }
}
