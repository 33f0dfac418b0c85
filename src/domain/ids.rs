//! Typed, text-renderable identifiers
//!
//! Roaming networks carry a free-standing id. Operators (and grid/parking
//! operators, smart cities) use `CC*XXX`. Everything below an operator is
//! namespaced by it: `DE*GEF*P1111`, `DE*GEF*S1111`, `DE*GEF*E1111*1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::support::errors::DomainError;

const MAX_NETWORK_ID_LEN: usize = 64;
const MAX_OPERATOR_SUFFIX_LEN: usize = 10;
const MAX_CHILD_SUFFIX_LEN: usize = 32;

/// Identifier of a roaming network
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoamingNetworkId(String);

impl RoamingNetworkId {
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let text = text.trim();
        let valid = !text.is_empty()
            && text.len() <= MAX_NETWORK_ID_LEN
            && text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if valid {
            Ok(Self(text.to_string()))
        } else {
            Err(DomainError::validation("Invalid RoamingNetworkId!"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoamingNetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse `CC*XXX` into (country, suffix); both upper-cased.
fn parse_operator_parts(text: &str) -> Option<(String, String)> {
    let (country, suffix) = text.trim().split_once('*')?;
    let country_ok = country.len() == 2 && country.chars().all(|c| c.is_ascii_alphabetic());
    let suffix_ok = !suffix.is_empty()
        && suffix.len() <= MAX_OPERATOR_SUFFIX_LEN
        && suffix.chars().all(|c| c.is_ascii_alphanumeric());

    (country_ok && suffix_ok).then(|| (country.to_ascii_uppercase(), suffix.to_ascii_uppercase()))
}

fn valid_child_suffix(suffix: &str) -> bool {
    !suffix.is_empty()
        && suffix.len() <= MAX_CHILD_SUFFIX_LEN
        && !suffix.starts_with('*')
        && !suffix.ends_with('*')
        && suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '*' | '_' | '-'))
}

macro_rules! operator_like_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            country: String,
            suffix: String,
        }

        impl $name {
            pub fn parse(text: &str) -> Result<Self, DomainError> {
                parse_operator_parts(text)
                    .map(|(country, suffix)| Self { country, suffix })
                    .ok_or_else(|| DomainError::validation(concat!("Invalid ", $label, "!")))
            }

            pub fn country_code(&self) -> &str {
                &self.country
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}*{}", self.country, self.suffix)
            }
        }
    };
}

operator_like_id!(
    /// Identifier of a charging station operator, e.g. `DE*GEF`
    ChargingStationOperatorId,
    "ChargingStationOperatorId"
);
operator_like_id!(GridOperatorId, "GridOperatorId");
operator_like_id!(ParkingOperatorId, "ParkingOperatorId");
operator_like_id!(SmartCityId, "SmartCityId");

macro_rules! operator_scoped_id {
    ($(#[$meta:meta])* $name:ident, $marker:literal, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            operator: ChargingStationOperatorId,
            suffix: String,
        }

        impl $name {
            /// Build a child id from its operator and a local suffix (`1111`).
            pub fn new(
                operator: &ChargingStationOperatorId,
                suffix: &str,
            ) -> Result<Self, DomainError> {
                let suffix = suffix.trim();
                if !valid_child_suffix(suffix) {
                    return Err(DomainError::validation(concat!("Invalid ", $label, "!")));
                }
                Ok(Self {
                    operator: operator.clone(),
                    suffix: suffix.to_ascii_uppercase(),
                })
            }

            /// Parse the full textual form, e.g. `DE*GEF*P1111`.
            pub fn parse(text: &str) -> Result<Self, DomainError> {
                let invalid = || DomainError::validation(concat!("Invalid ", $label, "!"));
                let text = text.trim();
                let marker = concat!("*", $marker);

                // Country + operator suffix never contain the marker, so the
                // first occurrence after the operator part is the split point.
                let operator_end = text.find('*').ok_or_else(invalid)?;
                let rest = &text[operator_end + 1..];
                let split = rest.find(marker).ok_or_else(invalid)?;
                let operator_text = &text[..operator_end + 1 + split];
                let suffix = &rest[split + marker.len()..];

                let operator = ChargingStationOperatorId::parse(operator_text).map_err(|_| invalid())?;
                Self::new(&operator, suffix).map_err(|_| invalid())
            }

            pub fn operator_id(&self) -> &ChargingStationOperatorId {
                &self.operator
            }

            pub fn suffix(&self) -> &str {
                &self.suffix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}*{}{}", self.operator, $marker, self.suffix)
            }
        }
    };
}

operator_scoped_id!(
    /// Identifier of a charging pool, e.g. `DE*GEF*P1111`
    ChargingPoolId,
    "P",
    "ChargingPoolId"
);
operator_scoped_id!(
    /// Identifier of a charging station, e.g. `DE*GEF*S1111`
    ChargingStationId,
    "S",
    "ChargingStationId"
);
operator_scoped_id!(
    /// Identifier of an EVSE, e.g. `DE*GEF*E1111*1`
    EvseId,
    "E",
    "EVSEId"
);
operator_scoped_id!(BrandId, "B", "BrandId");

/// Position of a socket outlet within its EVSE (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketOutletId(u32);

impl SocketOutletId {
    pub fn new(index: u32) -> Result<Self, DomainError> {
        if index == 0 {
            return Err(DomainError::validation("Invalid SocketOutletId!"));
        }
        Ok(Self(index))
    }

    pub fn parse(text: &str) -> Result<Self, DomainError> {
        text.trim()
            .parse::<u32>()
            .map_err(|_| DomainError::validation("Invalid SocketOutletId!"))
            .and_then(Self::new)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SocketOutletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! text_serde {
    ($($name:ident),+ $(,)?) => {
        $(
            impl FromStr for $name {
                type Err = DomainError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::parse(s)
                }
            }

            impl Serialize for $name {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let text = String::deserialize(deserializer)?;
                    Self::parse(&text).map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

text_serde!(
    RoamingNetworkId,
    ChargingStationOperatorId,
    GridOperatorId,
    ParkingOperatorId,
    SmartCityId,
    ChargingPoolId,
    ChargingStationId,
    EvseId,
    BrandId,
    SocketOutletId,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roaming_network_id_rejects_separators() {
        assert!(RoamingNetworkId::parse("TEST_RN1").is_ok());
        assert!(RoamingNetworkId::parse("").is_err());
        assert!(RoamingNetworkId::parse("a/b").is_err());
        assert!(RoamingNetworkId::parse("DE*GEF").is_err());
    }

    #[test]
    fn operator_id_is_upper_cased() {
        let id = ChargingStationOperatorId::parse("de*gef").unwrap();
        assert_eq!(id.to_string(), "DE*GEF");
        assert_eq!(id.country_code(), "DE");
        assert!(ChargingStationOperatorId::parse("DEU*GEF").is_err());
        assert!(ChargingStationOperatorId::parse("DE").is_err());
    }

    #[test]
    fn pool_id_embeds_operator_prefix() {
        let operator = ChargingStationOperatorId::parse("DE*GEF").unwrap();
        let pool = ChargingPoolId::new(&operator, "1111").unwrap();
        assert_eq!(pool.to_string(), "DE*GEF*P1111");
        assert_eq!(pool.operator_id(), &operator);
        assert_eq!(ChargingPoolId::parse("DE*GEF*P1111").unwrap(), pool);
    }

    #[test]
    fn evse_suffix_may_contain_stars() {
        let evse = EvseId::parse("DE*GEF*E1111*1").unwrap();
        assert_eq!(evse.suffix(), "1111*1");
        assert_eq!(evse.to_string(), "DE*GEF*E1111*1");
        assert!(EvseId::parse("DE*GEF*E*1").is_err());
    }

    #[test]
    fn wrong_marker_is_rejected() {
        assert!(ChargingPoolId::parse("DE*GEF*S1111").is_err());
        assert!(ChargingStationId::parse("DE*GEF*S1111").is_ok());
    }

    #[test]
    fn ids_serialize_as_text() {
        let pool = ChargingPoolId::parse("DE*GEF*P1").unwrap();
        assert_eq!(serde_json::to_value(&pool).unwrap(), serde_json::json!("DE*GEF*P1"));
        let back: ChargingPoolId = serde_json::from_value(serde_json::json!("DE*GEF*P1")).unwrap();
        assert_eq!(back, pool);
    }

    #[test]
    fn socket_outlet_ids_are_one_based() {
        assert!(SocketOutletId::new(0).is_err());
        assert_eq!(SocketOutletId::parse("2").unwrap().index(), 2);
    }
}
