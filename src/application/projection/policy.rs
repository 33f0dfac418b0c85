//! Expansion policies and the traversal rule that keeps rendering finite
//!
//! Relations point either down the ownership tree (pool → stations), up a
//! back-reference (EVSE → station) or at a leaf value (brand, license).
//! The renderer threads a [`Traversal`] through every nested document:
//!
//! - `Root`: the caller's policy applies as given.
//! - `Downward` (entered through an owning relation): back-references are
//!   capped at `IdOnly`, they would only lead back to the parent.
//! - `Upward` (entered through a back-reference): every relation is capped
//!   at `IdOnly`, so nothing is ever more than one level deep beyond a
//!   back-reference.
//!
//! Downward chains follow the tree and the tree is finite; upward chains
//! stop after one level. Rendering terminates for every policy.

use std::collections::HashMap;

use crate::support::errors::{DomainError, DomainResult};

/// How much of a related entity is embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpandMode {
    Hidden,
    IdOnly,
    Expand,
}

impl ExpandMode {
    /// The weaker of `self` and `max`
    pub fn cap(self, max: ExpandMode) -> ExpandMode {
        self.min(max)
    }
}

/// Named relations an expansion policy can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    RoamingNetwork,
    Operator,
    GridOperator,
    ParkingOperator,
    SmartCity,
    ChargingPool,
    ChargingStation,
    Evse,
    SocketOutlet,
    Brand,
    DataLicense,
}

/// Output keys of one relation
#[derive(Debug, Clone, Copy)]
pub struct RelationKeys {
    pub one: &'static str,
    pub many: &'static str,
}

impl Relation {
    pub const ALL: [Relation; 11] = [
        Relation::RoamingNetwork,
        Relation::Operator,
        Relation::GridOperator,
        Relation::ParkingOperator,
        Relation::SmartCity,
        Relation::ChargingPool,
        Relation::ChargingStation,
        Relation::Evse,
        Relation::SocketOutlet,
        Relation::Brand,
        Relation::DataLicense,
    ];

    pub fn keys(&self) -> RelationKeys {
        let (one, many) = match self {
            Self::RoamingNetwork => ("roamingNetwork", "roamingNetworks"),
            Self::Operator => ("chargingStationOperator", "chargingStationOperators"),
            Self::GridOperator => ("gridOperator", "gridOperators"),
            Self::ParkingOperator => ("parkingOperator", "parkingOperators"),
            Self::SmartCity => ("smartCity", "smartCities"),
            Self::ChargingPool => ("chargingPool", "chargingPools"),
            Self::ChargingStation => ("chargingStation", "chargingStations"),
            Self::Evse => ("EVSE", "EVSEs"),
            Self::SocketOutlet => ("socketOutlet", "socketOutlets"),
            Self::Brand => ("brand", "brands"),
            Self::DataLicense => ("dataLicense", "dataLicenses"),
        };
        RelationKeys { one, many }
    }

    /// Relation named by an `expand` token, singular or plural, any case
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        let relation = match token.as_str() {
            "roamingnetwork" | "roamingnetworks" => Self::RoamingNetwork,
            "operator" | "operators" | "chargingstationoperator" | "chargingstationoperators" => {
                Self::Operator
            }
            "gridoperator" | "gridoperators" => Self::GridOperator,
            "parkingoperator" | "parkingoperators" => Self::ParkingOperator,
            "smartcity" | "smartcities" => Self::SmartCity,
            "chargingpool" | "chargingpools" => Self::ChargingPool,
            "chargingstation" | "chargingstations" => Self::ChargingStation,
            "evse" | "evses" => Self::Evse,
            "socketoutlet" | "socketoutlets" => Self::SocketOutlet,
            "brand" | "brands" => Self::Brand,
            "datalicense" | "datalicenses" => Self::DataLicense,
            _ => return None,
        };
        Some(relation)
    }

    fn default_mode(&self) -> ExpandMode {
        match self {
            Self::RoamingNetwork => ExpandMode::Hidden,
            _ => ExpandMode::IdOnly,
        }
    }
}

/// Which way a relation points from the entity being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards an ancestor
    BackReference,
    /// Towards owned children
    Owned,
    /// Towards a value without relations of its own
    Leaf,
}

/// How the entity currently being rendered was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Root,
    Downward,
    Upward,
}

impl Traversal {
    /// Traversal of a document embedded along a relation pointing `direction`
    pub fn enter(self, direction: Direction) -> Traversal {
        match direction {
            Direction::BackReference => Traversal::Upward,
            Direction::Owned | Direction::Leaf => Traversal::Downward,
        }
    }
}

/// Relation → expand mode, with per-relation defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionPolicy {
    modes: HashMap<Relation, ExpandMode>,
}

impl ExpansionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every relation set to `mode`
    pub fn uniform(mode: ExpandMode) -> Self {
        let mut policy = Self::new();
        for relation in Relation::ALL {
            policy.set(relation, mode);
        }
        policy
    }

    pub fn with(mut self, relation: Relation, mode: ExpandMode) -> Self {
        self.set(relation, mode);
        self
    }

    pub fn set(&mut self, relation: Relation, mode: ExpandMode) {
        self.modes.insert(relation, mode);
    }

    /// Mode requested for `relation` (explicit or default)
    pub fn mode(&self, relation: Relation) -> ExpandMode {
        self.modes
            .get(&relation)
            .copied()
            .unwrap_or_else(|| relation.default_mode())
    }

    /// Mode actually applied for `relation` pointing `direction`, given how
    /// the current entity was reached.
    pub fn effective(&self, relation: Relation, direction: Direction, traversal: Traversal) -> ExpandMode {
        let requested = self.mode(relation);
        match (traversal, direction) {
            (Traversal::Root, _) => requested,
            (Traversal::Downward, Direction::BackReference) => requested.cap(ExpandMode::IdOnly),
            (Traversal::Downward, _) => requested,
            (Traversal::Upward, _) => requested.cap(ExpandMode::IdOnly),
        }
    }

    /// Build from `expand` query tokens: `brands` expands, `-chargingpools`
    /// hides, `operator:id` asks for the id only.
    pub fn from_tokens<I, S>(tokens: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self::new();
        for token in tokens {
            let token = token.as_ref().to_ascii_lowercase();
            for part in token.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (name, mode) = if let Some(name) = part.strip_prefix('-') {
                    (name, ExpandMode::Hidden)
                } else if let Some(name) = part.strip_suffix(":id") {
                    (name, ExpandMode::IdOnly)
                } else {
                    (part, ExpandMode::Expand)
                };
                let relation = Relation::from_token(name)
                    .ok_or_else(|| DomainError::validation("Invalid expand parameter!"))?;
                policy.set(relation, mode);
            }
        }
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_select_modes() {
        let policy = ExpansionPolicy::from_tokens(["brands", "-chargingpools", "Operator:id"]).unwrap();
        assert_eq!(policy.mode(Relation::Brand), ExpandMode::Expand);
        assert_eq!(policy.mode(Relation::ChargingPool), ExpandMode::Hidden);
        assert_eq!(policy.mode(Relation::Operator), ExpandMode::IdOnly);
        assert_eq!(policy.mode(Relation::RoamingNetwork), ExpandMode::Hidden);
    }

    #[test]
    fn id_only_suffix_ignores_case() {
        let policy = ExpansionPolicy::from_tokens(["Operator:ID", "EVSEs:Id", "-ChargingPools"]).unwrap();
        assert_eq!(policy.mode(Relation::Operator), ExpandMode::IdOnly);
        assert_eq!(policy.mode(Relation::Evse), ExpandMode::IdOnly);
        assert_eq!(policy.mode(Relation::ChargingPool), ExpandMode::Hidden);
    }

    #[test]
    fn comma_separated_tokens_are_split() {
        let policy = ExpansionPolicy::from_tokens(["evses,chargingstations"]).unwrap();
        assert_eq!(policy.mode(Relation::Evse), ExpandMode::Expand);
        assert_eq!(policy.mode(Relation::ChargingStation), ExpandMode::Expand);
    }

    #[test]
    fn unknown_token_is_a_validation_error() {
        assert!(ExpansionPolicy::from_tokens(["spaceships"]).is_err());
    }

    #[test]
    fn upward_traversal_caps_everything() {
        let policy = ExpansionPolicy::uniform(ExpandMode::Expand);
        for relation in Relation::ALL {
            for direction in [Direction::BackReference, Direction::Owned, Direction::Leaf] {
                assert!(policy.effective(relation, direction, Traversal::Upward) <= ExpandMode::IdOnly);
            }
        }
    }

    #[test]
    fn downward_traversal_caps_back_references_only() {
        let policy = ExpansionPolicy::uniform(ExpandMode::Expand);
        assert_eq!(
            policy.effective(Relation::ChargingStation, Direction::BackReference, Traversal::Downward),
            ExpandMode::IdOnly
        );
        assert_eq!(
            policy.effective(Relation::Evse, Direction::Owned, Traversal::Downward),
            ExpandMode::Expand
        );
    }

    #[test]
    fn hidden_is_never_raised() {
        let policy = ExpansionPolicy::uniform(ExpandMode::Hidden);
        assert_eq!(
            policy.effective(Relation::Operator, Direction::BackReference, Traversal::Upward),
            ExpandMode::Hidden
        );
    }
}
