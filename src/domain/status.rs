//! Admin/operational status values and their bounded histories

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::support::errors::DomainError;

/// Administrative status set by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminStatus {
    Operational,
    InternalUse,
    OutOfService,
    Planned,
    Deleted,
    Unknown,
}

impl AdminStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "Operational",
            Self::InternalUse => "InternalUse",
            Self::OutOfService => "OutOfService",
            Self::Planned => "Planned",
            Self::Deleted => "Deleted",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Operational" => Ok(Self::Operational),
            "InternalUse" => Ok(Self::InternalUse),
            "OutOfService" => Ok(Self::OutOfService),
            "Planned" => Ok(Self::Planned),
            "Deleted" => Ok(Self::Deleted),
            "Unknown" => Ok(Self::Unknown),
            _ => Err(DomainError::validation("Invalid admin status!")),
        }
    }
}

/// Operational status reported by the infrastructure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationalStatus {
    Available,
    Charging,
    Reserved,
    Blocked,
    OutOfService,
    Offline,
    Faulted,
    Unknown,
}

impl OperationalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Charging => "Charging",
            Self::Reserved => "Reserved",
            Self::Blocked => "Blocked",
            Self::OutOfService => "OutOfService",
            Self::Offline => "Offline",
            Self::Faulted => "Faulted",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Available" => Ok(Self::Available),
            "Charging" => Ok(Self::Charging),
            "Reserved" => Ok(Self::Reserved),
            "Blocked" => Ok(Self::Blocked),
            "OutOfService" => Ok(Self::OutOfService),
            "Offline" => Ok(Self::Offline),
            "Faulted" => Ok(Self::Faulted),
            "Unknown" => Ok(Self::Unknown),
            _ => Err(DomainError::validation("Invalid status!")),
        }
    }
}

/// Anything that can be kept in a [`StatusSchedule`]
pub trait StatusValue: Copy + PartialEq + Send + Sync + 'static {
    fn label(&self) -> &'static str;
}

impl StatusValue for AdminStatus {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}

impl StatusValue for OperationalStatus {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}

/// One entry of a status history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamped<T> {
    pub timestamp: DateTime<Utc>,
    pub value: T,
}

/// Bounded status history, newest first.
#[derive(Debug)]
pub struct StatusSchedule<T> {
    capacity: usize,
    entries: RwLock<VecDeque<Timestamped<T>>>,
}

impl<T: StatusValue> StatusSchedule<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Record a new value. Repeating the current value is a no-op.
    pub fn insert(&self, value: T, timestamp: DateTime<Utc>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.front().map(|e| e.value) == Some(value) {
            return false;
        }
        entries.push_front(Timestamped { timestamp, value });
        entries.truncate(self.capacity);
        true
    }

    pub fn current(&self) -> Option<T> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .front()
            .map(|e| e.value)
    }

    /// The `size` newest entries
    pub fn history(&self, size: usize) -> Vec<Timestamped<T>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .take(size)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn history_is_newest_first_and_bounded() {
        let schedule = StatusSchedule::new(2);
        let t0 = Utc::now();
        schedule.insert(OperationalStatus::Available, t0);
        schedule.insert(OperationalStatus::Charging, t0 + Duration::seconds(1));
        schedule.insert(OperationalStatus::Available, t0 + Duration::seconds(2));

        let history = schedule.history(10);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].value, OperationalStatus::Available);
        assert_eq!(history[1].value, OperationalStatus::Charging);
        assert_eq!(schedule.history(1).len(), 1);
    }

    #[test]
    fn repeated_value_is_not_recorded() {
        let schedule = StatusSchedule::new(10);
        assert!(schedule.insert(AdminStatus::Operational, Utc::now()));
        assert!(!schedule.insert(AdminStatus::Operational, Utc::now()));
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.current(), Some(AdminStatus::Operational));
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!(OperationalStatus::parse("Faulted").unwrap(), OperationalStatus::Faulted);
        assert!(AdminStatus::parse("Broken").is_err());
    }
}
