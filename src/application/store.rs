//! Host-scoped registry of roaming networks
//!
//! The store is created once at startup and handed to every handler through
//! the router state. A request's host name decides which networks it can
//! see; the scope is part of the registry key, not a separate structure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::domain::registry::OrderedRegistry;
use crate::domain::{I18NText, RoamingNetwork, RoamingNetworkDraft, RoamingNetworkId};
use crate::support::errors::{DomainError, DomainResult};
use crate::support::pagination::{Paged, Window};

/// How request host names map onto scopes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenancyMode {
    /// Every host name sees only the networks created through it
    #[default]
    Isolated,
    /// All host names share one set of networks
    Shared,
}

/// Visibility scope of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostScope(String);

impl HostScope {
    const GLOBAL: &'static str = "*";

    /// Normalize a `Host` header value: lower-case, port stripped.
    pub fn from_host(host: &str) -> Self {
        let host = host.trim().to_ascii_lowercase();
        let name = if host.starts_with('[') {
            // [::1]:8080
            match host.find(']') {
                Some(end) => host[..=end].to_string(),
                None => host,
            }
        } else {
            host.split(':').next().unwrap_or_default().to_string()
        };
        Self(name)
    }

    pub fn global() -> Self {
        Self(Self::GLOBAL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HostScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub tenancy: TenancyMode,
    /// Scope used when a request carries no `Host` header
    pub default_host: String,
    /// Entries kept per status history
    pub status_history_capacity: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            tenancy: TenancyMode::Isolated,
            default_host: "localhost".to_string(),
            status_history_capacity: 50,
        }
    }
}

type ScopedId = (HostScope, RoamingNetworkId);

/// In-memory registry of roaming-network trees
pub struct EntityStore {
    settings: StoreSettings,
    networks: OrderedRegistry<ScopedId, RoamingNetwork>,
}

/// Shared, reference-counted entity store
pub type SharedEntityStore = Arc<EntityStore>;

impl EntityStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            networks: OrderedRegistry::new(),
        }
    }

    /// Wrap in `Arc` for shared ownership
    pub fn shared(settings: StoreSettings) -> SharedEntityStore {
        Arc::new(Self::new(settings))
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Resolve the scope a request with the given `Host` header belongs to
    pub fn scope_for_host(&self, host: Option<&str>) -> HostScope {
        match self.settings.tenancy {
            TenancyMode::Shared => HostScope::global(),
            TenancyMode::Isolated => {
                let scope = host
                    .map(HostScope::from_host)
                    .filter(|scope| !scope.as_str().is_empty());
                scope.unwrap_or_else(|| HostScope::from_host(&self.settings.default_host))
            }
        }
    }

    /// Create a roaming network from raw JSON name/description values.
    pub fn create(
        &self,
        scope: &HostScope,
        id: RoamingNetworkId,
        name: Option<&Value>,
        description: Option<&Value>,
    ) -> DomainResult<Arc<RoamingNetwork>> {
        let mut draft = RoamingNetworkDraft::default();

        if let Some(name) = name {
            draft.entity.name = I18NText::from_json(name)
                .ok_or_else(|| DomainError::validation("Invalid roaming network name!"))?;
        }
        if let Some(description) = description {
            draft.entity.description = I18NText::from_json(description)
                .ok_or_else(|| DomainError::validation("Invalid roaming network description!"))?;
        }

        self.create_with(scope, id, draft)
    }

    pub fn create_with(
        &self,
        scope: &HostScope,
        id: RoamingNetworkId,
        draft: RoamingNetworkDraft,
    ) -> DomainResult<Arc<RoamingNetwork>> {
        let capacity = self.settings.status_history_capacity;
        let network = self
            .networks
            .insert_new((scope.clone(), id.clone()), || {
                RoamingNetwork::new(id.clone(), draft, capacity)
            })
            .map_err(|r| r.into_error("RoamingNetworkId already exists!", "Unknown RoamingNetworkId!"))?;

        metrics::counter!("roaming_networks_created_total").increment(1);
        info!(scope = %scope, roaming_network_id = %id, "Roaming network created");
        Ok(network)
    }

    pub fn get(&self, scope: &HostScope, id: &RoamingNetworkId) -> DomainResult<Arc<RoamingNetwork>> {
        self.networks
            .get(&(scope.clone(), id.clone()))
            .ok_or_else(unknown_network)
    }

    /// Networks of `scope` in creation order, windowed; `total` counts the
    /// whole scope.
    pub fn list(&self, scope: &HostScope, window: Window) -> Paged<Arc<RoamingNetwork>> {
        Paged::from_all(self.networks.values_where(|(s, _)| s == scope), window)
    }

    pub fn count(&self, scope: &HostScope) -> usize {
        self.networks.keys().iter().filter(|(s, _)| s == scope).count()
    }

    /// Remove a network together with everything it owns.
    pub fn delete(&self, scope: &HostScope, id: &RoamingNetworkId) -> DomainResult<Arc<RoamingNetwork>> {
        let network = self
            .networks
            .remove(&(scope.clone(), id.clone()))
            .ok_or_else(unknown_network)?;

        info!(scope = %scope, roaming_network_id = %id, "Roaming network deleted");
        Ok(network)
    }

    /// Number of networks across all scopes
    pub fn total_networks(&self) -> usize {
        self.networks.len()
    }

    /// Every network of every scope, in creation order
    pub fn all_networks(&self) -> Vec<Arc<RoamingNetwork>> {
        self.networks.values()
    }
}

fn unknown_network() -> DomainError {
    DomainError::not_found("Unknown RoamingNetworkId!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entity;
    use serde_json::json;

    fn store() -> EntityStore {
        EntityStore::new(StoreSettings::default())
    }

    fn id(text: &str) -> RoamingNetworkId {
        RoamingNetworkId::parse(text).unwrap()
    }

    #[test]
    fn scope_strips_port_and_case() {
        assert_eq!(HostScope::from_host("API.Example.org:8080").as_str(), "api.example.org");
        assert_eq!(HostScope::from_host("[::1]:3004").as_str(), "[::1]");
    }

    #[test]
    fn create_then_get() {
        let store = store();
        let scope = store.scope_for_host(Some("localhost:3004"));
        store.create(&scope, id("TEST_RN1"), None, None).unwrap();
        let rn = store.get(&scope, &id("TEST_RN1")).unwrap();
        assert!(rn.core().description.is_empty());
    }

    #[test]
    fn scalar_description_is_rejected() {
        let store = store();
        let scope = HostScope::global();
        let result = store.create(&scope, id("RN"), None, Some(&json!("plain text")));
        assert_eq!(
            result.unwrap_err(),
            DomainError::validation("Invalid roaming network description!")
        );
        assert_eq!(store.count(&scope), 0);
    }

    #[test]
    fn second_create_with_same_id_conflicts_and_keeps_first() {
        let store = store();
        let scope = HostScope::global();
        store
            .create(&scope, id("RN"), None, Some(&json!({"en": "first"})))
            .unwrap();
        let second = store.create(&scope, id("RN"), None, Some(&json!({"en": "second"})));
        assert!(matches!(second, Err(DomainError::Conflict(_))));

        assert_eq!(store.count(&scope), 1);
        let rn = store.get(&scope, &id("RN")).unwrap();
        assert_eq!(rn.core().description.get("en"), Some("first"));
    }

    #[test]
    fn list_windows_in_creation_order() {
        let store = store();
        let scope = HostScope::global();
        for name in ["RN5", "RN1", "RN3", "RN2", "RN4"] {
            store.create(&scope, id(name), None, None).unwrap();
        }

        let page = store.list(&scope, Window::new(1, Some(2)));
        let ids: Vec<String> = page.items.iter().map(|rn| rn.id.to_string()).collect();
        assert_eq!(ids, vec!["RN1", "RN3"]);
        assert_eq!(page.total, 5);

        let empty = store.list(&scope, Window::new(0, Some(0)));
        assert!(empty.items.is_empty());
        assert_eq!(empty.total, 5);

        assert!(store.list(&scope, Window::new(7, None)).items.is_empty());
    }

    #[test]
    fn isolated_hosts_do_not_see_each_other() {
        let store = store();
        let a = store.scope_for_host(Some("a.example.org"));
        let b = store.scope_for_host(Some("b.example.org"));
        store.create(&a, id("RN"), None, None).unwrap();

        assert!(store.get(&b, &id("RN")).is_err());
        assert_eq!(store.count(&b), 0);
        // Same id may exist once per scope
        assert!(store.create(&b, id("RN"), None, None).is_ok());
        assert_eq!(store.total_networks(), 2);
    }

    #[test]
    fn shared_tenancy_uses_one_scope() {
        let store = EntityStore::new(StoreSettings {
            tenancy: TenancyMode::Shared,
            ..StoreSettings::default()
        });
        let a = store.scope_for_host(Some("a.example.org"));
        let b = store.scope_for_host(None);
        assert_eq!(a, b);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let store = store();
        let scope = HostScope::global();
        assert_eq!(
            store.delete(&scope, &id("RN")).unwrap_err(),
            DomainError::not_found("Unknown RoamingNetworkId!")
        );
        store.create(&scope, id("RN"), None, None).unwrap();
        store.delete(&scope, &id("RN")).unwrap();
        assert!(store.get(&scope, &id("RN")).is_err());
    }

    #[test]
    fn deleted_network_refuses_late_children() {
        let store = store();
        let scope = HostScope::global();
        let rn = store.create(&scope, id("RN"), None, None).unwrap();
        store.delete(&scope, &id("RN")).unwrap();

        let operator_id = crate::domain::ChargingStationOperatorId::parse("DE*GEF").unwrap();
        assert_eq!(
            rn.add_charging_station_operator(operator_id, Default::default()).unwrap_err(),
            DomainError::not_found("Unknown RoamingNetworkId!")
        );
        assert!(rn.charging_station_operators().is_empty());
    }
}
