//! Presence registry derived from relay snapshots.
//!
//! The relay is the source of truth: every snapshot replaces the whole
//! registry. There are no incremental joins or leaves.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::protocol::PresenceSnapshot;

/// Another connected participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerRecord {
    pub id: String,
    pub display_name: String,
}

/// Currently connected participants, never including ourselves.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    local_id: Option<String>,
    peers: HashMap<String, PeerRecord>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record our own connection id and drop it from the registry.
    pub fn set_local_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.peers.remove(&id);
        self.local_id = Some(id);
    }

    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    /// Replace the registry with `snapshot`. Returns the number of peers kept.
    ///
    /// Entries with an empty id or a display name that is not a string are
    /// skipped, as is our own id.
    pub fn apply_snapshot(&mut self, snapshot: &PresenceSnapshot) -> usize {
        let mut peers = HashMap::with_capacity(snapshot.len());
        for (id, name) in snapshot {
            if id.is_empty() || self.local_id.as_deref() == Some(id.as_str()) {
                continue;
            }
            let Some(display_name) = name.as_str() else {
                debug!(id = %id, "Dropping malformed presence entry");
                continue;
            };
            peers.insert(
                id.clone(),
                PeerRecord {
                    id: id.clone(),
                    display_name: display_name.to_string(),
                },
            );
        }
        self.peers = peers;
        self.peers.len()
    }

    /// Peers other than `excluding`, ordered by display name then id.
    pub fn list(&self, excluding: &str) -> Vec<PeerRecord> {
        let mut peers: Vec<PeerRecord> = self
            .peers
            .values()
            .filter(|p| p.id != excluding)
            .cloned()
            .collect();
        peers.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        peers
    }

    pub fn get(&self, id: &str) -> Option<&PeerRecord> {
        self.peers.get(id)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.peers.get(id).map(|p| p.display_name.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.peers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Forget everyone (relay connection lost).
    pub fn clear(&mut self) {
        self.peers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(entries: &[(&str, serde_json::Value)]) -> PresenceSnapshot {
        entries
            .iter()
            .map(|(id, name)| (id.to_string(), name.clone()))
            .collect()
    }

    #[test]
    fn own_entry_is_never_listed() {
        let mut registry = PresenceRegistry::new();
        registry.set_local_id("a");
        registry.apply_snapshot(&snapshot(&[("a", json!("Alice"))]));
        assert!(registry.list("a").is_empty());
        assert!(!registry.contains("a"));
    }

    #[test]
    fn list_excludes_even_without_local_id() {
        let mut registry = PresenceRegistry::new();
        registry.apply_snapshot(&snapshot(&[("a", json!("Alice")), ("b", json!("Bob"))]));
        let listed = registry.list("a");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "b");
    }

    #[test]
    fn snapshot_replaces_previous_membership() {
        let mut registry = PresenceRegistry::new();
        registry.set_local_id("me");
        registry.apply_snapshot(&snapshot(&[("b", json!("Bob")), ("c", json!("Carol"))]));
        assert_eq!(registry.len(), 2);

        registry.apply_snapshot(&snapshot(&[("d", json!("Dave"))]));
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("b"));
        assert_eq!(registry.display_name("d"), Some("Dave"));
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let mut registry = PresenceRegistry::new();
        let kept = registry.apply_snapshot(&snapshot(&[
            ("b", json!("Bob")),
            ("c", json!(null)),
            ("d", json!({"name": "Dave"})),
            ("", json!("Nobody")),
        ]));
        assert_eq!(kept, 1);
        assert_eq!(registry.list("me")[0].display_name, "Bob");
    }

    #[test]
    fn list_is_ordered_by_name_then_id() {
        let mut registry = PresenceRegistry::new();
        registry.apply_snapshot(&snapshot(&[
            ("z", json!("Bob")),
            ("y", json!("Alice")),
            ("x", json!("Bob")),
        ]));
        let ids: Vec<String> = registry.list("me").into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["y", "x", "z"]);
    }

    #[test]
    fn setting_local_id_purges_existing_entry() {
        let mut registry = PresenceRegistry::new();
        registry.apply_snapshot(&snapshot(&[("a", json!("Alice")), ("b", json!("Bob"))]));
        registry.set_local_id("a");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.local_id(), Some("a"));
    }

    #[test]
    fn clear_empties_registry() {
        let mut registry = PresenceRegistry::new();
        registry.apply_snapshot(&snapshot(&[("b", json!("Bob"))]));
        registry.clear();
        assert!(registry.is_empty());
    }
}
