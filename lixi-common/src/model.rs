//! Domain model for the lucky draw
//!
//! A `Denomination` is one prize with a relative selection weight; an ordered
//! `DenominationSet` defines both the distribution sampled from and the
//! cumulative-weight layout the wheel renders. Winners are recorded into a
//! capped `HistoryLog`, newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Maximum number of history entries retained, newest first
pub const HISTORY_CAP: usize = 20;

/// Minimum number of denominations in an editable set
pub const MIN_DENOMINATIONS: usize = 2;

/// Palette offered to editors when creating new denominations
pub const FESTIVE_COLORS: &[&str] = &[
    "#ef4444", "#f59e0b", "#10b981", "#3b82f6", "#8b5cf6", "#f43f5e", "#ec4899", "#facc15",
];

/// One prize with a relative selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Denomination {
    /// Unique key
    pub id: Uuid,

    /// Display string, e.g. "10.000đ"
    pub label: String,

    /// Monetary amount in đồng
    pub value: i64,

    /// Relative selection weight (> 0 inside an active set)
    pub weight: f64,

    /// Display color (hex string, passed through to renderers)
    pub color: String,
}

impl Denomination {
    pub fn new(label: impl Into<String>, value: i64, weight: f64, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            value,
            weight,
            color: color.into(),
        }
    }
}

/// Ordered set of denominations
///
/// Insertion order is significant: it defines the cumulative-weight layout
/// used to map weights to wheel arcs. The engine borrows the set per round
/// and never mutates it mid-round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenominationSet {
    items: Vec<Denomination>,
}

impl DenominationSet {
    pub fn new(items: Vec<Denomination>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Denomination> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Denomination> {
        self.items.iter()
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(|d| d.weight).sum()
    }

    /// Add a denomination (editor operation)
    ///
    /// Rejects non-positive weights; the set must stay sampleable.
    pub fn add(&mut self, denomination: Denomination) -> Result<()> {
        if denomination.weight <= 0.0 || !denomination.weight.is_finite() {
            return Err(Error::InvalidInput(format!(
                "weight must be positive, got {}",
                denomination.weight
            )));
        }
        self.items.push(denomination);
        Ok(())
    }

    /// Remove a denomination by id (editor operation)
    ///
    /// Refuses to shrink the set below [`MIN_DENOMINATIONS`].
    pub fn remove(&mut self, id: Uuid) -> Result<Denomination> {
        if self.items.len() <= MIN_DENOMINATIONS {
            return Err(Error::InvalidInput(format!(
                "set must keep at least {} denominations",
                MIN_DENOMINATIONS
            )));
        }
        let index = self
            .items
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| Error::InvalidInput(format!("no denomination with id {}", id)))?;
        Ok(self.items.remove(index))
    }

    /// Change a denomination's weight (editor operation)
    pub fn update_weight(&mut self, id: Uuid, weight: f64) -> Result<()> {
        if weight <= 0.0 || !weight.is_finite() {
            return Err(Error::InvalidInput(format!(
                "weight must be positive, got {}",
                weight
            )));
        }
        let item = self
            .items
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::InvalidInput(format!("no denomination with id {}", id)))?;
        item.weight = weight;
        Ok(())
    }
}

impl Default for DenominationSet {
    fn default() -> Self {
        default_set()
    }
}

impl<'a> IntoIterator for &'a DenominationSet {
    type Item = &'a Denomination;
    type IntoIter = std::slice::Iter<'a, Denomination>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The stock prize table: sixteen envelopes of common Tết denominations
///
/// Small prizes are heavily weighted, the 100.000đ slices are rare.
pub fn default_set() -> DenominationSet {
    let rows: &[(&str, i64, f64, &str)] = &[
        ("10.000đ", 10_000, 10.0, "#ef4444"),
        ("100.000đ", 100_000, 2.0, "#ec4899"),
        ("10.000đ", 10_000, 10.0, "#ef4444"),
        ("20.000đ", 20_000, 10.0, "#f59e0b"),
        ("50.000đ", 50_000, 5.0, "#10b981"),
        ("10.000đ", 10_000, 10.0, "#ef4444"),
        ("20.000đ", 20_000, 10.0, "#f59e0b"),
        ("100.000đ", 100_000, 2.0, "#ec4899"),
        ("10.000đ", 10_000, 10.0, "#ef4444"),
        ("20.000đ", 20_000, 5.0, "#f59e0b"),
        ("50.000đ", 50_000, 5.0, "#10b981"),
        ("100.000đ", 100_000, 2.0, "#ec4899"),
        ("10.000đ", 10_000, 10.0, "#ef4444"),
        ("20.000đ", 20_000, 5.0, "#f59e0b"),
        ("10.000đ", 10_000, 10.0, "#ef4444"),
        ("50.000đ", 50_000, 5.0, "#10b981"),
    ];

    DenominationSet::new(
        rows.iter()
            .map(|&(label, value, weight, color)| Denomination::new(label, value, weight, color))
            .collect(),
    )
}

/// One recorded win
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only log of recent wins, newest first, capped at [`HISTORY_CAP`]
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a win; the oldest entry falls off once the cap is reached
    pub fn record(&mut self, winner: &Denomination) -> HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            label: winner.label.clone(),
            timestamp: Utc::now(),
        };
        self.entries.push_front(entry.clone());
        self.entries.truncate(HISTORY_CAP);
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries newest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_item_set() -> DenominationSet {
        DenominationSet::new(vec![
            Denomination::new("A", 10_000, 1.0, "#ef4444"),
            Denomination::new("B", 20_000, 1.0, "#f59e0b"),
        ])
    }

    #[test]
    fn test_default_set_shape() {
        let set = default_set();
        assert_eq!(set.len(), 16);
        assert!(set.iter().all(|d| d.weight > 0.0));
        assert!((set.total_weight() - 111.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_rejects_non_positive_weight() {
        let mut set = two_item_set();
        let bad = Denomination::new("C", 1, 0.0, "#fff");
        assert!(set.add(bad).is_err());
        assert_eq!(set.len(), 2);

        let good = Denomination::new("C", 1, 2.5, "#fff");
        set.add(good).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_remove_keeps_minimum_size() {
        let mut set = two_item_set();
        let id = set.get(0).unwrap().id;
        assert!(set.remove(id).is_err());

        set.add(Denomination::new("C", 1, 1.0, "#fff")).unwrap();
        let removed = set.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_update_weight() {
        let mut set = two_item_set();
        let id = set.get(1).unwrap().id;
        set.update_weight(id, 4.0).unwrap();
        assert_eq!(set.get(1).unwrap().weight, 4.0);

        assert!(set.update_weight(id, -1.0).is_err());
        assert!(set.update_weight(Uuid::new_v4(), 1.0).is_err());
    }

    #[test]
    fn test_denomination_serde_round_trip() {
        let d = Denomination::new("50.000đ", 50_000, 5.0, "#10b981");
        let json = serde_json::to_string(&d).unwrap();
        let back: Denomination = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }

    #[test]
    fn test_history_cap_and_order() {
        let mut log = HistoryLog::new();
        let set = default_set();
        for i in 0..25 {
            let winner = set.get(i % set.len()).unwrap();
            log.record(winner);
        }
        assert_eq!(log.len(), HISTORY_CAP);

        // Newest first: last recorded label is at the front
        let newest = log.entries().next().unwrap();
        assert_eq!(newest.label, set.get(24 % set.len()).unwrap().label);
    }
}
