//! Session statistics
//!
//! Damage dealt and how often each weapon was fired. Lives only for the
//! current session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Counters for the current session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Sum of weapon damage over every hit
    pub total_damage: u64,
    /// Weapon id -> times fired (hits and misses)
    pub weapon_uses: BTreeMap<String, u32>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_use(&mut self, weapon_id: &str) {
        *self.weapon_uses.entry(weapon_id.to_string()).or_insert(0) += 1;
    }

    pub fn record_damage(&mut self, damage: u32) {
        self.total_damage = self.total_damage.saturating_add(u64::from(damage));
    }

    /// Times a weapon was fired
    pub fn uses(&self, weapon_id: &str) -> u32 {
        self.weapon_uses.get(weapon_id).copied().unwrap_or(0)
    }

    /// Most fired weapon (first by id on ties)
    pub fn favourite_weapon(&self) -> Option<&str> {
        self.weapon_uses
            .iter()
            .fold(None, |best: Option<(&String, u32)>, (id, &count)| match best {
                Some((_, top)) if top >= count => best,
                _ => Some((id, count)),
            })
            .map(|(id, _)| id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.total_damage == 0 && self.weapon_uses.is_empty()
    }

    /// Display name for a weapon id ("baseball-bat" -> "Baseball Bat")
    pub fn display_name(weapon_id: &str) -> String {
        weapon_id
            .split('-')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}
