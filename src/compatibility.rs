use std::collections::{BTreeMap, BTreeSet};

use crate::db::ComponentKind;

/// Which component kinds may be wired to which.
///
/// Entries are directional: `a -> b` being allowed says nothing about
/// `b -> a`. A kind without an entry can't be wired to anything.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityTable {
    partners: BTreeMap<ComponentKind, BTreeSet<ComponentKind>>,
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        ComponentKind::ALL
            .iter()
            .fold(Self::empty(), |table, kind| {
                table.with_entry(*kind, kind.default_partners())
            })
    }
}

impl CompatibilityTable {
    pub fn empty() -> Self {
        Self {
            partners: BTreeMap::new(),
        }
    }

    /// Add `partners` to the set allowed from `kind`.
    pub fn with_entry(mut self, kind: ComponentKind, partners: &[ComponentKind]) -> Self {
        self.partners
            .entry(kind)
            .or_default()
            .extend(partners.iter().copied());
        self
    }

    pub fn partners(&self, kind: ComponentKind) -> impl Iterator<Item = ComponentKind> + '_ {
        self.partners.get(&kind).into_iter().flatten().copied()
    }

    pub fn is_compatible(&self, from: ComponentKind, to: ComponentKind) -> bool {
        from != to && self.partners.get(&from).is_some_and(|set| set.contains(&to))
    }

    /// Pairs allowed in one direction only.
    pub fn asymmetric_pairs(&self) -> Vec<(ComponentKind, ComponentKind)> {
        let mut out = Vec::new();
        for (&from, set) in &self.partners {
            for &to in set {
                if self.is_compatible(from, to) && !self.is_compatible(to, from) {
                    out.push((from, to));
                }
            }
        }
        out
    }
}
