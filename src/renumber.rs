use log::warn;
use std::collections::HashMap;
use std::fmt;

use crate::atom::Atom;

/// Bond value written for a target that has no new id under
/// [`DanglingBondPolicy::Legacy`].
pub const MISSING_BOND: i64 = 0;

/// A bond from `atom_id` to `target_id` that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DanglingBond {
    pub atom_id: i64,
    pub target_id: i64,
}

impl fmt::Display for DanglingBond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atom {} bonds to missing atom {}", self.atom_id, self.target_id)
    }
}

/// What to write for a bond whose target was not selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DanglingBondPolicy {
    /// Keep the entry and write [`MISSING_BOND`] in its place.
    Legacy,
    /// Remove the entry from the bond list.
    #[default]
    Drop,
}

pub struct Renumberer {
    policy: DanglingBondPolicy,
}

impl Renumberer {
    pub fn new(policy: DanglingBondPolicy) -> Self {
        Self { policy }
    }

    /// Assigns `new_id = position + 1` to every atom and rewrites bond lists
    /// to the new ids. Every unresolved bond is reported, whatever the policy.
    ///
    /// When the same original id occurs more than once each copy gets its own
    /// `new_id`, and bonds to that id resolve to the last copy.
    pub fn renumber(&self, atoms: &mut [Atom]) -> Vec<DanglingBond> {
        let mut ids = HashMap::with_capacity(atoms.len());
        for (i, atom) in atoms.iter_mut().enumerate() {
            atom.new_id = Some(i + 1);
            ids.insert(atom.id, (i + 1) as i64);
        }
        let mut dangling = Vec::new();
        for atom in atoms.iter_mut() {
            let atom_id = atom.id;
            let mut report = |target_id| {
                let bond = DanglingBond { atom_id, target_id };
                warn!("{bond}");
                dangling.push(bond);
            };
            atom.bonds = match self.policy {
                DanglingBondPolicy::Legacy => atom
                    .bonds
                    .iter()
                    .map(|target| {
                        ids.get(target).copied().unwrap_or_else(|| {
                            report(*target);
                            MISSING_BOND
                        })
                    })
                    .collect(),
                DanglingBondPolicy::Drop => atom
                    .bonds
                    .iter()
                    .filter_map(|target| {
                        let new_id = ids.get(target).copied();
                        if new_id.is_none() {
                            report(*target);
                        }
                        new_id
                    })
                    .collect(),
            };
        }
        dangling
    }
}

impl Default for Renumberer {
    fn default() -> Self {
        Self::new(DanglingBondPolicy::default())
    }
}
