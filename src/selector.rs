use log::{debug, warn};
use std::collections::HashSet;
use std::fmt;

use crate::atom::{Atom, Structure};
use crate::renumber::DanglingBond;
use crate::xyz::{within_cutoff, XYZ};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Every atom closer to the origin than the radius, in input order.
    Direct,
    /// Every atom closer than the radius, each followed by the atoms it bonds to.
    Coordination,
}

impl SelectionPolicy {
    pub fn default_radius(self) -> f64 {
        match self {
            SelectionPolicy::Direct => 2.8,
            SelectionPolicy::Coordination => 3.1,
        }
    }
}

#[derive(Debug)]
pub struct InvalidRadius(pub f64);

impl fmt::Display for InvalidRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shell radius must be finite and non-negative, got {}", self.0)
    }
}

impl std::error::Error for InvalidRadius {}

/// Atoms picked for a shell, copied out of the structure in selection order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub atoms: Vec<Atom>,
    /// Number of atoms that passed the radius test themselves.
    pub coordination: usize,
    pub dangling: Vec<DanglingBond>,
}

impl Selection {
    /// Radius-qualifying atoms minus the reference atom itself.
    pub fn coordination_number(&self) -> Option<usize> {
        self.coordination.checked_sub(1)
    }
}

pub struct ShellSelector {
    policy: SelectionPolicy,
    radius: f64,
    collapse_duplicates: bool,
}

impl ShellSelector {
    pub fn new(policy: SelectionPolicy, radius: f64) -> Result<Self, InvalidRadius> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(InvalidRadius(radius));
        }
        Ok(Self {
            policy,
            radius,
            collapse_duplicates: false,
        })
    }

    /// Keep only the first copy of each atom id when bond expansion reaches
    /// an atom more than once. Has no effect on [`SelectionPolicy::Direct`].
    pub fn collapse_duplicates(mut self, collapse: bool) -> Self {
        self.collapse_duplicates = collapse;
        self
    }

    pub fn select(&self, structure: &Structure, origin: &XYZ) -> Selection {
        let selection = match self.policy {
            SelectionPolicy::Direct => self.select_direct(structure, origin),
            SelectionPolicy::Coordination => self.select_coordination(structure, origin),
        };
        debug!(
            "selected {} of {} atoms within {}",
            selection.atoms.len(),
            structure.len(),
            self.radius
        );
        selection
    }

    fn select_direct(&self, structure: &Structure, origin: &XYZ) -> Selection {
        if structure.is_empty() {
            return Selection::default();
        }
        let coords = structure.get_coordinates();
        let tree = kd_tree::KdTree::build_by_ordered_float(coords);
        let mut indices = tree
            .within_radius(origin, self.radius)
            .into_iter()
            .filter(|xyz| within_cutoff(origin, xyz, self.radius))
            .map(|xyz| xyz.index())
            .collect::<Vec<_>>();
        indices.sort_unstable();
        let atoms = indices
            .into_iter()
            .map(|i| structure.atoms()[i].clone())
            .collect::<Vec<_>>();
        Selection {
            coordination: atoms.len(),
            atoms,
            dangling: Vec::new(),
        }
    }

    fn select_coordination(&self, structure: &Structure, origin: &XYZ) -> Selection {
        let mut selection = Selection::default();
        let mut seen = HashSet::new();
        let mut push = |atoms: &mut Vec<Atom>, atom: &Atom| {
            if !self.collapse_duplicates || seen.insert(atom.id) {
                atoms.push(atom.clone());
            }
        };
        for (i, atom) in structure.atoms().iter().enumerate() {
            if !within_cutoff(origin, &atom.xyz(i), self.radius) {
                continue;
            }
            selection.coordination += 1;
            push(&mut selection.atoms, atom);
            for &target_id in &atom.bonds {
                match structure.get(target_id) {
                    Some(neighbour) => push(&mut selection.atoms, neighbour),
                    None => {
                        let bond = DanglingBond {
                            atom_id: atom.id,
                            target_id,
                        };
                        warn!("skipping neighbour: {bond}");
                        selection.dangling.push(bond);
                    }
                }
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{locate_reference, DEFAULT_REFERENCE_ID};

    fn structure(atoms: Vec<Atom>) -> Structure {
        Structure::new(atoms).unwrap()
    }

    fn ids(selection: &Selection) -> Vec<i64> {
        selection.atoms.iter().map(|a| a.id).collect()
    }

    fn select(s: &Structure, policy: SelectionPolicy, radius: f64) -> Selection {
        let origin = locate_reference(s.atoms(), DEFAULT_REFERENCE_ID);
        ShellSelector::new(policy, radius)
            .unwrap()
            .select(s, &origin)
    }

    fn lattice() -> Structure {
        let mut atoms = Vec::new();
        let mut id = 100;
        for x in -2..=2 {
            for y in -2..=2 {
                for z in -2..=2 {
                    id += 1;
                    atoms.push(Atom::new(
                        id,
                        "O",
                        [x as f64 * 0.9, y as f64 * 1.1, z as f64 * 0.7],
                        "L",
                        vec![],
                    ));
                }
            }
        }
        atoms.push(Atom::new(1, "La", [0.05, -0.1, 0.2], "M", vec![]));
        structure(atoms)
    }

    #[test]
    fn test_direct_matches_linear_scan() {
        let s = lattice();
        let origin = locate_reference(s.atoms(), DEFAULT_REFERENCE_ID);
        for radius in [0.0, 0.5, 1.0, 1.4, 2.0, 2.8, 10.0] {
            let want = s
                .atoms()
                .iter()
                .enumerate()
                .filter(|(i, a)| within_cutoff(&origin, &a.xyz(*i), radius))
                .map(|(_, a)| a.id)
                .collect::<Vec<_>>();
            let got = select(&s, SelectionPolicy::Direct, radius);
            assert_eq!(ids(&got), want, "radius {radius}");
        }
    }

    #[test]
    fn test_direct_excludes_boundary() {
        let s = structure(vec![
            Atom::new(1, "La", [0.0, 0.0, 0.0], "M", vec![]),
            Atom::new(2, "O", [2.0, 0.0, 0.0], "L", vec![1]),
            Atom::new(3, "O", [0.0, 1.5, 0.0], "L", vec![]),
        ]);
        let got = select(&s, SelectionPolicy::Direct, 2.0);
        assert_eq!(ids(&got), vec![1, 3]);
    }

    #[test]
    fn test_direct_keeps_input_order() {
        let s = structure(vec![
            Atom::new(9, "O", [0.5, 0.0, 0.0], "L", vec![]),
            Atom::new(1, "La", [0.0, 0.0, 0.0], "M", vec![]),
            Atom::new(4, "O", [-0.5, 0.0, 0.0], "L", vec![]),
        ]);
        let got = select(&s, SelectionPolicy::Direct, 1.0);
        assert_eq!(ids(&got), vec![9, 1, 4]);
    }

    #[test]
    fn test_missing_reference_selects_nothing() {
        let s = structure(vec![
            Atom::new(2, "O", [0.0, 0.0, 0.0], "L", vec![3]),
            Atom::new(3, "O", [1.0, 0.0, 0.0], "L", vec![2]),
        ]);
        assert!(select(&s, SelectionPolicy::Direct, 100.0).atoms.is_empty());
        let got = select(&s, SelectionPolicy::Coordination, 100.0);
        assert!(got.atoms.is_empty());
        assert_eq!(got.coordination_number(), None);
    }

    #[test]
    fn test_coordination_pulls_in_bonded_atoms() {
        let s = structure(vec![
            Atom::new(1, "La", [0.0, 0.0, 0.0], "M", vec![2]),
            Atom::new(2, "O", [1.0, 0.0, 0.0], "L", vec![1]),
        ]);
        let got = select(&s, SelectionPolicy::Coordination, 0.5);
        assert_eq!(ids(&got), vec![1, 2]);
        assert_eq!(got.coordination, 1);
        assert_eq!(got.coordination_number(), Some(0));
    }

    #[test]
    fn test_coordination_keeps_duplicates() {
        let s = structure(vec![
            Atom::new(1, "La", [0.0, 0.0, 0.0], "M", vec![2]),
            Atom::new(2, "O", [1.0, 0.0, 0.0], "L", vec![1]),
            Atom::new(3, "O", [9.0, 0.0, 0.0], "L", vec![1]),
        ]);
        let got = select(&s, SelectionPolicy::Coordination, 3.1);
        assert_eq!(ids(&got), vec![1, 2, 2, 1]);
        assert_eq!(got.coordination, 2);
        assert_eq!(got.coordination_number(), Some(1));
    }

    #[test]
    fn test_coordination_collapse_duplicates() {
        let s = structure(vec![
            Atom::new(1, "La", [0.0, 0.0, 0.0], "M", vec![2, 3]),
            Atom::new(2, "O", [1.0, 0.0, 0.0], "L", vec![1, 3]),
            Atom::new(3, "O", [9.0, 0.0, 0.0], "L", vec![1]),
        ]);
        let origin = locate_reference(s.atoms(), DEFAULT_REFERENCE_ID);
        let got = ShellSelector::new(SelectionPolicy::Coordination, 3.1)
            .unwrap()
            .collapse_duplicates(true)
            .select(&s, &origin);
        assert_eq!(ids(&got), vec![1, 2, 3]);
        assert_eq!(got.coordination, 2);
    }

    #[test]
    fn test_coordination_skips_dangling_bond() {
        let s = structure(vec![
            Atom::new(1, "La", [0.0, 0.0, 0.0], "M", vec![99, 2]),
            Atom::new(2, "O", [5.0, 0.0, 0.0], "L", vec![]),
        ]);
        let got = select(&s, SelectionPolicy::Coordination, 3.1);
        assert_eq!(ids(&got), vec![1, 2]);
        assert_eq!(
            got.dangling,
            vec![DanglingBond {
                atom_id: 1,
                target_id: 99
            }]
        );
    }

    #[test]
    fn test_coordination_does_not_mutate_structure() {
        let s = structure(vec![
            Atom::new(1, "La", [0.0, 0.0, 0.0], "M", vec![2]),
            Atom::new(2, "O", [1.0, 0.0, 0.0], "L", vec![1]),
        ]);
        let before = s.atoms().to_vec();
        let mut got = select(&s, SelectionPolicy::Coordination, 3.1);
        got.atoms[0].bonds.clear();
        assert_eq!(s.atoms(), before.as_slice());
    }

    #[test]
    fn test_invalid_radius() {
        assert!(ShellSelector::new(SelectionPolicy::Direct, -1.0).is_err());
        assert!(ShellSelector::new(SelectionPolicy::Direct, f64::NAN).is_err());
        assert!(ShellSelector::new(SelectionPolicy::Coordination, f64::INFINITY).is_err());
        assert!(ShellSelector::new(SelectionPolicy::Coordination, 0.0).is_ok());
    }
}
