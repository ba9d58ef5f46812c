use std::collections::HashMap;
use std::fmt;

use crate::xyz::XYZ;

/// One atom record as read from an `.arc` snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub id: i64,
    pub element: String,
    pub position: [f64; 3],
    pub atom_type: String,
    pub bonds: Vec<i64>,
    /// Set by the renumbering pass, `None` before that.
    pub new_id: Option<usize>,
}

impl Atom {
    pub fn new(
        id: i64,
        element: impl Into<String>,
        position: [f64; 3],
        atom_type: impl Into<String>,
        bonds: Vec<i64>,
    ) -> Self {
        Self {
            id,
            element: element.into(),
            position,
            atom_type: atom_type.into(),
            bonds,
            new_id: None,
        }
    }

    #[inline]
    pub fn xyz(&self, index: usize) -> XYZ {
        XYZ::from(self.position, index)
    }

    /// Replaces the original id with the assigned `new_id`, so the record can
    /// be fed back into another pass.
    pub fn into_renumbered(self) -> Self {
        match self.new_id {
            Some(new_id) => Self {
                id: new_id as i64,
                new_id: None,
                ..self
            },
            None => self,
        }
    }
}

/// `id` seen a second time, at position `index` of the input.
#[derive(Debug)]
pub struct DuplicateAtomId {
    pub id: i64,
    pub index: usize,
}

impl fmt::Display for DuplicateAtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate atom id {} at position {}", self.id, self.index)
    }
}

impl std::error::Error for DuplicateAtomId {}

/// Atoms in input order plus an id lookup into that order.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    atoms: Vec<Atom>,
    index: HashMap<i64, usize>,
}

impl Structure {
    pub fn new(atoms: Vec<Atom>) -> Result<Self, DuplicateAtomId> {
        let mut index = HashMap::with_capacity(atoms.len());
        for (i, atom) in atoms.iter().enumerate() {
            if index.insert(atom.id, i).is_some() {
                return Err(DuplicateAtomId { id: atom.id, index: i });
            }
        }
        Ok(Self { atoms, index })
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Atom> {
        self.index.get(&id).map(|&i| &self.atoms[i])
    }

    pub fn get_coordinates(&self) -> Vec<XYZ> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| atom.xyz(i))
            .collect()
    }
}
