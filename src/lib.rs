mod arc_file;
mod atom;
mod cluster_file;
mod reference;
mod renumber;
mod selector;
mod xyz;

pub use arc_file::{ArcFile, ArcParsingError, NumericPolicy};
pub use atom::{Atom, DuplicateAtomId, Structure};
pub use cluster_file::ClusterFile;
pub use reference::{locate_reference, DEFAULT_REFERENCE_ID, FAR_AWAY};
pub use renumber::{DanglingBond, DanglingBondPolicy, Renumberer, MISSING_BOND};
pub use selector::{InvalidRadius, Selection, SelectionPolicy, ShellSelector};
pub use xyz::{within_cutoff, XYZ};

use itertools::Itertools;
use log::info;

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub policy: SelectionPolicy,
    pub radius: f64,
    pub reference_id: i64,
    pub dangling: DanglingBondPolicy,
    pub collapse_duplicates: bool,
}

impl ExtractConfig {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            radius: policy.default_radius(),
            reference_id: DEFAULT_REFERENCE_ID,
            dangling: DanglingBondPolicy::default(),
            collapse_duplicates: false,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::new(SelectionPolicy::Direct)
    }
}

/// Renumbered shell ready to be written.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub atoms: Vec<Atom>,
    /// Radius-qualifying atoms minus the reference, for the coordination policy.
    pub coordination_number: Option<usize>,
    /// Unresolved bonds, each `(atom, target)` pair once, in the order first met.
    pub dangling: Vec<DanglingBond>,
}

/// Locates the reference atom, selects the shell around it and renumbers it.
pub fn extract_shell(structure: &Structure, config: &ExtractConfig) -> Result<Extraction, InvalidRadius> {
    let selector = ShellSelector::new(config.policy, config.radius)?
        .collapse_duplicates(config.collapse_duplicates);
    let origin = locate_reference(structure.atoms(), config.reference_id);
    let selection = selector.select(structure, &origin);
    let coordination_number = match config.policy {
        SelectionPolicy::Coordination => selection.coordination_number(),
        SelectionPolicy::Direct => None,
    };
    let Selection {
        mut atoms,
        mut dangling,
        ..
    } = selection;
    dangling.extend(Renumberer::new(config.dangling).renumber(&mut atoms));
    let dangling = dangling.into_iter().unique().collect::<Vec<_>>();
    info!(
        "extracted {} atoms, {} dangling bonds",
        atoms.len(),
        dangling.len()
    );
    Ok(Extraction {
        atoms,
        coordination_number,
        dangling,
    })
}
