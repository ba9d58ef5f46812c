use log::{debug, warn};

use crate::atom::Atom;
use crate::xyz::XYZ;

/// Atom id whose position is the shell origin unless told otherwise.
pub const DEFAULT_REFERENCE_ID: i64 = 1;

/// Origin used when the reference atom is missing. Far enough away that no
/// atom of a real structure is ever in range.
pub const FAR_AWAY: [f64; 3] = [1e10, 0.0, 0.0];

/// Position of the atom with `reference_id`, or [`FAR_AWAY`] if there is none.
pub fn locate_reference(atoms: &[Atom], reference_id: i64) -> XYZ {
    match atoms.iter().enumerate().find(|(_, a)| a.id == reference_id) {
        Some((i, atom)) => {
            debug!("reference atom {reference_id} at {:?}", atom.position);
            atom.xyz(i)
        }
        None => {
            warn!("reference atom {reference_id} not found, shell will be empty");
            XYZ::from(FAR_AWAY, usize::MAX)
        }
    }
}
