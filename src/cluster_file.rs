use anyhow::{Context, Result};
use itertools::Itertools;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::atom::Atom;

/// Renumbered shell written as `.xyz`: atom count, blank line, then
/// `new_id element x y z type [bond ...]` per atom.
pub struct ClusterFile<'a> {
    atoms: &'a [Atom],
}

impl<'a> ClusterFile<'a> {
    pub fn new(atoms: &'a [Atom]) -> Self {
        Self { atoms }
    }

    pub fn write(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "{}\n", self.atoms.len())?;
        for (i, atom) in self.atoms.iter().enumerate() {
            let new_id = atom.new_id.unwrap_or(i + 1);
            let [x, y, z] = atom.position;
            write!(
                w,
                "{new_id} {} {x:.6} {y:.6} {z:.6} {} ",
                atom.element, atom.atom_type
            )?;
            if !atom.bonds.is_empty() {
                write!(w, "{} ", atom.bonds.iter().join(" "))?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let f = fs::File::create(path).context(format!(
            "Failed to create new fragment file: {}",
            path.to_string_lossy()
        ))?;
        let mut w = io::BufWriter::new(f);
        self.write(&mut w)?;
        w.flush()?;
        Ok(())
    }
}
