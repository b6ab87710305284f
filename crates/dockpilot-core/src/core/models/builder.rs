use super::atom::{Atom, RecordKind};
use super::ids::{ChainId, ResidueId};
use super::structure::Structure;
use nalgebra::Point3;

/// Incrementally assembles a [`Structure`] from records arriving in file order.
///
/// The builder remembers the current chain and residue so that consecutive records
/// for the same residue do not repeat map lookups. Records that precede any `MODEL`
/// belong to model 0.
pub struct StructureBuilder {
    structure: Structure,
    model: usize,
    model_has_atoms: bool,
    current_chain: Option<(String, ChainId)>,
    current_residue: Option<(isize, Option<char>, ResidueId)>,
}

impl Default for StructureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self {
            structure: Structure::new(),
            model: 0,
            model_has_atoms: false,
            current_chain: None,
            current_residue: None,
        }
    }

    /// Begins a new model. A model that received no atoms yet is reused.
    pub fn start_model(&mut self) -> &mut Self {
        if self.model_has_atoms {
            self.model += 1;
            self.model_has_atoms = false;
        }
        self.current_chain = None;
        self.current_residue = None;
        self
    }

    pub fn start_chain(&mut self, id: &str) -> &mut Self {
        let already_current = self
            .current_chain
            .as_ref()
            .is_some_and(|(current, _)| current == id);
        if !already_current {
            let chain_id = self.structure.add_chain(self.model, id);
            self.current_chain = Some((id.to_string(), chain_id));
            self.current_residue = None;
        }
        self
    }

    pub fn start_residue(
        &mut self,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> &mut Self {
        let already_current = self
            .current_residue
            .is_some_and(|(n, ic, _)| n == number && ic == insertion_code);
        if already_current {
            return self;
        }
        if self.current_chain.is_none() {
            self.start_chain("");
        }
        let chain_id = match &self.current_chain {
            Some((_, id)) => *id,
            None => return self,
        };
        if let Some(residue_id) = self
            .structure
            .add_residue(chain_id, number, insertion_code, name)
        {
            self.current_residue = Some((number, insertion_code, residue_id));
        }
        self
    }

    /// Adds an atom to the current residue.
    ///
    /// A residue keeps one atom per name. When a name repeats (alternate locations of a
    /// disordered atom) the conformer with the highest occupancy is kept, and on a tie
    /// the first one read.
    ///
    /// Returns `false` when no residue has been started or when the atom lost to an
    /// already recorded conformer.
    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        element: Option<&str>,
        record: RecordKind,
        occupancy: f64,
        position: Point3<f64>,
    ) -> bool {
        let Some((_, _, residue_id)) = self.current_residue else {
            return false;
        };
        let mut atom = Atom::new(name, residue_id, position);
        atom.serial = serial;
        atom.element = element.map(str::to_string);
        atom.record = record;
        atom.occupancy = occupancy;

        let existing = self
            .structure
            .residue(residue_id)
            .and_then(|residue| residue.get_atom_id_by_name(name));
        if let Some(existing_id) = existing {
            return match self.structure.atom_mut(existing_id) {
                Some(kept) if occupancy > kept.occupancy => {
                    *kept = atom;
                    true
                }
                _ => false,
            };
        }

        let added = self.structure.add_atom_to_residue(residue_id, atom).is_some();
        self.model_has_atoms |= added;
        added
    }

    pub fn atom_count(&self) -> usize {
        self.structure.atom_count()
    }

    pub fn build(self) -> Structure {
        self.structure
    }
}
