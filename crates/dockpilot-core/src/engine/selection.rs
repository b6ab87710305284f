use crate::core::models::structure::Structure;
use nalgebra::Point3;

/// Resolves `chain + residue number` to atom coordinates.
///
/// Implementations must match every residue carrying the number, whatever its
/// insertion code, and return nothing for an unknown chain or number.
pub trait ChainResidueResolver {
    fn residue_positions(&self, chain_id: &str, residue_number: isize) -> Vec<Point3<f64>>;
}

impl ChainResidueResolver for Structure {
    fn residue_positions(&self, chain_id: &str, residue_number: isize) -> Vec<Point3<f64>> {
        self.find_chains_by_id(chain_id)
            .flat_map(|chain| self.residues_by_number(chain, residue_number))
            .filter_map(|residue_id| self.residue(residue_id))
            .flat_map(|residue| residue.atoms().iter())
            .filter_map(|&atom_id| self.atom(atom_id))
            .map(|atom| atom.position)
            .collect()
    }
}
