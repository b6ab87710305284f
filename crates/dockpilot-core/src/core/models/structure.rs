use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Represents a parsed macromolecular structure: chains, residues and atoms.
///
/// Storage is arena based (slot maps) so that ids stay stable while the structure is
/// being assembled. Atom iteration follows insertion order, which for structures read
/// from disk is the file order.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    atoms: SlotMap<AtomId, Atom>,
    residues: SlotMap<ResidueId, Residue>,
    chains: SlotMap<ChainId, Chain>,
    /// Chains in the order they were first seen.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain, sequence number and insertion code.
    residue_id_map: HashMap<(ChainId, isize, Option<char>), ResidueId>,
    /// Lookup map for finding chains by model index and identifier.
    chain_id_map: HashMap<(usize, String), ChainId>,
}

impl Structure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub(crate) fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns the chains in the order they first appeared.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Finds a chain ID by its identifier, in the first model that has it.
    ///
    /// # Arguments
    ///
    /// * `id` - The chain identifier as written in the source file.
    ///
    /// # Return
    ///
    /// Returns `Some(ChainId)` if the chain exists, otherwise `None`.
    pub fn find_chain_by_id(&self, id: &str) -> Option<ChainId> {
        self.find_chains_by_id(id).next()
    }

    /// Returns the chain carrying `id` in every model, in model order.
    pub fn find_chains_by_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = ChainId> + 'a {
        self.chains_iter()
            .filter(move |(_, chain)| chain.id == id)
            .map(|(chain_id, _)| chain_id)
    }

    /// Finds a residue by its chain, sequence number and insertion code.
    pub fn find_residue(
        &self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, number, insertion_code))
            .copied()
    }

    /// Returns every residue of a chain carrying the given sequence number,
    /// regardless of insertion code.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain to search.
    /// * `number` - The residue sequence number.
    pub fn residues_by_number(
        &self,
        chain_id: ChainId,
        number: isize,
    ) -> impl Iterator<Item = ResidueId> + '_ {
        self.chains
            .get(chain_id)
            .map(|chain| chain.residues.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(move |&id| self.residues.get(id).is_some_and(|r| r.number == number))
    }

    /// Returns the positions of every atom, in insertion order.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.values().map(|atom| atom.position).collect()
    }

    /// Adds a new chain to a model or returns the existing one.
    ///
    /// This method is idempotent; if the model already has a chain with the given
    /// identifier, its ID is returned without creating a duplicate.
    pub fn add_chain(&mut self, model: usize, id: &str) -> ChainId {
        let key = (model, id.to_string());
        if let Some(&existing) = self.chain_id_map.get(&key) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(model, id));
        self.chain_id_map.insert(key, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// # Return
    ///
    /// Returns `None` if the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, number, insertion_code);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(number, insertion_code, name, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// # Return
    ///
    /// Returns `None` if the residue does not exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues[residue_id].add_atom(&name, atom_id);
        Some(atom_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRefs {
        chain_a: ChainId,
        gly_id: ResidueId,
        gly_ca_id: AtomId,
        ala_id: ResidueId,
        ala_ins_id: ResidueId,
    }

    fn create_test_structure() -> (Structure, TestRefs) {
        let mut structure = Structure::new();

        let chain_a = structure.add_chain(0, "A");
        let gly_id = structure.add_residue(chain_a, 1, None, "GLY").unwrap();
        structure
            .add_atom_to_residue(gly_id, Atom::new("N", gly_id, Point3::new(0.0, 0.0, 0.0)))
            .unwrap();
        let gly_ca_id = structure
            .add_atom_to_residue(gly_id, Atom::new("CA", gly_id, Point3::new(1.4, 0.0, 0.0)))
            .unwrap();

        let ala_id = structure.add_residue(chain_a, 2, None, "ALA").unwrap();
        structure
            .add_atom_to_residue(ala_id, Atom::new("CA", ala_id, Point3::new(2.0, 1.0, 0.0)))
            .unwrap();
        let ala_ins_id = structure.add_residue(chain_a, 2, Some('A'), "ALA").unwrap();
        structure
            .add_atom_to_residue(
                ala_ins_id,
                Atom::new("CA", ala_ins_id, Point3::new(3.0, 1.0, 0.0)),
            )
            .unwrap();

        let chain_b = structure.add_chain(0, "B");
        let hoh_id = structure.add_residue(chain_b, 2, None, "HOH").unwrap();
        structure
            .add_atom_to_residue(hoh_id, Atom::new("O", hoh_id, Point3::new(9.0, 9.0, 9.0)))
            .unwrap();

        (
            structure,
            TestRefs {
                chain_a,
                gly_id,
                gly_ca_id,
                ala_id,
                ala_ins_id,
            },
        )
    }

    #[test]
    fn structure_creation_and_access() {
        let (structure, refs) = create_test_structure();

        assert_eq!(structure.atom_count(), 5);
        assert_eq!(structure.residues_iter().count(), 4);
        assert_eq!(structure.chains_iter().count(), 2);
        assert_eq!(structure.find_chain_by_id("A"), Some(refs.chain_a));
        assert!(structure.find_chain_by_id("C").is_none());
        assert_eq!(
            structure.find_residue(refs.chain_a, 1, None),
            Some(refs.gly_id)
        );
        assert_eq!(structure.atom(refs.gly_ca_id).unwrap().name, "CA");
        assert_eq!(
            structure
                .residue(refs.gly_id)
                .unwrap()
                .get_atom_id_by_name("CA"),
            Some(refs.gly_ca_id)
        );
    }

    #[test]
    fn add_chain_and_residue_are_idempotent() {
        let (mut structure, refs) = create_test_structure();
        assert_eq!(structure.add_chain(0, "A"), refs.chain_a);
        assert_eq!(
            structure.add_residue(refs.chain_a, 1, None, "GLY"),
            Some(refs.gly_id)
        );
        assert_eq!(structure.chain(refs.chain_a).unwrap().residues().len(), 3);
    }

    #[test]
    fn chains_with_one_id_are_kept_apart_per_model() {
        let (mut structure, refs) = create_test_structure();
        let model_two_a = structure.add_chain(1, "A");
        assert_ne!(model_two_a, refs.chain_a);
        assert_eq!(structure.chain(model_two_a).unwrap().model, 1);
        assert_eq!(structure.find_chain_by_id("A"), Some(refs.chain_a));
        assert_eq!(
            structure.find_chains_by_id("A").collect::<Vec<_>>(),
            vec![refs.chain_a, model_two_a]
        );
    }

    #[test]
    fn residues_by_number_spans_insertion_codes_within_one_chain() {
        let (structure, refs) = create_test_structure();
        let found: Vec<_> = structure.residues_by_number(refs.chain_a, 2).collect();
        assert_eq!(found, vec![refs.ala_id, refs.ala_ins_id]);
        assert_eq!(structure.residues_by_number(refs.chain_a, 42).count(), 0);
    }

    #[test]
    fn chains_iter_preserves_first_seen_order() {
        let (structure, _) = create_test_structure();
        let ids: Vec<_> = structure
            .chains_iter()
            .map(|(_, chain)| chain.id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn positions_follow_insertion_order() {
        let (structure, _) = create_test_structure();
        let positions = structure.positions();
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(positions[4], Point3::new(9.0, 9.0, 9.0));
    }

    #[test]
    fn adding_atom_to_unknown_residue_fails() {
        let mut empty = Structure::new();
        let foreign = ResidueId::from(slotmap::KeyData::from_ffi(7));
        assert!(
            empty
                .add_atom_to_residue(foreign, Atom::new("X", foreign, Point3::origin()))
                .is_none()
        );
        assert_eq!(empty.atom_count(), 0);
    }
}
