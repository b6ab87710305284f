use super::ids::ResidueId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: String,                      // Chain identifier as written in the file (may be empty)
    pub model: usize,                    // Zero-based index of the MODEL the chain belongs to
    pub(crate) residues: Vec<ResidueId>, // Residues in file order
}

impl Chain {
    pub(crate) fn new(model: usize, id: &str) -> Self {
        Self {
            id: id.to_string(),
            model,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }
}
