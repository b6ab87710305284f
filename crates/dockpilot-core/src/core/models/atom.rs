use super::ids::ResidueId;
use nalgebra::Point3;

/// Distinguishes standard polymer records from hetero groups (ligands, waters, ions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    /// An `ATOM` record.
    #[default]
    Atom,
    /// A `HETATM` record.
    Hetero,
}

/// Represents a single atom read from a structure file.
///
/// Only the information needed to select atoms and bound them in space is kept:
/// identity (serial, name, element), ownership (parent residue), and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The atom name (e.g., "CA", "N", "O1").
    pub name: String,
    /// The element symbol, when the source file provides one.
    pub element: Option<String>,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// Whether the atom came from an `ATOM` or a `HETATM` record.
    pub record: RecordKind,
    /// Fraction of the site occupied by this conformer; 1.0 when the file leaves it blank.
    pub occupancy: f64,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` with a zero serial, no element, full occupancy and an `ATOM`
    /// record kind.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            element: None,
            residue_id,
            record: RecordKind::default(),
            occupancy: 1.0,
            position,
        }
    }

    pub fn is_hetero(&self) -> bool {
        self.record == RecordKind::Hetero
    }
}
