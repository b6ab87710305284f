use super::config::SelectionSpec;
use super::error::EngineError;
use super::selection::ChainResidueResolver;
use crate::core::grid::GridBox;
use nalgebra::Point3;
use tracing::debug;

/// Computes the padded search box for a selection of atoms.
///
/// For [`SelectionSpec::Blind`] every point in `points` is enclosed. For
/// [`SelectionSpec::Targeted`] only atoms of the listed residues, as reported by
/// `resolver`, are enclosed. Specifiers that match nothing are skipped.
///
/// # Errors
///
/// - [`EngineError::InvalidSelection`] for a targeted selection with no residues.
/// - [`EngineError::InvalidGrid`] for a negative or non-finite margin, or non-finite
///   coordinates.
/// - [`EngineError::NoAtomsSelected`] when nothing is left to enclose.
pub fn compute<R>(
    points: &[Point3<f64>],
    selection: &SelectionSpec,
    resolver: &R,
    margin: f64,
) -> Result<GridBox, EngineError>
where
    R: ChainResidueResolver + ?Sized,
{
    let grid = match selection {
        SelectionSpec::Blind => GridBox::enclosing(points, margin)?,
        SelectionSpec::Targeted(residues) => {
            if residues.is_empty() {
                return Err(EngineError::InvalidSelection(
                    "targeted selection requires at least one residue".into(),
                ));
            }
            let mut selected = Vec::new();
            for spec in residues {
                let positions = resolver.residue_positions(&spec.chain_id, spec.residue_number);
                if positions.is_empty() {
                    debug!("Residue {} matched no atoms", spec);
                }
                selected.extend(positions);
            }
            GridBox::enclosing(&selected, margin)?
        }
    };

    grid.ok_or(EngineError::NoAtomsSelected)
}
