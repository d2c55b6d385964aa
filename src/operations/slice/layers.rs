use rayon::prelude::*;
use tracing::info;

use crate::error::{Defect, OperationError, Result};
use crate::geometry::Loop;
use crate::mesh::MeshModel;
use crate::operations::classify::ClassifyLoops;
use crate::params::SliceParams;

use super::{SliceAtZ, SliceStrategy};

/// One sliced and classified layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Position in the stack, starting at 0 for the bottom layer.
    pub index: usize,
    pub z: f64,
    /// Classified loops; may be empty.
    pub loops: Vec<Loop>,
    pub strategy: SliceStrategy,
    pub defects: Vec<Defect>,
}

/// Slices a whole mesh into a stack of classified layers.
///
/// The first plane sits `first_layer_height` above the mesh bottom and the
/// rest follow every `layer_height` while below the mesh top. Layers are
/// sliced in parallel and returned in ascending z.
#[derive(Debug)]
pub struct SliceLayers {
    params: SliceParams,
}

impl SliceLayers {
    #[must_use]
    pub fn new(params: SliceParams) -> Self {
        Self { params }
    }

    /// Executes the slicing.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if the parameters are invalid
    /// - `OperationError::EmptyRange` if no plane fits inside the mesh
    pub fn execute(&self, mesh: &MeshModel) -> Result<Vec<Layer>> {
        self.params.validate()?;
        let heights = self.layer_heights(mesh.z_bounds())?;
        info!(layers = heights.len(), strategy = ?self.params.strategy, "slicing mesh");

        let mut layers = heights
            .par_iter()
            .enumerate()
            .map(|(index, &z)| -> Result<Layer> {
                let outcome = SliceAtZ::new(z)
                    .with_import_radius(self.params.import_radius)
                    .with_strategy(self.params.strategy)
                    .execute(mesh)?;
                Ok(Layer {
                    index,
                    z,
                    loops: ClassifyLoops::new(outcome.loops).execute(),
                    strategy: outcome.strategy,
                    defects: outcome.defects,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        layers.sort_by(|a, b| a.z.total_cmp(&b.z));

        let defects: usize = layers.iter().map(|l| l.defects.len()).sum();
        info!(layers = layers.len(), defects, "sliced mesh");
        Ok(layers)
    }

    #[allow(clippy::cast_precision_loss)]
    fn layer_heights(&self, (low, high): (f64, f64)) -> Result<Vec<f64>> {
        let mut heights = Vec::new();
        let mut z = low + self.params.first_layer_height;
        while z < high {
            heights.push(z);
            z = low + self.params.first_layer_height
                + heights.len() as f64 * self.params.layer_height;
        }
        if heights.is_empty() {
            return Err(OperationError::EmptyRange {
                min: low,
                max: high,
            }
            .into());
        }
        Ok(heights)
    }
}
