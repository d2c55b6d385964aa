//! Slicing parameters.

use crate::error::{OperationError, Result};
use crate::operations::slice::SliceStrategy;

/// Scalar parameters supplied by the caller's configuration layer.
#[derive(Debug, Clone, Copy)]
pub struct SliceParams {
    /// Distance between consecutive layer planes.
    pub layer_height: f64,

    /// Height of the first plane above the mesh bottom.
    pub first_layer_height: f64,

    /// Width of one extruded perimeter; inset radii are derived from it.
    pub perimeter_width: f64,

    /// Gap radius the gap-spanning slicer bridges.
    pub import_radius: f64,

    /// How each plane is intersected with the mesh.
    pub strategy: SliceStrategy,
}

impl Default for SliceParams {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            first_layer_height: 0.3,
            perimeter_width: 0.4,
            import_radius: 0.2,
            strategy: SliceStrategy::Auto,
        }
    }
}

impl SliceParams {
    /// Set layer height.
    #[must_use]
    pub const fn with_layer_height(mut self, height: f64) -> Self {
        self.layer_height = height;
        self
    }

    /// Set first layer height.
    #[must_use]
    pub const fn with_first_layer_height(mut self, height: f64) -> Self {
        self.first_layer_height = height;
        self
    }

    /// Set perimeter width. The import radius follows at half the width.
    #[must_use]
    pub fn with_perimeter_width(mut self, width: f64) -> Self {
        self.perimeter_width = width;
        self.import_radius = 0.5 * width;
        self
    }

    /// Set the gap-spanning import radius.
    #[must_use]
    pub const fn with_import_radius(mut self, radius: f64) -> Self {
        self.import_radius = radius;
        self
    }

    /// Set the slicing strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: SliceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Radius of the outermost perimeter's centre line inside a boundary.
    #[must_use]
    pub fn perimeter_inset(&self) -> f64 {
        0.5 * self.perimeter_width
    }

    /// Checks that every length is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("layer_height", self.layer_height),
            ("first_layer_height", self.first_layer_height),
            ("perimeter_width", self.perimeter_width),
            ("import_radius", self.import_radius),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(OperationError::InvalidInput(format!(
                    "{name} must be positive, got {value}"
                ))
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SliceParams::default().validate().is_ok());
    }

    #[test]
    fn perimeter_width_drives_import_radius() {
        let params = SliceParams::default().with_perimeter_width(0.8);
        assert!((params.import_radius - 0.4).abs() < 1e-12);
        assert!((params.perimeter_inset() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_lengths() {
        let params = SliceParams::default().with_layer_height(0.0);
        let err = params.validate().unwrap_err();
        assert!(format!("{err}").contains("layer_height"));

        let params = SliceParams::default().with_import_radius(f64::NAN);
        assert!(params.validate().is_err());
    }
}
