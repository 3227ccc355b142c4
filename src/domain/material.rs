//! Material records and their mechanical properties.

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, StoreError};

/// The six mechanical properties tracked per material.
///
/// Each field is `None` until a value has been recorded. The same struct
/// doubles as the patch for [`set_properties`]: fields left `None` in a
/// patch are not touched by the update.
///
/// Units follow the printed tables the data comes from: density in
/// kg/m³, moduli in GPa, strengths in MPa, elongation in percent.
///
/// [`set_properties`]: crate::infra::db::repository::MaterialRepository::set_properties
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Properties {
    pub density: Option<f64>,
    pub modulus_of_elasticity: Option<f64>,
    pub modulus_of_rigidity: Option<f64>,
    pub yield_strength: Option<f64>,
    pub ultimate_tensile_strength: Option<f64>,
    pub percent_elongation: Option<f64>,
}

impl Properties {
    /// Column names in the order used by the schema and the views.
    pub const COLUMNS: [&'static str; 6] = [
        "density",
        "modulus_of_elasticity",
        "modulus_of_rigidity",
        "yield_strength",
        "ultimate_tensile_strength",
        "percent_elongation",
    ];

    /// Field values in [`Self::COLUMNS`] order.
    pub fn values(&self) -> [Option<f64>; 6] {
        [
            self.density,
            self.modulus_of_elasticity,
            self.modulus_of_rigidity,
            self.yield_strength,
            self.ultimate_tensile_strength,
            self.percent_elongation,
        ]
    }

    /// True if no field is set.
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }

    /// Reject values that are physically meaningless as a measurement.
    ///
    /// All six quantities are non-negative, and NaN/infinities would
    /// poison the category averages.
    pub fn validate(&self) -> Result<()> {
        for (column, value) in Self::COLUMNS.iter().zip(self.values()) {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(StoreError::Validation(format!(
                        "{column} must be a finite number"
                    )));
                }
                if v < 0.0 {
                    return Err(StoreError::Validation(format!(
                        "{column} must not be negative (got {v})"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One row of the `properties` view: a material, its category, and
/// whatever properties have been recorded for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialRecord {
    pub material: String,
    pub category: String,
    #[serde(flatten)]
    pub properties: Properties,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_partial_and_empty_patches() {
        assert!(Properties::default().validate().is_ok());
        let patch = Properties {
            density: Some(7850.0),
            yield_strength: Some(250.0),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_and_non_finite() {
        let negative = Properties {
            density: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(StoreError::Validation(_))
        ));

        let nan = Properties {
            percent_elongation: Some(f64::NAN),
            ..Default::default()
        };
        assert!(matches!(nan.validate(), Err(StoreError::Validation(_))));
    }
}
