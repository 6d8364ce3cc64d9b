//! Assembly of raw observations into model feature vectors and windows.

use tracing::trace;

use crate::core::{FeatureVector, RawStep, Window};
use crate::error::{ForecastError, Result};
use crate::features::calendar::{CalendarFeatures, FestivalCalendar};
use crate::features::categorical::CategoryMapping;

/// Numeric inputs of one time step, before feature derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInputs {
    pub stock_on_hand: f64,
    pub intransit_qty: f64,
    pub pending_po_qty: f64,
    pub lead_time_days: f64,
}

impl StepInputs {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("stock_on_hand", self.stock_on_hand),
            ("intransit_qty", self.intransit_qty),
            ("pending_po_qty", self.pending_po_qty),
            ("lead_time_days", self.lead_time_days),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ForecastError::Validation(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl From<&RawStep> for StepInputs {
    fn from(step: &RawStep) -> Self {
        Self {
            stock_on_hand: step.stock_on_hand,
            intransit_qty: step.intransit_qty,
            pending_po_qty: step.pending_po_qty,
            lead_time_days: f64::from(step.lead_time_days),
        }
    }
}

/// Combines numeric inputs, calendar features and category codes into
/// [`FeatureVector`]s.
#[derive(Debug, Clone, Default)]
pub struct FeatureAssembler {
    categories: CategoryMapping,
    festivals: FestivalCalendar,
}

impl FeatureAssembler {
    pub fn new(categories: CategoryMapping, festivals: FestivalCalendar) -> Self {
        Self {
            categories,
            festivals,
        }
    }

    pub fn categories(&self) -> &CategoryMapping {
        &self.categories
    }

    pub fn festivals(&self) -> &FestivalCalendar {
        &self.festivals
    }

    /// Build one feature vector.
    pub fn assemble(
        &self,
        inputs: StepInputs,
        date: &str,
        branch: &str,
        material: &str,
    ) -> Result<FeatureVector> {
        inputs.validate()?;
        let (branch_enc, sku_enc) = self.categories.encode(branch, material)?;
        let calendar = CalendarFeatures::from_str_date(date, &self.festivals)?;

        Ok(FeatureVector {
            stock_on_hand: inputs.stock_on_hand,
            intransit_qty: inputs.intransit_qty,
            pending_po_qty: inputs.pending_po_qty,
            lead_time_days: inputs.lead_time_days,
            sin_doy: calendar.cyclical.sin_doy,
            cos_doy: calendar.cyclical.cos_doy,
            sin_dow: calendar.cyclical.sin_dow,
            cos_dow: calendar.cyclical.cos_dow,
            festival_flag: calendar.festival_flag,
            branch_enc: f64::from(branch_enc),
            sku_enc: f64::from(sku_enc),
        })
    }

    /// Build the feature vector for a caller-supplied observation.
    pub fn assemble_step(&self, step: &RawStep) -> Result<FeatureVector> {
        self.assemble(
            StepInputs::from(step),
            &step.date,
            &step.branchcode,
            &step.materialcode,
        )
    }

    /// Build a window from exactly `window_size` observations, oldest first.
    ///
    /// The length is checked before any step is assembled; a mismatch is a
    /// caller bug and is never corrected by truncation or padding.
    pub fn assemble_window(&self, steps: &[RawStep], window_size: usize) -> Result<Window> {
        if steps.len() != window_size {
            return Err(ForecastError::WindowSize {
                expected: window_size,
                got: steps.len(),
            });
        }

        let vectors = steps
            .iter()
            .map(|s| self.assemble_step(s))
            .collect::<Result<Vec<_>>>()?;
        trace!(steps = vectors.len(), "assembled feature window");

        Window::from_features(&vectors, window_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CategoryKind;
    use approx::assert_relative_eq;

    fn step(date: &str) -> RawStep {
        RawStep {
            branchcode: "GC02".to_string(),
            materialcode: "SKU_D".to_string(),
            stock_on_hand: 500.0,
            intransit_qty: 100.0,
            pending_po_qty: 50.0,
            lead_time_days: 7,
            date: date.to_string(),
        }
    }

    #[test]
    fn assembles_fields_in_schema_order() {
        let asm = FeatureAssembler::default();
        let v = asm.assemble_step(&step("2022-10-15")).unwrap();

        let row = v.to_row();
        assert_eq!(&row[..4], &[500.0, 100.0, 50.0, 7.0]);
        assert_eq!(row[8], 1.0); // festival day
        assert_eq!(row[9], 1.0); // GC02
        assert_eq!(row[10], 3.0); // SKU_D
        assert_relative_eq!(row[4].powi(2) + row[5].powi(2), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unknown_branch_fails() {
        let asm = FeatureAssembler::default();
        let mut s = step("2024-01-15");
        s.branchcode = "ZZ99".to_string();
        assert_eq!(
            asm.assemble_step(&s).unwrap_err(),
            ForecastError::UnknownCategory {
                kind: CategoryKind::Branch,
                identifier: "ZZ99".to_string()
            }
        );
    }

    #[test]
    fn bad_date_fails_with_validation() {
        let asm = FeatureAssembler::default();
        let err = asm.assemble_step(&step("15-01-2024")).unwrap_err();
        assert!(matches!(err, ForecastError::Validation(_)));
    }

    #[test]
    fn non_finite_input_fails_with_validation() {
        let asm = FeatureAssembler::default();
        let inputs = StepInputs {
            stock_on_hand: f64::NAN,
            intransit_qty: 0.0,
            pending_po_qty: 0.0,
            lead_time_days: 1.0,
        };
        let err = asm.assemble(inputs, "2024-01-15", "GC01", "SKU_A").unwrap_err();
        assert!(err.to_string().contains("stock_on_hand"));
    }

    #[test]
    fn window_requires_exact_step_count() {
        let asm = FeatureAssembler::default();
        let steps: Vec<RawStep> = (1..=5).map(|d| step(&format!("2024-01-0{d}"))).collect();

        assert_eq!(
            asm.assemble_window(&steps, 4).unwrap_err(),
            ForecastError::WindowSize {
                expected: 4,
                got: 5
            }
        );
        assert_eq!(
            asm.assemble_window(&steps[..3], 4).unwrap_err(),
            ForecastError::WindowSize {
                expected: 4,
                got: 3
            }
        );

        let w = asm.assemble_window(&steps[..4], 4).unwrap();
        assert_eq!(w.shape(), (4, FeatureVector::LEN));
    }
}
