//! Per-timestep feature vector in the model's fixed field order.

use serde::{Deserialize, Serialize};

/// Feature column names, in the order the scaler and model were trained on.
pub const FEATURE_NAMES: [&str; FeatureVector::LEN] = [
    "stock_on_hand",
    "intransit_qty",
    "pending_po_qty",
    "lead_time_days",
    "sin_doy",
    "cos_doy",
    "sin_dow",
    "cos_dow",
    "festival_flag",
    "branch_enc",
    "sku_enc",
];

/// One time step of model input.
///
/// Field order matches [`FEATURE_NAMES`]; reordering silently corrupts
/// predictions, so rows are only ever produced through [`FeatureVector::to_row`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub stock_on_hand: f64,
    pub intransit_qty: f64,
    pub pending_po_qty: f64,
    pub lead_time_days: f64,
    pub sin_doy: f64,
    pub cos_doy: f64,
    pub sin_dow: f64,
    pub cos_dow: f64,
    pub festival_flag: f64,
    pub branch_enc: f64,
    pub sku_enc: f64,
}

impl FeatureVector {
    /// Number of features per time step.
    pub const LEN: usize = 11;

    /// Convert to a numeric row in schema order.
    pub fn to_row(&self) -> [f64; Self::LEN] {
        [
            self.stock_on_hand,
            self.intransit_qty,
            self.pending_po_qty,
            self.lead_time_days,
            self.sin_doy,
            self.cos_doy,
            self.sin_dow,
            self.cos_dow,
            self.festival_flag,
            self.branch_enc,
            self.sku_enc,
        ]
    }

    /// Feature names for logging and model metadata.
    pub fn feature_names() -> Vec<&'static str> {
        FEATURE_NAMES.to_vec()
    }
}

/// One historical observation as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStep {
    pub branchcode: String,
    pub materialcode: String,
    pub stock_on_hand: f64,
    pub intransit_qty: f64,
    pub pending_po_qty: f64,
    pub lead_time_days: u32,
    pub date: String,
}
