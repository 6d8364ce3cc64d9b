//! Feature derivation for the sales model.
//!
//! # Example
//!
//! ```
//! use demandcast::features::{FeatureAssembler, StepInputs};
//!
//! let assembler = FeatureAssembler::default();
//! let inputs = StepInputs {
//!     stock_on_hand: 500.0,
//!     intransit_qty: 100.0,
//!     pending_po_qty: 50.0,
//!     lead_time_days: 7.0,
//! };
//! let v = assembler.assemble(inputs, "2024-01-15", "GC01", "SKU_A").unwrap();
//! assert_eq!(v.branch_enc, 0.0);
//! ```

pub mod assembler;
pub mod calendar;
pub mod categorical;

pub use assembler::{FeatureAssembler, StepInputs};
pub use calendar::{
    parse_date, CalendarFeatures, CyclicalFeatures, FestivalCalendar,
    DEFAULT_FESTIVAL_WINDOW_DAYS,
};
pub use categorical::CategoryMapping;
