//! Fixed constants of the screening rubric.

/// Every flag fires at or above this value on a 0–10 item.
pub const FLAG_THRESHOLD: f64 = 7.0;

/// Totals strictly above this value are reported as higher risk.
pub const HIGH_RISK_TOTAL_THRESHOLD: f64 = 50.0;
