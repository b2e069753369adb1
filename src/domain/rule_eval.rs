//! Rule evaluation engine.
//!
//! Evaluates one condition against an augmented series at a bar index.
//!
//! # Evaluation Semantics
//!
//! - Threshold: compare the indicator at the given index against the literal
//! - Crossover/crossunder: require `index >= 1`, return `false` at index 0
//! - Any lookup failure (unknown column, warm-up position) resolves to NaN,
//!   and every NaN comparison is false, so a rule that cannot be evaluated
//!   at an index holds at no index rather than erroring
//!
//! Evaluation at index i reads columns only at i and i-1, so it never looks
//! ahead of the bar being decided.

use crate::domain::rule::{CmpOp, Condition};
use crate::domain::series::AugmentedSeries;

pub fn evaluate(condition: &Condition, series: &AugmentedSeries, index: usize) -> bool {
    match condition {
        Condition::Threshold {
            indicator,
            op,
            value,
        } => {
            let current = series.value(indicator, index);
            match op {
                CmpOp::Gt => current > *value,
                CmpOp::Lt => current < *value,
                CmpOp::Ge => current >= *value,
                CmpOp::Le => current <= *value,
            }
        }
        Condition::Crossover { left, right } => {
            if index == 0 {
                return false;
            }
            let left_prev = series.value(left, index - 1);
            let right_prev = series.value(right, index - 1);
            let left_curr = series.value(left, index);
            let right_curr = series.value(right, index);

            left_prev <= right_prev && left_curr > right_curr
        }
        Condition::Crossunder { left, right } => {
            if index == 0 {
                return false;
            }
            let left_prev = series.value(left, index - 1);
            let right_prev = series.value(right, index - 1);
            let left_curr = series.value(left, index);
            let right_curr = series.value(right, index);

            left_prev >= right_prev && left_curr < right_curr
        }
    }
}
