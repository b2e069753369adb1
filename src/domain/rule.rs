//! Rule data structures.
//!
//! A rule pairs a side (buy or sell) with one condition over named indicator
//! columns. Each variant carries only the fields it needs; rules are
//! validated once at strategy construction, not per index.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Lt,
    Ge,
    Le,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
            CmpOp::Ge => ">=",
            CmpOp::Le => "<=",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A named indicator compared against a literal.
    Threshold {
        indicator: String,
        op: CmpOp,
        value: f64,
    },
    /// True only at the bar where `left` transitions from at-or-below to
    /// above `right`.
    Crossover { left: String, right: String },
    /// True only at the bar where `left` transitions from at-or-above to
    /// below `right`.
    Crossunder { left: String, right: String },
}

impl Condition {
    /// Indicator labels this condition reads.
    pub fn referenced_columns(&self) -> Vec<&str> {
        match self {
            Condition::Threshold { indicator, .. } => vec![indicator],
            Condition::Crossover { left, right } | Condition::Crossunder { left, right } => {
                vec![left, right]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub side: Side,
    pub condition: Condition,
}
