//! Augmented price series: bars plus named indicator columns.

use crate::domain::indicator::{IndicatorPoint, IndicatorSpec};
use crate::domain::ohlcv::PriceBar;
use std::collections::HashMap;

/// A price series augmented with the indicator columns a strategy declares,
/// in declaration order. Column lookups that fail (unknown name, warm-up
/// position, out-of-range index) resolve to NaN so that rule evaluation
/// fails closed instead of erroring.
#[derive(Debug, Clone)]
pub struct AugmentedSeries {
    columns: Vec<(String, Vec<IndicatorPoint>)>,
    index: HashMap<String, usize>,
    len: usize,
}

/// Compute every column of every configured indicator over `bars`.
/// Indicator values at index i depend only on bars [0..=i], so a series
/// augmented over a prefix agrees with one augmented over the full history.
pub fn augment(bars: &[PriceBar], specs: &[IndicatorSpec]) -> AugmentedSeries {
    let mut columns = Vec::new();
    let mut index = HashMap::new();

    for spec in specs {
        let names = spec.kind.column_names(&spec.label);
        let computed = spec.kind.compute(bars);
        for (name, points) in names.into_iter().zip(computed) {
            index.insert(name.clone(), columns.len());
            columns.push((name, points));
        }
    }

    AugmentedSeries {
        columns,
        index,
        len: bars.len(),
    }
}

impl AugmentedSeries {
    /// Number of bars the series covers.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value of column `name` at `index`; NaN on any lookup failure.
    pub fn value(&self, name: &str, index: usize) -> f64 {
        let Some(&col) = self.index.get(name) else {
            return f64::NAN;
        };
        let points = &self.columns[col].1;
        match points.get(index) {
            Some(p) if p.valid => p.value,
            _ => f64::NAN,
        }
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}
