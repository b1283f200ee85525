//! Session and profile aggregation over per-score ratings

/// How a set of score ratings collapses into one number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    MeanOfBest(usize),
    SumOfBest(usize),
    Max,
}

impl Aggregate {
    /// `None` when there is nothing to aggregate
    pub fn apply(self, values: impl IntoIterator<Item = f64>) -> Option<f64> {
        let mut values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| b.total_cmp(a));

        match self {
            Aggregate::MeanOfBest(n) => {
                let best = &values[..n.min(values.len())];
                Some(best.iter().sum::<f64>() / best.len() as f64)
            }
            Aggregate::SumOfBest(n) => Some(values.iter().take(n).sum()),
            Aggregate::Max => values.first().copied(),
        }
    }
}
