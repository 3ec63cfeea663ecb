/// Descriptive statistics summarizing a set of fitness scores.
///
/// Summaries are built once per generation, so every field is computed eagerly.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of samples.
    pub count: usize,
    /// The smallest sample.
    pub min: f32,
    /// The largest sample.
    pub max: f32,
    /// The arithmetic mean.
    pub mean: f32,
    /// The median (upper median for even sample counts).
    pub median: f32,
    /// Population standard deviation.
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics from unsorted values.
    ///
    /// Returns `None` when `values` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use genepool_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([3.0, 1.0, 2.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.median, 2.0);
    /// assert_eq!(stats.mean, 2.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let count = values.len();
        let n = count as f32;
        let mean = values.iter().sum::<f32>() / n;
        let median = values[count / 2];
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
