/// Summary statistics for one generation's fitness scores.
///
/// Tracks the spread of a fitness vector so training progress and
/// population diversity can be reported without keeping the raw scores.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessStats {
    /// The lowest score in the generation.
    pub min: f32,
    /// The highest score in the generation.
    pub max: f32,
    /// The arithmetic mean of all scores.
    pub mean: f32,
    /// The population standard deviation of the scores.
    pub std_dev: f32,
}

impl FitnessStats {
    /// Computes statistics over a fitness vector.
    ///
    /// # Returns
    ///
    /// * `Some(FitnessStats)` - if `scores` contains at least one value
    /// * `None` - if `scores` is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use strider_stats::FitnessStats;
    /// let stats = FitnessStats::from_scores(&[10.0, 30.0, 5.0, 20.0]).unwrap();
    /// assert_eq!(stats.min, 5.0);
    /// assert_eq!(stats.max, 30.0);
    /// assert_eq!(stats.mean, 16.25);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_scores(scores: &[f32]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
        let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let n = scores.len() as f32;
        let mean = scores.iter().copied().sum::<f32>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / n;

        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}
