//! Shared result and metrics types for stage processors.

use std::collections::HashMap;
use std::time::Duration;

/// Output of one stage together with its metrics.
#[derive(Debug, Clone)]
pub struct StageResult<T> {
    /// The processed data from the stage
    pub data: T,
    /// Timing and item counts for the stage
    pub metrics: StageMetrics,
}

impl<T> StageResult<T> {
    pub fn new(data: T, metrics: StageMetrics) -> Self {
        Self { data, metrics }
    }

    /// Splits the result into its data and metrics.
    pub fn into_parts(self) -> (T, StageMetrics) {
        (self.data, self.metrics)
    }
}

/// Metrics collected during stage processing.
#[derive(Debug, Clone, Default)]
pub struct StageMetrics {
    /// Time taken to process the stage
    pub processing_time: Option<Duration>,
    /// Number of items successfully processed
    pub success_count: usize,
    /// Number of items dropped or failed
    pub failure_count: usize,
    /// Additional stage-specific information
    pub additional_info: HashMap<String, String>,
}

impl StageMetrics {
    pub fn new(success_count: usize, failure_count: usize) -> Self {
        Self {
            processing_time: None,
            success_count,
            failure_count,
            additional_info: HashMap::new(),
        }
    }

    pub fn with_processing_time(mut self, duration: Duration) -> Self {
        self.processing_time = Some(duration);
        self
    }

    /// Add additional information to the metrics
    pub fn with_info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    pub fn total_count(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Success rate as a percentage; 0 when nothing was processed.
    pub fn success_rate(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            0.0
        } else {
            (self.success_count as f64 / total as f64) * 100.0
        }
    }
}

/// Metrics of a whole pipeline run, keyed by stage.
#[derive(Debug, Clone, Default)]
pub struct PipelineMetrics {
    pub preprocess: StageMetrics,
    pub segmentation: StageMetrics,
    pub classification: StageMetrics,
    pub total_time: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_builder() {
        let metrics = StageMetrics::new(3, 1)
            .with_processing_time(Duration::from_millis(5))
            .with_info("stage", "segmentation");
        assert_eq!(metrics.total_count(), 4);
        assert!((metrics.success_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(
            metrics.additional_info.get("stage").map(String::as_str),
            Some("segmentation")
        );
        assert_eq!(StageMetrics::default().success_rate(), 0.0);
    }
}
