use burn::train::renderer::{MetricState, MetricsRenderer, TrainingProgress};
use derive_new::new;

/// A Simple renderer for TUI-disabled modes, reporting progress through the logger
#[derive(new)]
pub struct Simple {}

impl MetricsRenderer for Simple {
    fn update_train(&mut self, _state: MetricState) {}

    fn update_valid(&mut self, _state: MetricState) {}

    fn render_train(&mut self, item: TrainingProgress) {
        log::info!(
            "[train] epoch {}/{} - item {}/{}",
            item.epoch,
            item.epoch_total,
            item.progress.items_processed,
            item.progress.items_total
        );
    }

    fn render_valid(&mut self, item: TrainingProgress) {
        log::info!(
            "[valid] epoch {}/{} - item {}/{}",
            item.epoch,
            item.epoch_total,
            item.progress.items_processed,
            item.progress.items_total
        );
    }
}
