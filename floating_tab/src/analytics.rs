use std::sync::{Arc, Mutex};
use tracing::info;
use types::AnalyticsEvent;

/// Destination for the widget's analytics events.
pub trait AnalyticsSink: Send {
    fn push(&self, event: &AnalyticsEvent);
}

/// Discards every event. The sink used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn push(&self, _event: &AnalyticsEvent) {}
}

/// Writes every event to the log. Used in dev mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn push(&self, event: &AnalyticsEvent) {
        let payload = serde_json::to_string(event)
            .unwrap_or_else(|_| event.name().to_string());

        info!("[floating tab] pushed: {}", payload);
    }
}

/// Keeps every pushed event in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AnalyticsSink for RecordingSink {
    fn push(&self, event: &AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(*event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_clones_share_events() {
        let sink = RecordingSink::new();
        let view = sink.clone();

        sink.push(&AnalyticsEvent::View);
        sink.push(&AnalyticsEvent::Click);

        assert_eq!(
            view.events(),
            vec![AnalyticsEvent::View, AnalyticsEvent::Click]
        );
    }
}
