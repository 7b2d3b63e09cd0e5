use crate::entities::PickerEvent;
use anyhow::Result;

/// Trait for plugins that observe what a picker emits
pub trait PickerListener {
    /// Called synchronously, in registration order, for every emitted event
    fn on_event(&self, event: &PickerEvent) -> Result<()>;

    /// Human-readable name for this listener
    fn name(&self) -> &str;
}

/// Registry for managing picker listeners
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn PickerListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a new listener
    pub fn register<L>(&mut self, listener: L)
    where
        L: PickerListener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver an event to every registered listener
    pub fn notify(&self, event: &PickerEvent) {
        for listener in &self.listeners {
            if let Err(e) = listener.on_event(event) {
                log::warn!(
                    "listener '{}' failed on {}: {}",
                    listener.name(),
                    event.name(),
                    e
                );
                // Continue with other listeners even if one fails
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::test_utils::test_harness::RecordingListener;

    struct FailingListener;

    impl PickerListener for FailingListener {
        fn on_event(&self, _event: &PickerEvent) -> Result<()> {
            Err(anyhow::anyhow!("boom"))
        }

        fn name(&self) -> &str {
            "Failing"
        }
    }

    #[test]
    fn test_failing_listener_does_not_stop_delivery() {
        let recorder = RecordingListener::new();
        let mut registry = ListenerRegistry::new();
        registry.register(FailingListener);
        registry.register(recorder.clone());

        registry.notify(&PickerEvent::Input("2013-05".to_string()));

        assert_eq!(recorder.inputs(), ["2013-05"]);
    }
}
