use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use crate::core::events::NotificationEvent;
use crate::gateway::events::NotificationSink;

enum Delivery {
    Event(NotificationEvent),
    Flush(oneshot::Sender<()>),
}

// One queue per attached sink. The worker starts on first use so attach stays synchronous.
struct SinkSlot {
    sink: Arc<dyn NotificationSink>,
    queue: UnboundedSender<Delivery>,
    pending: Mutex<Option<UnboundedReceiver<Delivery>>>,
}

impl SinkSlot {
    fn new(sink: Arc<dyn NotificationSink>) -> Self {
        let (queue, receiver) = unbounded_channel();
        Self { sink, queue, pending: Mutex::new(Some(receiver)) }
    }

    fn enqueue(&self, delivery: Delivery) -> bool {
        let receiver = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(receiver) = receiver {
            tokio::spawn(run_worker(self.sink.clone(), receiver));
        }
        self.queue.send(delivery).is_ok()
    }
}

async fn run_worker(sink: Arc<dyn NotificationSink>, mut receiver: UnboundedReceiver<Delivery>) {
    while let Some(delivery) = receiver.recv().await {
        match delivery {
            Delivery::Event(event) => deliver(&sink, event).await,
            Delivery::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(sink = sink.name(), "notification worker stopped");
}

async fn deliver(sink: &Arc<dyn NotificationSink>, event: NotificationEvent) {
    let kind = event.kind;
    let target = sink.clone();
    let handle = tokio::spawn(async move { target.receive(&event).await });
    match handle.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            warn!(sink = sink.name(), %kind, error = %err, "notification sink failed");
        }
        Err(err) => {
            warn!(sink = sink.name(), %kind, error = %err, "notification sink aborted");
        }
    }
}

// NotificationHub fans events out to attached sinks. publish only enqueues: every sink drains
// its own queue in publish order on a background task, so a slow or hung sink never stalls the
// publisher or the other sinks. A failing or panicking sink is logged and skipped.
pub struct NotificationHub {
    slots: RwLock<Vec<Arc<SinkSlot>>>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

fn same_sink(a: &Arc<dyn NotificationSink>, b: &Arc<dyn NotificationSink>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl NotificationHub {
    pub fn new() -> Self {
        Self { slots: RwLock::new(vec![]) }
    }

    // returns false when the sink was already attached
    pub fn attach(&self, sink: Arc<dyn NotificationSink>) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        if slots.iter().any(|s| same_sink(&s.sink, &sink)) {
            return false;
        }
        slots.push(Arc::new(SinkSlot::new(sink)));
        true
    }

    // returns false when the sink was never attached; events already queued are still delivered
    pub fn detach(&self, sink: &Arc<dyn NotificationSink>) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        let before = slots.len();
        slots.retain(|s| !same_sink(&s.sink, sink));
        before != slots.len()
    }

    pub fn sink_count(&self) -> usize {
        self.slots.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn snapshot(&self) -> Vec<Arc<SinkSlot>> {
        self.slots.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub async fn publish(&self, event: &NotificationEvent) {
        let slots = self.snapshot();
        debug!(event_id = event.event_id.as_str(), kind = %event.kind, sinks = slots.len(), "publishing notification");
        for slot in slots {
            if !slot.enqueue(Delivery::Event(event.clone())) {
                warn!(sink = slot.sink.name(), kind = %event.kind, "notification worker gone, event dropped");
            }
        }
    }

    // waits until every attached sink has handled the events published before the call
    pub async fn flush(&self) {
        let mut waits = vec![];
        for slot in self.snapshot() {
            let (done, wait) = oneshot::channel();
            if slot.enqueue(Delivery::Flush(done)) {
                waits.push(wait);
            }
        }
        for wait in waits {
            let _ = wait.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use async_trait::async_trait;
    use crate::core::events::{NotificationEvent, NotificationEventType};
    use crate::core::library::LibraryResult;
    use crate::gateway::events::NotificationSink;
    use crate::gateway::hub::NotificationHub;
    use crate::gateway::recording::{HangingSink, RecordingSink};

    struct PanickingSink;

    #[async_trait]
    impl NotificationSink for PanickingSink {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn receive(&self, _event: &NotificationEvent) -> LibraryResult<()> {
            panic!("sink exploded");
        }
    }

    fn event(message: &str) -> NotificationEvent {
        NotificationEvent::new(NotificationEventType::FineApplied, None, message)
    }

    #[tokio::test]
    async fn test_should_attach_idempotently_and_detach() {
        let hub = NotificationHub::new();
        let sink: Arc<dyn NotificationSink> = Arc::new(RecordingSink::new("a"));
        let other: Arc<dyn NotificationSink> = Arc::new(RecordingSink::new("b"));
        assert!(hub.attach(sink.clone()));
        assert!(!hub.attach(sink.clone()));
        assert_eq!(1, hub.sink_count());
        assert!(!hub.detach(&other));
        assert!(hub.detach(&sink));
        assert!(!hub.detach(&sink));
        assert_eq!(0, hub.sink_count());
    }

    #[tokio::test]
    async fn test_should_deliver_once_per_attached_sink() {
        let hub = NotificationHub::new();
        let sink = Arc::new(RecordingSink::new("a"));
        let _ = hub.attach(sink.clone());
        let _ = hub.attach(sink.clone());
        hub.publish(&event("first")).await;
        hub.publish(&event("second")).await;
        hub.flush().await;
        let messages: Vec<String> = sink.events().iter().map(|e| e.message.clone()).collect();
        assert_eq!(vec!["first".to_string(), "second".to_string()], messages);
    }

    #[tokio::test]
    async fn test_should_isolate_failing_sinks() {
        let hub = NotificationHub::new();
        let failing = Arc::new(RecordingSink::failing("down"));
        let last = Arc::new(RecordingSink::new("last"));
        let _ = hub.attach(failing.clone());
        let _ = hub.attach(Arc::new(PanickingSink));
        let _ = hub.attach(last.clone());
        hub.publish(&event("late fee")).await;
        hub.publish(&event("second fee")).await;
        hub.flush().await;
        assert_eq!(2, failing.events().len());
        assert_eq!(vec![NotificationEventType::FineApplied, NotificationEventType::FineApplied], last.kinds());
    }

    #[tokio::test]
    async fn test_should_not_wait_for_hanging_sink() {
        let hub = NotificationHub::new();
        let last = Arc::new(RecordingSink::new("last"));
        let _ = hub.attach(Arc::new(HangingSink));
        let _ = hub.attach(last.clone());
        tokio::time::timeout(Duration::from_secs(1), hub.publish(&event("first")))
            .await.expect("should publish without waiting");
        tokio::time::timeout(Duration::from_secs(1), hub.publish(&event("second")))
            .await.expect("should publish without waiting");
        for _ in 0..100 {
            if last.events().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(2, last.events().len());
    }

    #[tokio::test]
    async fn test_should_deliver_queued_events_after_detach() {
        let hub = NotificationHub::new();
        let sink = Arc::new(RecordingSink::new("a"));
        let attached: Arc<dyn NotificationSink> = sink.clone();
        let _ = hub.attach(attached.clone());
        hub.publish(&event("before")).await;
        assert!(hub.detach(&attached));
        hub.publish(&event("after")).await;
        for _ in 0..100 {
            if !sink.events().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        hub.flush().await;
        let messages: Vec<String> = sink.events().iter().map(|e| e.message.clone()).collect();
        assert_eq!(vec!["before".to_string()], messages);
    }

    #[tokio::test]
    async fn test_should_publish_without_sinks() {
        let hub = NotificationHub::default();
        hub.publish(&event("nobody listens")).await;
        hub.flush().await;
        assert_eq!(0, hub.sink_count());
    }
}
