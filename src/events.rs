use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Fired by any call-to-action that wants the floating chat to open.
pub const OPEN_CHAT_WIDGET: &str = "open-chat-widget";

type Handler = Rc<dyn Fn()>;

#[derive(Default)]
struct Topics {
    next_id: u64,
    handlers: HashMap<String, Vec<(u64, Handler)>>,
}

/// Payload-less publish/subscribe channel shared through a Yew context.
#[derive(Clone, Default)]
pub struct EventBus {
    topics: Rc<RefCell<Topics>>,
}

impl PartialEq for EventBus {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.topics, &other.topics)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, topic: &str) {
        // Snapshot first so handlers may (un)subscribe while running.
        let handlers: Vec<Handler> = self
            .topics
            .borrow()
            .handlers
            .get(topic)
            .map(|list| list.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();

        log::debug!("publishing {} to {} subscriber(s)", topic, handlers.len());
        for handler in handlers {
            handler();
        }
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, topic: &str, handler: impl Fn() + 'static) -> Subscription {
        let mut topics = self.topics.borrow_mut();
        topics.next_id += 1;
        let id = topics.next_id;
        topics
            .handlers
            .entry(topic.to_string())
            .or_default()
            .push((id, Rc::new(handler)));

        Subscription {
            topics: Rc::downgrade(&self.topics),
            topic: topic.to_string(),
            id,
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .borrow()
            .handlers
            .get(topic)
            .map_or(0, Vec::len)
    }
}

/// Live registration on an [`EventBus`]; removed on drop.
pub struct Subscription {
    topics: Weak<RefCell<Topics>>,
    topic: String,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(topics) = self.topics.upgrade() {
            let mut topics = topics.borrow_mut();
            if let Some(list) = topics.handlers.get_mut(&self.topic) {
                list.retain(|(id, _)| *id != self.id);
                if list.is_empty() {
                    topics.handlers.remove(&self.topic);
                }
            }
        }
    }
}
