// systems/guide_channel.rs
//
// One-to-many broadcast of the guide's current navigation highlight.
// Publishers and subscribers share a cloned handle passed in at construction;
// there is no global. Single-threaded (the scene lives on the wasm main thread).

use std::cell::RefCell;
use std::rc::Rc;

/// Action name that lights up the site navigation.
pub const HIGHLIGHT_NAV: &str = "highlight_gnb";

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u32);

type Listener = Box<dyn FnMut(Option<&str>)>;

#[derive(Default)]
struct Inner {
    current: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u32,
}

/// Last-write-wins channel for the active guide action.
#[derive(Clone, Default)]
pub struct GuideChannel {
    inner: Rc<RefCell<Inner>>,
}

impl GuideChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current action and notify every subscriber.
    /// Fire-and-forget: nothing is acknowledged or queued.
    pub fn publish(&self, action: Option<&str>) {
        // Listeners run outside the borrow so they may read `current()`.
        let mut listeners = {
            let mut inner = self.inner.borrow_mut();
            inner.current = action.map(str::to_owned);
            std::mem::take(&mut inner.listeners)
        };
        for (_, listener) in listeners.iter_mut() {
            listener(action);
        }
        let mut inner = self.inner.borrow_mut();
        // Keep anything subscribed during delivery.
        listeners.append(&mut inner.listeners);
        inner.listeners = listeners;
    }

    pub fn current(&self) -> Option<String> {
        self.inner.borrow().current.clone()
    }

    pub fn subscribe(&self, listener: impl FnMut(Option<&str>) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl std::fmt::Debug for GuideChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("GuideChannel")
            .field("current", &inner.current)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Navigation-side subscriber: glows while the guide points at the nav bar.
pub struct NavHighlight {
    glowing: Rc<RefCell<bool>>,
    channel: GuideChannel,
    subscription: SubscriptionId,
}

impl NavHighlight {
    pub fn attach(channel: &GuideChannel) -> Self {
        let glowing = Rc::new(RefCell::new(channel.current().as_deref() == Some(HIGHLIGHT_NAV)));
        let flag = Rc::clone(&glowing);
        let subscription = channel.subscribe(move |action| {
            *flag.borrow_mut() = action == Some(HIGHLIGHT_NAV);
        });
        Self {
            glowing,
            channel: channel.clone(),
            subscription,
        }
    }

    pub fn is_glowing(&self) -> bool {
        *self.glowing.borrow()
    }
}

impl Drop for NavHighlight {
    fn drop(&mut self) {
        self.channel.unsubscribe(self.subscription);
    }
}
