//! Before/after transition observers registered on a single machine.

use crate::core::State;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

/// Observer callback. Receives the machine's current state at the moment
/// of notification.
pub type Observer<S> = Box<dyn FnMut(&S) + Send>;

pub(crate) struct TransitionHooks<S: State> {
    before: Vec<(SubscriptionId, Observer<S>)>,
    after: Vec<(SubscriptionId, Observer<S>)>,
}

impl<S: State> Default for TransitionHooks<S> {
    fn default() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
        }
    }
}

impl<S: State> TransitionHooks<S> {
    pub(crate) fn subscribe_before(&mut self, observer: Observer<S>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.before.push((id, observer));
        id
    }

    pub(crate) fn subscribe_after(&mut self, observer: Observer<S>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.after.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.before.len();
        let after = self.after.len();
        self.before.retain(|(sub, _)| *sub != id);
        self.after.retain(|(sub, _)| *sub != id);
        before != self.before.len() || after != self.after.len()
    }

    pub(crate) fn fire_before(&mut self, current: &S) {
        for (_, observer) in &mut self.before {
            observer(current);
        }
    }

    pub(crate) fn fire_after(&mut self, current: &S) {
        for (_, observer) in &mut self.after {
            observer(current);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NamedState;
    use std::sync::{Arc, Mutex};

    #[test]
    fn observers_fire_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = TransitionHooks::default();

        for label in ["first", "second"] {
            let seen = Arc::clone(&seen);
            hooks.subscribe_before(Box::new(move |s: &NamedState| {
                seen.lock().unwrap().push(format!("{label}:{s}"));
            }));
        }

        hooks.fire_before(&NamedState::new("Hidden"));
        hooks.fire_after(&NamedState::new("Visible"));

        assert_eq!(*seen.lock().unwrap(), vec!["first:Hidden", "second:Hidden"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_observer() {
        let count = Arc::new(Mutex::new(0));
        let mut hooks = TransitionHooks::default();

        let counter = Arc::clone(&count);
        let kept = hooks.subscribe_after(Box::new(move |_: &NamedState| {
            *counter.lock().unwrap() += 1;
        }));
        let dropped = hooks.subscribe_after(Box::new(|_: &NamedState| {
            panic!("unsubscribed observer must not fire");
        }));

        assert_ne!(kept, dropped);
        assert!(hooks.unsubscribe(dropped));
        assert!(!hooks.unsubscribe(dropped));

        hooks.fire_after(&NamedState::new("Visible"));
        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(hooks.len(), 1);
    }
}
