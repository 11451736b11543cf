// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Minimal reactive state
//!
//! A [`State`] holds one value and a [`Registry`] of elements. Elements opt in
//! by passing the registry as their [`node_ref`](crate::dom::Props::node_ref),
//! usually together with dynamic props or lazy children that read the state.
//! Every [`set`](State::set) or [`update`](State::update) re-renders every
//! registered element synchronously, there is no batching and no diffing.
//!
//! ```no_run
//! use selectkit::dom::{el, Child, Props};
//! use selectkit::event::MouseEvent;
//! use selectkit::state::create_state;
//!
//! let count = create_state(0_u32);
//!
//! let button = el(
//!     "button",
//!     {
//!         let count = count.clone();
//!         move || {
//!             let count = count.clone();
//!             Props::new()
//!                 .node_ref(count.registry())
//!                 .on("click", move |_: MouseEvent| count.update(|n| n + 1))
//!         }
//!     },
//!     {
//!         let count = count.clone();
//!         Child::lazy(move || count.get())
//!     },
//! );
//! # drop(button);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{Registry, Render};

/// Shared reactive value, see the [module level documentation](self).
pub struct State<T> {
    inner: Rc<Inner<T>>,
}

struct Inner<T> {
    value: RefCell<T>,
    registry: Registry,
}

/// Create a new [`State`] holding `initial`.
pub fn create_state<T: 'static>(initial: T) -> State<T> {
    State::new(initial)
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        State {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> State<T> {
    pub fn new(initial: T) -> Self {
        State {
            inner: Rc::new(Inner {
                value: RefCell::new(initial),
                registry: Registry::new(),
            }),
        }
    }

    /// Get a copy of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Read the current value without cloning it.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.borrow())
    }

    /// Replace the value and re-render every registered element.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;

        self.notify();
    }

    /// Compute the next value from the previous one and re-render every
    /// registered element.
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = updater(&self.inner.value.borrow());

        self.set(next);
    }

    /// Registry of elements re-rendered on every change.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    fn notify(&self) {
        self.inner.registry.render(Render::All);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_update() {
        let state = create_state(1);

        state.set(2);
        assert_eq!(state.get(), 2);

        state.update(|n| n * 10);
        assert_eq!(state.get(), 20);
    }

    #[test]
    fn clones_share_the_value() {
        let a = create_state(String::from("foo"));
        let b = a.clone();

        b.set("bar".into());

        assert_eq!(a.with(|s| s.len()), 3);
        assert_eq!(a.get(), "bar");
        assert!(a.registry().is_empty());
    }
}
