// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use web_sys::HtmlElement;

use crate::dom::{BuiltInner, Render};

/// Weak handle re-rendering a built element.
///
/// A re-render through this handle first clears what the previous render
/// applied: attributes and listeners for [`Render::All`] and [`Render::Props`],
/// child content for [`Render::All`] and [`Render::Children`].
#[derive(Clone)]
pub struct RenderHandle {
    pub(super) inner: Weak<BuiltInner>,
}

impl RenderHandle {
    /// Returns `false` if the element has been dropped in the meantime.
    pub fn render(&self, mode: Render) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                BuiltInner::rerender(&inner, mode);
                true
            }
            None => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Where a built element exposes itself, see [`Props::node_ref`](crate::dom::Props::node_ref).
#[derive(Clone)]
pub enum RefTarget {
    Callback(Rc<dyn Fn(&HtmlElement, RenderHandle)>),
    Slot(NodeRef),
    Registry(Registry),
    Many(Vec<RefTarget>),
}

impl RefTarget {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&HtmlElement, RenderHandle) + 'static,
    {
        RefTarget::Callback(Rc::new(f))
    }

    pub(super) fn expose(&self, el: &HtmlElement, handle: &RenderHandle) {
        match self {
            RefTarget::Callback(f) => f(el, handle.clone()),
            RefTarget::Slot(slot) => slot.set(el.clone(), handle.clone()),
            RefTarget::Registry(registry) => registry.subscribe(el, handle.clone()),
            RefTarget::Many(targets) => {
                for target in targets {
                    target.expose(el, handle);
                }
            }
        }
    }
}

impl From<NodeRef> for RefTarget {
    fn from(slot: NodeRef) -> Self {
        RefTarget::Slot(slot)
    }
}

impl From<&NodeRef> for RefTarget {
    fn from(slot: &NodeRef) -> Self {
        RefTarget::Slot(slot.clone())
    }
}

impl From<Registry> for RefTarget {
    fn from(registry: Registry) -> Self {
        RefTarget::Registry(registry)
    }
}

impl From<&Registry> for RefTarget {
    fn from(registry: &Registry) -> Self {
        RefTarget::Registry(registry.clone())
    }
}

impl From<Vec<RefTarget>> for RefTarget {
    fn from(targets: Vec<RefTarget>) -> Self {
        RefTarget::Many(targets)
    }
}

/// Slot that receives the element and its render handle.
#[derive(Clone, Default)]
pub struct NodeRef {
    slot: Rc<RefCell<Option<(HtmlElement, RenderHandle)>>>,
}

impl NodeRef {
    pub fn new() -> Self {
        NodeRef::default()
    }

    fn set(&self, el: HtmlElement, handle: RenderHandle) {
        *self.slot.borrow_mut() = Some((el, handle));
    }

    pub fn element(&self) -> Option<HtmlElement> {
        self.slot.borrow().as_ref().map(|(el, _)| el.clone())
    }

    pub fn handle(&self) -> Option<RenderHandle> {
        self.slot.borrow().as_ref().map(|(_, handle)| handle.clone())
    }

    /// Re-render the referenced element, returns `false` if there is none.
    pub fn render(&self, mode: Render) -> bool {
        // Clone out of the slot first, the render will write to it again.
        match self.handle() {
            Some(handle) => handle.render(mode),
            None => false,
        }
    }
}

/// Registry of elements and their render handles, keyed by element identity.
///
/// This is the subscriber list behind [`State`](crate::state::State), it can
/// also be used directly to re-render a group of elements at once.
#[derive(Clone, Default)]
pub struct Registry {
    subscribers: Rc<RefCell<Vec<(HtmlElement, RenderHandle)>>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Subscribe an element, replacing its previous handle if already present.
    pub fn subscribe(&self, el: &HtmlElement, handle: RenderHandle) {
        let mut subscribers = self.subscribers.borrow_mut();

        match subscribers.iter_mut().find(|(known, _)| known == el) {
            Some((_, known)) => *known = handle,
            None => subscribers.push((el.clone(), handle)),
        }
    }

    pub fn unsubscribe(&self, el: &HtmlElement) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();

        subscribers.retain(|(known, _)| known != el);

        subscribers.len() != before
    }

    pub fn contains(&self, el: &HtmlElement) -> bool {
        self.subscribers.borrow().iter().any(|(known, _)| known == el)
    }

    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synchronously re-render every subscribed element. Elements that have
    /// been dropped are unsubscribed.
    pub fn render(&self, mode: Render) {
        // Renders re-subscribe through their refs, so no borrow can be held here.
        let snapshot = self.subscribers.borrow().clone();

        let dropped: Vec<HtmlElement> = snapshot
            .into_iter()
            .filter_map(|(el, handle)| (!handle.render(mode)).then_some(el))
            .collect();

        for el in &dropped {
            self.unsubscribe(el);
        }
    }
}
