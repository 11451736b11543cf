// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declarative construction of DOM elements
//!
//! [`el`] creates (or takes over) an element, applies a [`Props`] bag to it and
//! attaches its [`Child`]ren. The returned [`Built`] keeps the listeners and
//! the props alive, and can render the element again: a re-render removes every
//! attribute and listener the element has before the props are applied again,
//! and clears the element before the children are attached again, so nothing
//! stale survives.
//!
//! ```no_run
//! use selectkit::dom::{el, Child, NodeRef, Props, Render};
//! use selectkit::event::MouseEvent;
//!
//! let button = NodeRef::new();
//!
//! let built = el(
//!     "button",
//!     Props::new()
//!         .class_name([Some("btn"), None, Some("primary")])
//!         .aria("aria-label", "Close")
//!         .on("click", |_: MouseEvent| log::info!("clicked"))
//!         .node_ref(&button),
//!     "×",
//! );
//!
//! button.render(Render::All);
//! # drop(built);
//! ```

use std::borrow::Cow;
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::{JsValue, UnwrapThrowExt};
use web_sys::{HtmlElement, Node};

use crate::util;

mod child;
mod node_ref;
mod props;

pub use child::Child;
pub use node_ref::{NodeRef, RefTarget, Registry, RenderHandle};
pub use props::{ClassName, Prop, Props, PropsSource};

/// Which part of an element a render applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Render {
    #[default]
    All,
    Props,
    Children,
}

impl Render {
    fn props(self) -> bool {
        matches!(self, Render::All | Render::Props)
    }

    fn children(self) -> bool {
        matches!(self, Render::All | Render::Children)
    }
}

/// Element to build: a tag name to create, or an existing element to take over.
pub enum Tag {
    Name(Cow<'static, str>),
    Element(HtmlElement),
}

impl From<&'static str> for Tag {
    fn from(name: &'static str) -> Self {
        Tag::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::Name(Cow::Owned(name))
    }
}

impl From<HtmlElement> for Tag {
    fn from(el: HtmlElement) -> Self {
        Tag::Element(el)
    }
}

impl From<&HtmlElement> for Tag {
    fn from(el: &HtmlElement) -> Self {
        Tag::Element(el.clone())
    }
}

/// Build an element from a tag, props and children.
pub fn el(tag: impl Into<Tag>, props: impl Into<PropsSource>, children: impl Into<Child>) -> Built {
    let element = match tag.into() {
        Tag::Name(name) => util::create_element(&name),
        Tag::Element(el) => el,
    };

    let inner = Rc::new(BuiltInner {
        element,
        props: props.into(),
        children: children.into(),
        listeners: RefCell::new(Vec::new()),
        mounted: RefCell::new(Mounted::default()),
    });

    BuiltInner::apply(&inner, Render::All);

    Built { inner }
}

/// Attach children to `parent`. Built elements among them, including the ones
/// produced by lazy children, are returned so their listeners stay alive.
pub fn append(parent: &impl AsRef<Node>, children: impl Into<Child>) -> Mounted {
    let mut mounted = Mounted::default();

    attach(parent.as_ref(), &children.into(), &mut mounted);

    mounted
}

fn attach(parent: &Node, child: &Child, mounted: &mut Mounted) {
    match child {
        Child::Empty => (),
        Child::Text(text) => {
            let text = util::document().create_text_node(text);

            parent.append_child(&text).unwrap_throw();
        }
        Child::Node(node) => {
            parent.append_child(node).unwrap_throw();
        }
        Child::Built(built) => {
            parent.append_child(built.element()).unwrap_throw();
            mounted.0.push(built.clone());
        }
        Child::Lazy(produce) => attach(parent, &produce(), mounted),
        Child::List(list) => {
            for child in list {
                attach(parent, child, mounted);
            }
        }
    }
}

/// Built elements attached by [`append`] or by a children render.
#[derive(Clone, Default)]
#[must_use = "dropping `Mounted` detaches the listeners of the built children"]
pub struct Mounted(Vec<Built>);

impl Mounted {
    pub fn extend(&mut self, other: Mounted) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// An element produced by [`el`], owning its props, children and listeners.
///
/// Dropping the last clone of a `Built` removes its listeners, but leaves the
/// element in the DOM.
#[derive(Clone)]
pub struct Built {
    inner: Rc<BuiltInner>,
}

pub(crate) struct BuiltInner {
    element: HtmlElement,
    props: PropsSource,
    children: Child,
    listeners: RefCell<Vec<EventListener>>,
    mounted: RefCell<Mounted>,
}

impl Built {
    pub fn element(&self) -> &HtmlElement {
        &self.inner.element
    }

    pub fn handle(&self) -> RenderHandle {
        RenderHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Clear and re-apply props and/or children, same as rendering through
    /// a [`RenderHandle`].
    pub fn render(&self, mode: Render) {
        BuiltInner::rerender(&self.inner, mode);
    }

    /// Number of listeners currently bound by this element's props.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl Deref for Built {
    type Target = HtmlElement;

    fn deref(&self) -> &HtmlElement {
        &self.inner.element
    }
}

impl AsRef<Node> for Built {
    fn as_ref(&self) -> &Node {
        self.inner.element.as_ref()
    }
}

impl BuiltInner {
    fn rerender(this: &Rc<Self>, mode: Render) {
        let el = &this.element;

        if mode.props() {
            let attributes = el.attributes();

            while let Some(attr) = attributes.item(0) {
                el.remove_attribute(&attr.name()).unwrap_throw();
            }

            // Dropping a listener removes it from the element
            this.listeners.borrow_mut().clear();
        }

        if mode.children() {
            el.set_inner_html("");
        }

        BuiltInner::apply(this, mode);
    }

    fn apply(this: &Rc<Self>, mode: Render) {
        if mode.props() {
            BuiltInner::apply_props(this);
        }

        if mode.children() {
            let mounted = append(&this.element, this.children.clone());

            *this.mounted.borrow_mut() = mounted;
        }
    }

    fn apply_props(this: &Rc<Self>) {
        let el = &this.element;
        let props = this.props.resolve();

        for prop in props.iter() {
            match prop {
                Prop::Listener(event, handler) => {
                    let handler = handler.clone();
                    let listener = EventListener::new_with_options(
                        el,
                        event.clone(),
                        EventListenerOptions::enable_prevent_default(),
                        move |event| handler(event),
                    );

                    this.listeners.borrow_mut().push(listener);
                }
                Prop::ClassName(class) => {
                    if let Some(class) = class.join() {
                        el.set_class_name(&class);
                    }
                }
                Prop::Style(name, Some(value)) => {
                    el.style().set_property(name, value).unwrap_throw();
                }
                Prop::Data(key, Some(value)) => {
                    el.dataset().set(key, value).expect_throw("invalid dataset key");
                }
                Prop::Style(_, None) | Prop::Data(_, None) => (),
                Prop::Aria(name, value) | Prop::Attribute(name, value) => {
                    el.set_attribute(name, value).expect_throw("invalid attribute name");
                }
                Prop::Property(name, value) => {
                    js_sys::Reflect::set(el, &JsValue::from_str(name), value).unwrap_throw();
                }
                Prop::Ref(target) => {
                    let handle = RenderHandle {
                        inner: Rc::downgrade(this),
                    };

                    target.expose(el, &handle);
                }
            }
        }
    }
}
