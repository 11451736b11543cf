// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::borrow::Cow;
use std::rc::Rc;

use wasm_bindgen::JsValue;

use crate::dom::node_ref::RefTarget;
use crate::event::EventCast;

type Str = Cow<'static, str>;

/// A single entry of a [`Props`] bag.
#[derive(Clone)]
pub enum Prop {
    /// Event listener, removed again on re-render.
    Listener(Str, Rc<dyn Fn(&web_sys::Event)>),
    /// Joined with spaces into `className`, empty fragments are skipped.
    ClassName(ClassName),
    /// CSS property, `None` values are skipped.
    Style(Str, Option<String>),
    /// `dataset` entry, `None` values are skipped.
    Data(Str, Option<String>),
    /// `aria-*` attribute.
    Aria(Str, String),
    /// Any other attribute.
    Attribute(Str, String),
    /// Direct property assignment on the element object.
    Property(Str, JsValue),
    /// Exposes the element and its render handle.
    Ref(RefTarget),
}

/// Ordered property bag applied to an element on every render.
#[derive(Clone, Default)]
pub struct Props {
    entries: Vec<Prop>,
}

impl Props {
    pub fn new() -> Self {
        Props::default()
    }

    pub fn iter(&self) -> std::slice::Iter<Prop> {
        self.entries.iter()
    }

    pub fn push(mut self, prop: Prop) -> Self {
        self.entries.push(prop);
        self
    }

    /// Bind a listener for `event`, eg. `"click"` or `"keydown"`.
    ///
    /// ```no_run
    /// use selectkit::dom::Props;
    /// use selectkit::event::MouseEvent;
    ///
    /// let props = Props::new().on("click", |event: MouseEvent| {
    ///     event.prevent_default();
    /// });
    /// ```
    pub fn on<E, F>(self, event: impl Into<Str>, handler: F) -> Self
    where
        E: EventCast,
        F: Fn(E) + 'static,
    {
        let handler = move |event: &web_sys::Event| handler(E::from(event.clone()));

        self.push(Prop::Listener(event.into(), Rc::new(handler)))
    }

    pub fn class_name(self, class: impl Into<ClassName>) -> Self {
        self.push(Prop::ClassName(class.into()))
    }

    pub fn style<V: Into<String>>(self, name: impl Into<Str>, value: Option<V>) -> Self {
        self.push(Prop::Style(name.into(), value.map(Into::into)))
    }

    pub fn data<V: Into<String>>(self, key: impl Into<Str>, value: Option<V>) -> Self {
        self.push(Prop::Data(key.into(), value.map(Into::into)))
    }

    pub fn aria(self, name: impl Into<Str>, value: impl ToString) -> Self {
        let name = name.into();

        debug_assert!(name.starts_with("aria"), "`{name}` is not an aria attribute");

        self.push(Prop::Aria(name, value.to_string()))
    }

    pub fn attr(self, name: impl Into<Str>, value: impl Into<String>) -> Self {
        self.push(Prop::Attribute(name.into(), value.into()))
    }

    pub fn prop(self, name: impl Into<Str>, value: impl Into<JsValue>) -> Self {
        self.push(Prop::Property(name.into(), value.into()))
    }

    pub fn node_ref(self, target: impl Into<RefTarget>) -> Self {
        self.push(Prop::Ref(target.into()))
    }

    /// Shorthand for `Props::prop("textContent", text)`.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.prop("textContent", text.into())
    }
}

/// Properties for an element, either fixed or recomputed on each render.
#[derive(Clone)]
pub enum PropsSource {
    Static(Props),
    Dynamic(Rc<dyn Fn() -> Props>),
}

impl PropsSource {
    pub fn resolve(&self) -> Cow<Props> {
        match self {
            PropsSource::Static(props) => Cow::Borrowed(props),
            PropsSource::Dynamic(make) => Cow::Owned(make()),
        }
    }
}

impl From<Props> for PropsSource {
    fn from(props: Props) -> Self {
        PropsSource::Static(props)
    }
}

impl From<()> for PropsSource {
    fn from(_: ()) -> Self {
        PropsSource::Static(Props::default())
    }
}

impl<F> From<F> for PropsSource
where
    F: Fn() -> Props + 'static,
{
    fn from(make: F) -> Self {
        PropsSource::Dynamic(Rc::new(make))
    }
}

/// Class name fragments. Empty and `None` fragments are dropped, the rest is
/// joined with spaces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassName(Vec<String>);

impl ClassName {
    pub fn join(&self) -> Option<String> {
        match self.0.is_empty() {
            true => None,
            false => Some(self.0.join(" ")),
        }
    }

    fn push(&mut self, fragment: &str) {
        if !fragment.is_empty() {
            self.0.push(fragment.into());
        }
    }
}

impl From<&str> for ClassName {
    fn from(class: &str) -> Self {
        let mut name = ClassName::default();
        name.push(class);
        name
    }
}

impl From<String> for ClassName {
    fn from(class: String) -> Self {
        ClassName::from(class.as_str())
    }
}

impl From<&String> for ClassName {
    fn from(class: &String) -> Self {
        ClassName::from(class.as_str())
    }
}

impl<S: AsRef<str>> From<Option<S>> for ClassName {
    fn from(class: Option<S>) -> Self {
        let mut name = ClassName::default();
        if let Some(class) = class {
            name.push(class.as_ref());
        }
        name
    }
}

impl<S: AsRef<str>> From<Vec<Option<S>>> for ClassName {
    fn from(fragments: Vec<Option<S>>) -> Self {
        ClassName::from_iter(fragments)
    }
}

impl<S: AsRef<str>, const N: usize> From<[Option<S>; N]> for ClassName {
    fn from(fragments: [Option<S>; N]) -> Self {
        ClassName::from_iter(fragments)
    }
}

impl<S: AsRef<str>> FromIterator<Option<S>> for ClassName {
    fn from_iter<I: IntoIterator<Item = Option<S>>>(iter: I) -> Self {
        let mut name = ClassName::default();
        for fragment in iter.into_iter().flatten() {
            name.push(fragment.as_ref());
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_name_drops_empty_fragments() {
        let class = ClassName::from([Some("item"), None, Some(""), Some("selected")]);

        assert_eq!(class.join().as_deref(), Some("item selected"));
    }

    #[test]
    fn empty_class_name_is_skipped() {
        assert_eq!(ClassName::from("").join(), None);
        assert_eq!(ClassName::from(None::<&str>).join(), None);
    }

    #[test]
    fn props_keep_insertion_order() {
        let props = Props::new()
            .attr("role", "option")
            .data("selected", Some("1"))
            .style("display", None::<String>);

        let kinds: Vec<_> = props
            .iter()
            .map(|prop| match prop {
                Prop::Attribute(name, _) => name.to_string(),
                Prop::Data(name, _) => format!("data:{name}"),
                Prop::Style(name, _) => format!("style:{name}"),
                _ => unreachable!(),
            })
            .collect();

        assert_eq!(kinds, ["role", "data:selected", "style:display"]);
    }
}
