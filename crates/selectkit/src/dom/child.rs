// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use web_sys::{HtmlElement, Node};

use crate::dom::Built;

/// Children specification of an element.
///
/// Lazy children are evaluated every time they are attached, which makes
/// them re-evaluate on each children render of the parent.
#[derive(Clone, Default)]
pub enum Child {
    #[default]
    Empty,
    Text(Cow<'static, str>),
    Node(Node),
    Built(Built),
    Lazy(Rc<dyn Fn() -> Child>),
    List(Vec<Child>),
}

impl Child {
    /// Wrap a producer that is evaluated when the child is attached.
    pub fn lazy<F, C>(produce: F) -> Self
    where
        F: Fn() -> C + 'static,
        C: Into<Child>,
    {
        Child::Lazy(Rc::new(move || produce().into()))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Child::Empty => true,
            Child::List(list) => list.iter().all(Child::is_empty),
            _ => false,
        }
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Child::Empty => f.write_str("Empty"),
            Child::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Child::Node(_) => f.write_str("Node"),
            Child::Built(_) => f.write_str("Built"),
            Child::Lazy(_) => f.write_str("Lazy"),
            Child::List(list) => f.debug_tuple("List").field(list).finish(),
        }
    }
}

impl From<()> for Child {
    fn from(_: ()) -> Self {
        Child::Empty
    }
}

impl From<&'static str> for Child {
    fn from(text: &'static str) -> Self {
        Child::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(Cow::Owned(text))
    }
}

impl From<Cow<'static, str>> for Child {
    fn from(text: Cow<'static, str>) -> Self {
        Child::Text(text)
    }
}

macro_rules! impl_int_child {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Child {
                fn from(n: $ty) -> Self {
                    let mut buf = itoa::Buffer::new();

                    Child::Text(Cow::Owned(buf.format(n).into()))
                }
            }
        )*
    };
}

impl_int_child!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Child::Text(Cow::Owned(n.to_string()))
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<HtmlElement> for Child {
    fn from(el: HtmlElement) -> Self {
        Child::Node(el.into())
    }
}

impl From<Built> for Child {
    fn from(built: Built) -> Self {
        Child::Built(built)
    }
}

impl<C: Into<Child>> From<Option<C>> for Child {
    fn from(child: Option<C>) -> Self {
        child.map(Into::into).unwrap_or_default()
    }
}

impl<C: Into<Child>> From<Vec<C>> for Child {
    fn from(list: Vec<C>) -> Self {
        Child::List(list.into_iter().map(Into::into).collect())
    }
}

impl<C: Into<Child>, const N: usize> From<[C; N]> for Child {
    fn from(list: [C; N]) -> Self {
        Child::List(list.into_iter().map(Into::into).collect())
    }
}

impl<C: Into<Child>> FromIterator<C> for Child {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Child::List(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_become_text() {
        assert!(matches!(Child::from(42_u32), Child::Text(t) if t == "42"));
        assert!(matches!(Child::from(-7_i32), Child::Text(t) if t == "-7"));
    }

    #[test]
    fn nothing_is_empty() {
        assert!(Child::from(None::<&'static str>).is_empty());
        assert!(Child::from(vec![(), ()]).is_empty());
        assert!(!Child::from(vec![Some("a"), None]).is_empty());
    }

    #[test]
    fn lazy_is_reinvocable() {
        let child = Child::lazy(|| vec!["a", "b"]);

        for _ in 0..2 {
            match &child {
                Child::Lazy(produce) => {
                    assert!(matches!(produce(), Child::List(list) if list.len() == 2))
                }
                _ => unreachable!(),
            }
        }
    }
}
