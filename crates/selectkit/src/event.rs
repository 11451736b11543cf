// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed wrappers for DOM events handed to listeners bound through
//! [`Props::on`](crate::dom::Props::on)

use std::marker::PhantomData;
use std::ops::Deref;

use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    type EventWithTarget;

    #[wasm_bindgen(method, getter)]
    fn target(this: &EventWithTarget) -> HtmlElement;
}

/// Types a raw [`web_sys::Event`] can be converted into for a listener.
pub trait EventCast: From<web_sys::Event> + 'static {}

impl EventCast for web_sys::Event {}

macro_rules! event {
    ($(#[doc = $doc:literal] $event:ident,)*) => {
        $(
            #[doc = concat!("Smart wrapper around a ", $doc, " which includes the type information of the event target")]
            #[repr(transparent)]
            pub struct $event<T = HtmlElement> {
                event: web_sys::$event,
                _target: PhantomData<T>,
            }

            impl<T> From<web_sys::Event> for $event<T> {
                fn from(event: web_sys::Event) -> Self {
                    $event {
                        event: event.unchecked_into(),
                        _target: PhantomData,
                    }
                }
            }

            impl<T: 'static> EventCast for $event<T> {}

            impl<T> Deref for $event<T> {
                type Target = web_sys::$event;

                fn deref(&self) -> &Self::Target {
                    &self.event
                }
            }

            impl<T> $event<T> {
                /// Return the target element.
                ///
                /// This method shadows over the [`Event::target`](web_sys::Event::target)
                /// method provided by `web-sys` and makes it infallible.
                pub fn target(&self) -> T
                where
                    T: JsCast,
                {
                    self.event.unchecked_ref::<EventWithTarget>().target().unchecked_into()
                }
            }
        )*
    };
}

event! {
    /// [`web_sys::Event`](web_sys::Event)
    Event,
    /// [`web_sys::KeyboardEvent`](web_sys::KeyboardEvent)
    KeyboardEvent,
    /// [`web_sys::MouseEvent`](web_sys::MouseEvent)
    MouseEvent,
    /// [`web_sys::FocusEvent`](web_sys::FocusEvent)
    FocusEvent,
}

/// Keys the select widget reacts to while its dropdown is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Enter,
    Escape,
    Tab,
}

impl NavKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "Down" => Some(NavKey::Down),
            "ArrowUp" | "Up" => Some(NavKey::Up),
            "Enter" => Some(NavKey::Enter),
            "Escape" | "Esc" => Some(NavKey::Escape),
            "Tab" => Some(NavKey::Tab),
            _ => None,
        }
    }
}

impl<T> KeyboardEvent<T> {
    pub fn nav_key(&self) -> Option<NavKey> {
        NavKey::from_key(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_keys() {
        assert_eq!(NavKey::from_key("ArrowDown"), Some(NavKey::Down));
        assert_eq!(NavKey::from_key("ArrowUp"), Some(NavKey::Up));
        assert_eq!(NavKey::from_key("Esc"), Some(NavKey::Escape));
        assert_eq!(NavKey::from_key("Tab"), Some(NavKey::Tab));
        assert_eq!(NavKey::from_key("a"), None);
    }
}
