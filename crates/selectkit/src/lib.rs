// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Selectkit
//!
//! _A small browser toolkit for building DOM and a custom select widget on top of it._
//!
//! The crate is made of three layers:
//!
//! * [`dom`] builds and re-renders native elements out of a property bag and a
//!   children specification. There is no virtual DOM, a re-render clears what the
//!   previous render applied and applies everything again.
//! * [`state`] is a minimal reactive cell. Elements register their render handle
//!   into the cell's [`Registry`](dom::Registry) and every
//!   [`set`](state::State::set) re-renders all of them synchronously.
//! * [`select`] is the custom select (dropdown / combobox) engine, built entirely
//!   out of [`dom`].
//!
//! ### Custom select
//!
//! ```no_run
//! use selectkit::prelude::*;
//!
//! let data: Vec<Group<&str>> = vec![
//!     Group::new("Fruit", ["apple", "banana", "cherry"]),
//!     Group::new("Vegetables", ["carrot", "leek"]),
//! ];
//!
//! let select = CustomSelect::new(
//!     "#fruit",
//!     Config::new(data).on_change(|value| log::info!("selected: {value:?}")),
//! )
//! .expect("container exists");
//!
//! select.set_value(Some("banana"));
//! ```

use std::cell::Cell;

mod error;
mod util;

pub mod dom;
pub mod event;
pub mod select;
pub mod state;

pub use error::Error;

/// The prelude module with most commonly used types.
pub mod prelude {
    pub use crate::dom::{append, el, Child, Props, Registry, Render};
    pub use crate::select::{ClassNames, Config, CustomSelect, Group, SelectOption, Selection};
    pub use crate::state::{create_state, State};
    pub use crate::Error;
}

/// Re-exports for hosts that need to talk to the elements directly
pub mod reexport {
    pub use wasm_bindgen;
    pub use web_sys;
}

thread_local! {
    static LOGGER: Cell<bool> = const { Cell::new(false) };
}

/// Route Rust panics to the browser console. Only enabled on debug builds,
/// repeated calls are ignored.
pub fn init_panic_hook() {
    #[cfg(debug_assertions)]
    {
        thread_local! {
            static INIT: Cell<bool> = const { Cell::new(false) };
        }
        if !INIT.with(Cell::get) {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));

            INIT.with(|init| init.set(true));
        }
    }
}

/// Install a [`log`] sink writing to the browser console. Only the first call
/// on a page has any effect.
pub fn init_logger(level: log::Level) {
    if !LOGGER.with(Cell::get) {
        wasm_logger::init(wasm_logger::Config::new(level));

        LOGGER.with(|init| init.set(true));
    }
}
