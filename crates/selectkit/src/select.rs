// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Custom select
//!
//! [`CustomSelect`] turns a container element into a dropdown (or combobox, with
//! search enabled) over grouped options. The widget owns its DOM subtree and
//! one document level click listener, both of which are released by
//! [`destroy`](CustomSelect::destroy).
//!
//! Selection mode is fixed at construction: a single select holds
//! `Option<T>`, a multi select holds a list of distinct options. Values that
//! are not listed in the data never make it into the selection.
//!
//! The dropdown is either closed or open:
//!
//! * [`open`](CustomSelect::open) is ignored while disabled or already open. It
//!   resets the search, highlights the selected option of a single select and
//!   focuses the search input on the next tick.
//! * [`close`](CustomSelect::close) is ignored while closed. Rendered rows are
//!   kept for a second after closing so a quick reopen never shows an empty
//!   panel.
//!
//! While open, `ArrowDown`/`ArrowUp` move the highlight over enabled options
//! without wrapping, `Enter` commits the highlighted option, `Escape` and `Tab`
//! close the dropdown. These moves are internal to the widget:
//!
//! ```compile_fail
//! use selectkit::select::Step;
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use web_sys::{HtmlElement, HtmlInputElement, Node, ScrollLogicalPosition};

use crate::dom::Mounted;
use crate::event::{KeyboardEvent, NavKey};
use crate::{util, Error};

mod config;
mod model;
mod view;

pub use config::{ClassNames, Config, OptionProps};
pub use model::{Group, SelectOption, Selection};

use config::Settings;
use model::{Model, Step};

/// Delay used to let a click and the focus changes it causes settle.
const DEFER_MS: u32 = 1;

/// How long rendered rows outlive a close of the dropdown.
const CLEAR_ROWS_MS: u32 = 1000;

/// Element the widget is mounted into.
pub enum Container {
    /// CSS selector, resolved against the document at construction.
    Selector(String),
    Element(HtmlElement),
}

impl Container {
    fn resolve(self) -> Result<HtmlElement, Error> {
        match self {
            Container::Selector(selector) => util::query(&selector),
            Container::Element(el) => Ok(el),
        }
    }
}

impl From<&str> for Container {
    fn from(selector: &str) -> Self {
        Container::Selector(selector.into())
    }
}

impl From<String> for Container {
    fn from(selector: String) -> Self {
        Container::Selector(selector)
    }
}

impl From<HtmlElement> for Container {
    fn from(el: HtmlElement) -> Self {
        Container::Element(el)
    }
}

impl From<&HtmlElement> for Container {
    fn from(el: &HtmlElement) -> Self {
        Container::Element(el.clone())
    }
}

/// Elements making up the widget, for hosts that need to embed or style it.
#[derive(Clone)]
pub struct Elements {
    pub root: HtmlElement,
    pub button_container: HtmlElement,
    pub button: HtmlElement,
    pub deselect_button: HtmlElement,
    pub dropdown: HtmlElement,
    pub search_input: HtmlInputElement,
    pub options_container: HtmlElement,
}

/// Handle to a custom select widget, see the [module level documentation](self).
///
/// Dropping the handle without calling [`destroy`](CustomSelect::destroy)
/// detaches every listener and cancels pending timers, but leaves the
/// rendered elements in place. Use [`forget`](CustomSelect::forget) to keep
/// a widget working for the lifetime of the page without holding on to it.
#[must_use = "dropping a `CustomSelect` leaves its elements unresponsive"]
pub struct CustomSelect<T: SelectOption> {
    inner: Rc<Inner<T>>,
}

struct Inner<T: SelectOption> {
    id: u32,
    settings: Settings<T>,
    model: RefCell<Model<T>>,
    elements: Elements,
    parts: RefCell<Mounted>,
    rows: RefCell<Mounted>,
    button_content: RefCell<Mounted>,
    timers: Timers,
    outside_click: RefCell<Option<EventListener>>,
}

#[derive(Default)]
struct Timers {
    clear_rows: RefCell<Option<Timeout>>,
    focus_search: RefCell<Option<Timeout>>,
    refresh_rows: RefCell<Option<Timeout>>,
}

impl Timers {
    fn cancel_all(&self) {
        // Dropping a `Timeout` cancels it
        self.clear_rows.borrow_mut().take();
        self.focus_search.borrow_mut().take();
        self.refresh_rows.borrow_mut().take();
    }
}

impl<T: SelectOption> CustomSelect<T> {
    /// Build the widget inside `container`.
    ///
    /// Fails if the container is given as a selector that matches nothing.
    pub fn new(container: impl Into<Container>, config: Config<T>) -> Result<Self, Error> {
        crate::init_panic_hook();

        let root = container.into().resolve()?;
        let (data, settings) = config.normalize();
        let id = util::next_instance_id();
        let model = Model::new(data, settings.is_multiple, settings.is_disabled);

        let inner = Rc::new_cyclic(|weak| {
            let (elements, parts) = view::build(weak, id, &settings, root);

            Inner {
                id,
                settings,
                model: RefCell::new(model),
                elements,
                parts: RefCell::new(parts),
                rows: RefCell::new(Mounted::default()),
                button_content: RefCell::new(Mounted::default()),
                timers: Timers::default(),
                outside_click: RefCell::new(None),
            }
        });

        inner.listen_outside_click();
        inner.update_button();

        log::debug!("custom select #{id} created");

        Ok(CustomSelect { inner })
    }

    pub fn open(&self) {
        self.inner.open();
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn toggle(&self) {
        self.inner.toggle();
    }

    pub fn is_open(&self) -> bool {
        self.inner.model.borrow().is_open
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.model.borrow().is_disabled
    }

    pub fn is_multiple(&self) -> bool {
        self.inner.model.borrow().is_multiple()
    }

    /// Current value. For multi selects this is a snapshot of the selection
    /// at the time of the call.
    pub fn get_value(&self) -> Selection<T> {
        self.inner.model.borrow().selection.clone()
    }

    /// Select `option` in a single select, `None` clears the selection.
    /// Options not listed in the data clear the selection as well.
    ///
    /// Nothing fires when the resolved value equals the current one, so an
    /// unlisted option on a select with nothing selected is a silent no-op.
    pub fn set_value(&self, option: Option<T>) {
        self.inner.set_value_with(move |_| option);
    }

    /// Select the option picked by `f` out of all listed options.
    pub fn set_value_with<F>(&self, f: F)
    where
        F: FnOnce(&[T]) -> Option<T>,
    {
        self.inner.set_value_with(f);
    }

    /// Replace the selection of a multi select. Unlisted values are dropped.
    pub fn set_values<I>(&self, options: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.set_values_with(move |_| options.into_iter().collect());
    }

    /// Replace the selection of a multi select with the options picked by
    /// `f` out of all listed options.
    pub fn set_values_with<F>(&self, f: F)
    where
        F: FnOnce(&[T]) -> Vec<T>,
    {
        self.inner.set_values_with(f);
    }

    /// Flip `option` in the selection of a multi select.
    pub fn toggle_value(&self, option: T) {
        self.inner.toggle_value(option);
    }

    pub fn reset_value(&self) {
        self.inner.reset_value();
    }

    pub fn set_is_disabled(&self, disabled: bool) {
        self.inner.set_is_disabled(disabled);
    }

    /// Search the options as if `query` was typed into the search input.
    pub fn filter(&self, query: &str) {
        self.inner.filter(query);
    }

    /// Options that survived the current search, in display order.
    pub fn filtered_options(&self) -> Vec<T> {
        self.inner.model.borrow().filtered_flat().to_vec()
    }

    /// Index of the keyboard highlighted option within [`filtered_options`](CustomSelect::filtered_options).
    pub fn active_index(&self) -> Option<usize> {
        self.inner.model.borrow().active()
    }

    pub fn elements(&self) -> &Elements {
        &self.inner.elements
    }

    /// Give up the handle while keeping the widget alive and interactive for
    /// the rest of the page's lifetime.
    pub fn forget(self) {
        log::debug!("custom select #{} forgotten", self.inner.id);

        std::mem::forget(self.inner);
    }

    /// Cancel pending timers, detach the document listener and empty the
    /// container. The widget can't be used afterwards.
    pub fn destroy(self) {
        let inner = self.inner;

        inner.timers.cancel_all();
        inner.outside_click.borrow_mut().take();

        inner.elements.options_container.set_inner_html("");
        inner.rows.borrow_mut().clear();
        inner.button_content.borrow_mut().clear();
        inner.elements.root.set_inner_html("");
        inner.parts.borrow_mut().clear();

        log::debug!("custom select #{} destroyed", inner.id);
    }
}

impl<T: SelectOption> Inner<T> {
    fn weak(self: &Rc<Self>) -> Weak<Self> {
        Rc::downgrade(self)
    }

    fn listen_outside_click(self: &Rc<Self>) {
        let weak = self.weak();
        let document = util::document();

        let listener = EventListener::new_with_options(
            &document,
            "click",
            EventListenerOptions::run_in_capture_phase(),
            move |event| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
                    return;
                };

                let el = &inner.elements;

                if !el.button.contains(Some(&target)) && !el.dropdown.contains(Some(&target)) {
                    inner.close();
                }
            },
        );

        *self.outside_click.borrow_mut() = Some(listener);
    }

    fn open(self: &Rc<Self>) {
        {
            let model = self.model.borrow();

            if model.is_disabled || model.is_open {
                return;
            }
        }

        let el = &self.elements;

        el.dropdown.style().remove_property("pointer-events").unwrap_throw();
        self.model.borrow_mut().is_open = true;

        log::debug!("custom select #{} open", self.id);

        (self.settings.on_open_change)(true);

        self.filter("");
        self.mark_open(true);

        let mut selected_row = None;

        if self.settings.is_multiple {
            if !self.model.borrow().selection.is_empty() {
                selected_row = self.selected_row();

                if let Some(row) = &selected_row {
                    view::scroll_into_view(row, ScrollLogicalPosition::Center);
                }
            }
        } else {
            let has_selection = {
                let mut model = self.model.borrow_mut();
                let index = model.selected_index();

                model.set_active(index);
                !model.selection.is_empty()
            };

            if has_selection {
                selected_row = self.selected_row();

                if selected_row.is_some() {
                    self.update_active_descendant(ScrollLogicalPosition::Center);
                }
            }
        }

        if selected_row.is_none() {
            el.options_container.set_scroll_top(0);
        }

        if self.settings.enable_search {
            let search_input = el.search_input.clone();
            let timeout = Timeout::new(DEFER_MS, move || {
                let _ = search_input.focus();
            });

            *self.timers.focus_search.borrow_mut() = Some(timeout);
        }
    }

    fn close(self: &Rc<Self>) {
        {
            let mut model = self.model.borrow_mut();

            if !model.is_open {
                return;
            }
            model.is_open = false;
        }

        log::debug!("custom select #{} close", self.id);

        (self.settings.on_open_change)(false);

        self.model.borrow_mut().set_active(None);
        self.mark_open(false);

        let el = &self.elements;

        el.search_input.set_value("");
        el.dropdown.style().set_property("pointer-events", "none").unwrap_throw();

        let weak = self.weak();
        let timeout = Timeout::new(CLEAR_ROWS_MS, move || {
            if let Some(inner) = weak.upgrade() {
                inner.elements.options_container.set_inner_html("");
                inner.rows.borrow_mut().clear();
            }
        });

        // Replacing the previous timeout cancels it
        *self.timers.clear_rows.borrow_mut() = Some(timeout);
    }

    fn toggle(self: &Rc<Self>) {
        if self.model.borrow().is_open {
            self.close();
        } else {
            self.open();
        }
    }

    fn filter(self: &Rc<Self>, query: &str) {
        {
            let mut model = self.model.borrow_mut();

            model.filter(query, |option, query| (self.settings.is_visible)(option, query));

            log::trace!(
                "custom select #{} filtered by {query:?}: {} options",
                self.id,
                model.filtered_flat().len()
            );
        }

        self.render_rows();
    }

    fn handle_key(self: &Rc<Self>, event: KeyboardEvent) {
        let Some(key) = event.nav_key() else {
            return;
        };

        match key {
            NavKey::Down | NavKey::Up => {
                event.prevent_default();

                let step = match key {
                    NavKey::Down => Step::Down,
                    _ => Step::Up,
                };

                let moved = self.model.borrow_mut().step(step, |option, current| {
                    (self.settings.is_option_disabled)(option, current)
                });

                if moved {
                    log::trace!(
                        "custom select #{} highlight {:?}",
                        self.id,
                        self.model.borrow().active()
                    );

                    self.update_active_descendant(ScrollLogicalPosition::Nearest);
                }
            }
            NavKey::Enter => {
                let active = self.model.borrow().active_option().cloned();

                if let Some(option) = active {
                    event.prevent_default();
                    self.commit(option);
                }
            }
            NavKey::Escape | NavKey::Tab => {
                event.prevent_default();
                self.close();
                self.focus_button();
            }
        }
    }

    /// Pick an option from the list: toggle it in a multi select, select it
    /// and close the dropdown in a single select.
    fn commit(self: &Rc<Self>, option: T) {
        if self.settings.is_multiple {
            self.toggle_value(option);
        } else {
            self.select(Some(option));
            self.close();
            self.focus_button();
        }
    }

    fn focus_button(&self) {
        let _ = self.elements.button.focus();
    }

    fn select(self: &Rc<Self>, option: Option<T>) {
        if !self.model.borrow_mut().select(option) {
            return;
        }

        self.update_button();
        self.emit_change();

        if self.model.borrow().is_open {
            self.render_rows();
        }
    }

    fn set_value_with<F>(self: &Rc<Self>, f: F)
    where
        F: FnOnce(&[T]) -> Option<T>,
    {
        if self.settings.is_multiple {
            log::warn!("custom select #{}: `set_value` on a multi select", self.id);
            return;
        }

        let options = self.model.borrow().options().to_vec();
        let candidate = f(&options);
        let target = self.model.borrow().resolve(candidate);

        self.select(target);
    }

    fn set_values_with<F>(self: &Rc<Self>, f: F)
    where
        F: FnOnce(&[T]) -> Vec<T>,
    {
        if !self.settings.is_multiple {
            log::warn!("custom select #{}: `set_values` on a single select", self.id);
            return;
        }

        let options = self.model.borrow().options().to_vec();
        let values = f(&options);

        self.model.borrow_mut().select_many(values);
        self.update_button();
        self.emit_change();

        if self.model.borrow().is_open {
            self.render_rows();
        }
    }

    fn toggle_value(self: &Rc<Self>, option: T) {
        if !self.settings.is_multiple {
            log::warn!("custom select #{}: `toggle_value` on a single select", self.id);
            return;
        }

        if !self.model.borrow_mut().toggle(&option) {
            return;
        }

        self.update_button();

        if self.model.borrow().is_open {
            // Rows are refreshed on the next tick, after the click that caused
            // the toggle has finished dispatching.
            let weak = self.weak();
            let timeout = Timeout::new(DEFER_MS, move || {
                if let Some(inner) = weak.upgrade() {
                    inner.render_rows();
                }
            });

            *self.timers.refresh_rows.borrow_mut() = Some(timeout);
        }

        self.emit_change();
    }

    fn reset_value(self: &Rc<Self>) {
        self.model.borrow_mut().reset();
        self.update_button();
        self.emit_change();

        if self.model.borrow().is_open {
            self.render_rows();
        }
    }

    fn set_is_disabled(&self, disabled: bool) {
        self.model.borrow_mut().is_disabled = disabled;

        let dataset = self.elements.root.dataset();

        if disabled {
            dataset.set("disabled", "true").unwrap_throw();
        } else {
            dataset.delete("disabled");
        }
    }

    fn emit_change(&self) {
        let selection = self.model.borrow().selection.clone();

        (self.settings.on_change)(&selection);
    }
}
