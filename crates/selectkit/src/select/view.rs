// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::rc::{Rc, Weak};

use wasm_bindgen::{JsCast, UnwrapThrowExt};
use web_sys::{HtmlElement, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::dom::{append, el, Child, Mounted, Props};
use crate::event::{Event, FocusEvent, KeyboardEvent, MouseEvent};
use crate::select::config::{OptionProps, Settings};
use crate::select::{Elements, Inner, SelectOption};

fn list_id(id: u32) -> String {
    format!("custom-select-options-{id}")
}

fn row_id(id: u32, group: usize, option: usize) -> String {
    format!("option-{id}--{group}.{option}")
}

fn flag(value: bool) -> Option<&'static str> {
    Some(if value { "true" } else { "false" })
}

/// Wrap a handler so it only runs while the widget is alive.
fn handler<T, E, F>(weak: &Weak<Inner<T>>, f: F) -> impl Fn(E) + 'static
where
    T: SelectOption,
    F: Fn(&Rc<Inner<T>>, E) + 'static,
{
    let weak = weak.clone();

    move |event| {
        if let Some(inner) = weak.upgrade() {
            f(&inner, event);
        }
    }
}

pub(super) fn scroll_into_view(row: &HtmlElement, block: ScrollLogicalPosition) {
    let options = ScrollIntoViewOptions::new();
    options.set_block(block);

    row.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Build the fixed part of the widget inside `root`.
pub(super) fn build<T: SelectOption>(
    weak: &Weak<Inner<T>>,
    id: u32,
    settings: &Settings<T>,
    root: HtmlElement,
) -> (Elements, Mounted) {
    let cn = &settings.class_names;
    let list_id = list_id(id);

    let button_container = el(
        "div",
        Props::new()
            .class_name(&cn.button_container)
            .data("open", flag(false))
            .data("hasValue", flag(false)),
        (),
    );

    let mut button_props = Props::new()
        .class_name(&cn.trigger_button)
        .attr("type", "button")
        .aria("aria-haspopup", "listbox")
        .aria("aria-expanded", "false")
        .aria("aria-controls", &list_id)
        .on("click", handler(weak, |inner, _: MouseEvent| inner.toggle()))
        .on("focusin", {
            let container = button_container.element().clone();
            move |_: FocusEvent| {
                let _ = container.dataset().set("focus", "true");
            }
        })
        .on("focusout", {
            let container = button_container.element().clone();
            move |_: FocusEvent| container.dataset().delete("focus")
        });

    if !settings.enable_search {
        button_props = button_props.on(
            "keydown",
            handler(weak, |inner, event: KeyboardEvent| {
                if inner.model.borrow().is_open {
                    inner.handle_key(event);
                }
            }),
        );
    }

    let button = el("button", button_props, ());

    let deselect_button = el(
        "button",
        Props::new()
            .class_name(&cn.deselect_button)
            .attr("type", "button")
            .style("display", Some("none"))
            .aria("aria-label", "Deselect option")
            .on(
                "click",
                handler(weak, |inner, _: MouseEvent| {
                    if inner.model.borrow().is_disabled {
                        return;
                    }
                    inner.reset_value();
                    inner.focus_button();
                }),
            ),
        settings.deselect_button.clone(),
    );

    let search_input = el(
        "input",
        Props::new()
            .class_name(&cn.search_input)
            .attr("type", "text")
            .prop("placeholder", settings.search_placeholder.as_str())
            .attr("role", "textbox")
            .aria("aria-autocomplete", "list")
            .aria("aria-controls", &list_id)
            .prop("spellcheck", false)
            .style("display", (!settings.enable_search).then_some("none"))
            .on(
                "input",
                handler(weak, |inner, event: Event<web_sys::HtmlInputElement>| {
                    inner.filter(&event.target().value())
                }),
            )
            .on("keydown", handler(weak, |inner, event: KeyboardEvent| inner.handle_key(event))),
        (),
    );

    let options_container = el(
        "ul",
        Props::new()
            .class_name(&cn.options_container)
            .attr("role", "listbox")
            .attr("id", list_id.as_str()),
        (),
    );

    let help_text = settings
        .help_text
        .clone()
        .map(|text| el("div", Props::new().class_name(&cn.help_text), text));

    let dropdown = el(
        "div",
        Props::new()
            .class_name(&cn.dropdown_container)
            .style("pointer-events", Some("none"))
            .data("open", flag(false))
            .data("hasValue", flag(false)),
        Child::from(vec![
            Child::from(help_text),
            search_input.clone().into(),
            options_container.clone().into(),
        ]),
    );

    let class_list = root.class_list();
    for class in cn.container.split_whitespace() {
        class_list.add_1(class).unwrap_throw();
    }

    let dataset = root.dataset();
    dataset.set("open", "false").unwrap_throw();
    if settings.is_disabled {
        dataset.set("disabled", "true").unwrap_throw();
    }

    let mut parts = append(
        button_container.element(),
        [button.clone(), deselect_button.clone()],
    );
    parts.extend(append(&root, [button_container.clone(), dropdown.clone()]));

    let elements = Elements {
        root,
        button_container: button_container.element().clone(),
        button: button.element().clone(),
        deselect_button: deselect_button.element().clone(),
        dropdown: dropdown.element().clone(),
        search_input: search_input.element().clone().unchecked_into(),
        options_container: options_container.element().clone(),
    };

    (elements, parts)
}

impl<T: SelectOption> Inner<T> {
    pub(super) fn mark_open(&self, open: bool) {
        let el = &self.elements;
        let value = if open { "true" } else { "false" };

        for part in [&el.root, &el.dropdown, &el.button_container] {
            part.dataset().set("open", value).unwrap_throw();
        }

        el.button.set_attribute("aria-expanded", value).unwrap_throw();
    }

    pub(super) fn selected_row(&self) -> Option<HtmlElement> {
        self.elements
            .options_container
            .query_selector("[data-selected=\"1\"]")
            .ok()
            .flatten()
            .map(JsCast::unchecked_into)
    }

    /// Refresh the trigger button content and the "has value" markers.
    pub(super) fn update_button(&self) {
        let el = &self.elements;
        let settings = &self.settings;

        el.button.set_inner_html("");

        let selection = self.model.borrow().selection.clone();
        let has_value = !selection.is_empty();

        let content = match has_value {
            true => (settings.trigger_button)(&selection),
            false => settings.placeholder.clone(),
        };

        *self.button_content.borrow_mut() = append(&el.button, content);

        let style = el.deselect_button.style();
        if has_value {
            style.remove_property("display").unwrap_throw();
        } else {
            style.set_property("display", "none").unwrap_throw();
        }

        let value = if has_value { "true" } else { "false" };
        el.button_container.dataset().set("hasValue", value).unwrap_throw();
        el.dropdown.dataset().set("hasValue", value).unwrap_throw();
    }

    /// Render the rows of the filtered options, cancelling a pending clear.
    pub(super) fn render_rows(self: &Rc<Self>) {
        self.timers.clear_rows.borrow_mut().take();

        let list = &self.elements.options_container;
        let settings = &self.settings;
        let cn = &settings.class_names;

        list.set_inner_html("");

        let model = self.model.borrow();

        let rows: Child = if model.filtered_flat().is_empty() {
            el(
                "li",
                Props::new().class_name(&cn.no_result),
                settings.no_result.clone(),
            )
            .into()
        } else {
            let weak = Rc::downgrade(self);
            let mut rows = Vec::with_capacity(model.filtered().len() + model.filtered_flat().len());

            for (group_index, group) in model.filtered().iter().enumerate() {
                rows.push(el(
                    "li",
                    Props::new()
                        .attr("role", "group")
                        .text(group.name.as_str())
                        .class_name(&cn.option_group),
                    (),
                ));

                for (option_index, option) in group.options.iter().enumerate() {
                    let is_selected = model.is_selected(option);
                    let is_disabled = (settings.is_option_disabled)(option, model.current());

                    let mut props = Props::new()
                        .attr("role", "option")
                        .aria("aria-selected", "false")
                        .attr("id", row_id(self.id, group_index, option_index))
                        .class_name([
                            Some(cn.option_item.as_str()),
                            is_selected.then_some(cn.option_selected.as_str()),
                        ])
                        .data("selected", is_selected.then_some("1"));

                    if is_disabled {
                        props = props.aria("aria-disabled", "true");
                    }

                    let option = option.clone();
                    let label = (settings.label)(
                        &option,
                        OptionProps {
                            is_selected,
                            is_disabled,
                        },
                    );

                    props = props.on(
                        "click",
                        handler(&weak, move |inner, _: MouseEvent| {
                            if !is_disabled {
                                inner.commit(option.clone());
                            }
                        }),
                    );

                    rows.push(el("li", props, label));
                }
            }

            rows.into()
        };

        drop(model);

        let mounted = append(list, rows);

        // The previous rows drop here, detaching their listeners
        *self.rows.borrow_mut() = mounted;
    }

    /// Mirror the keyboard highlight onto the rendered rows and the search input.
    pub(super) fn update_active_descendant(&self, block: ScrollLogicalPosition) {
        let el = &self.elements;
        let cn = &self.settings.class_names;

        let Ok(rows) = el.options_container.query_selector_all("[role=option]") else {
            return;
        };

        let model = self.model.borrow();
        let active = model.active();

        for index in 0..rows.length() {
            let Some(row) = rows.item(index) else {
                continue;
            };
            let row: HtmlElement = row.unchecked_into();
            let index = index as usize;

            let is_selected = model
                .filtered_flat()
                .get(index)
                .is_some_and(|option| model.is_selected(option));
            let is_active = active == Some(index);

            let class: crate::dom::ClassName = [
                Some(cn.option_item.as_str()),
                is_selected.then_some(cn.option_selected.as_str()),
                is_active.then_some(cn.option_highlighted.as_str()),
            ]
            .into();

            row.set_class_name(&class.join().unwrap_or_default());

            if is_active {
                row.set_attribute("aria-selected", "true").unwrap_throw();
                scroll_into_view(&row, block);
                el.search_input
                    .set_attribute("aria-activedescendant", &row.id())
                    .unwrap_throw();
            } else {
                row.set_attribute("aria-selected", "false").unwrap_throw();
            }
        }
    }
}
