// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use crate::dom::Child;
use crate::select::{Group, SelectOption, Selection};

/// Flags handed to the option row renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionProps {
    pub is_selected: bool,
    pub is_disabled: bool,
}

pub(crate) type LabelFn<T> = Rc<dyn Fn(&T, OptionProps) -> Child>;
pub(crate) type VisibleFn<T> = Rc<dyn Fn(&T, &str) -> bool>;
pub(crate) type DisabledFn<T> = Rc<dyn Fn(&T, Option<&T>) -> bool>;
pub(crate) type TriggerFn<T> = Rc<dyn Fn(&Selection<T>) -> Child>;
pub(crate) type ChangeFn<T> = Rc<dyn Fn(&Selection<T>)>;
pub(crate) type OpenChangeFn = Rc<dyn Fn(bool)>;

/// Class name for each structural part of the widget. Empty names are not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ClassNames {
    pub container: String,
    pub button_container: String,
    pub trigger_button: String,
    pub deselect_button: String,
    pub dropdown_container: String,
    pub help_text: String,
    pub search_input: String,
    pub options_container: String,
    pub option_group: String,
    pub option_item: String,
    pub option_highlighted: String,
    pub option_selected: String,
    pub no_result: String,
}

/// Configuration of a [`CustomSelect`](crate::select::CustomSelect).
///
/// Everything except the data is optional:
///
/// ```
/// use selectkit::select::{ClassNames, Config, Group};
///
/// let config = Config::new(vec![Group::new("Fruit", ["apple", "banana"])])
///     .multiple(true)
///     .placeholder("Pick some fruit")
///     .is_disabled(|option: &&str, _| *option == "banana")
///     .class_names(ClassNames {
///         option_item: "row".into(),
///         ..ClassNames::default()
///     });
/// # drop(config);
/// ```
pub struct Config<T> {
    data: Vec<Group<T>>,
    enable_search: bool,
    is_disabled: bool,
    is_multiple: bool,
    on_change: Option<ChangeFn<T>>,
    on_open_change: Option<OpenChangeFn>,
    label: Option<LabelFn<T>>,
    is_visible: Option<VisibleFn<T>>,
    is_option_disabled: Option<DisabledFn<T>>,
    trigger_button: Option<TriggerFn<T>>,
    placeholder: Option<Child>,
    help_text: Option<Child>,
    search_placeholder: Option<String>,
    deselect_button: Option<Child>,
    no_result: Option<Child>,
    class_names: ClassNames,
}

impl<T: SelectOption> Config<T> {
    pub fn new(data: Vec<Group<T>>) -> Self {
        Config {
            data,
            enable_search: true,
            is_disabled: false,
            is_multiple: false,
            on_change: None,
            on_open_change: None,
            label: None,
            is_visible: None,
            is_option_disabled: None,
            trigger_button: None,
            placeholder: None,
            help_text: None,
            search_placeholder: None,
            deselect_button: None,
            no_result: None,
            class_names: ClassNames::default(),
        }
    }

    /// Show the search input, on by default. Without it the trigger button
    /// handles keyboard navigation.
    pub fn search(mut self, enable: bool) -> Self {
        self.enable_search = enable;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.is_disabled = disabled;
        self
    }

    /// Allow selecting many options. Fixed for the lifetime of the instance.
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.is_multiple = multiple;
        self
    }

    /// Called after every committed change of the value.
    pub fn on_change(mut self, f: impl Fn(&Selection<T>) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    /// Called on every open and close of the dropdown.
    pub fn on_open_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_open_change = Some(Rc::new(f));
        self
    }

    /// Content of an option row.
    pub fn label<C>(mut self, f: impl Fn(&T, OptionProps) -> C + 'static) -> Self
    where
        C: Into<Child>,
    {
        self.label = Some(Rc::new(move |option, props| f(option, props).into()));
        self
    }

    /// Search predicate, receives the lowercased query.
    pub fn is_visible(mut self, f: impl Fn(&T, &str) -> bool + 'static) -> Self {
        self.is_visible = Some(Rc::new(f));
        self
    }

    /// Per-option disable predicate, receives the current single selection.
    pub fn is_disabled(mut self, f: impl Fn(&T, Option<&T>) -> bool + 'static) -> Self {
        self.is_option_disabled = Some(Rc::new(f));
        self
    }

    /// Content of the trigger button while something is selected.
    pub fn trigger_button<C>(mut self, f: impl Fn(&Selection<T>) -> C + 'static) -> Self
    where
        C: Into<Child>,
    {
        self.trigger_button = Some(Rc::new(move |selection| f(selection).into()));
        self
    }

    pub fn placeholder(mut self, content: impl Into<Child>) -> Self {
        self.placeholder = Some(content.into());
        self
    }

    pub fn help_text(mut self, content: impl Into<Child>) -> Self {
        self.help_text = Some(content.into());
        self
    }

    pub fn search_placeholder(mut self, text: impl Into<String>) -> Self {
        self.search_placeholder = Some(text.into());
        self
    }

    pub fn deselect_button(mut self, content: impl Into<Child>) -> Self {
        self.deselect_button = Some(content.into());
        self
    }

    pub fn no_result(mut self, content: impl Into<Child>) -> Self {
        self.no_result = Some(content.into());
        self
    }

    pub fn class_names(mut self, class_names: ClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    /// Split into the data and the settings with every default filled in.
    pub(crate) fn normalize(self) -> (Vec<Group<T>>, Settings<T>) {
        let label = self.label.unwrap_or_else(|| Rc::new(default_label::<T>));

        // Independent of a custom row renderer
        let trigger_button = self
            .trigger_button
            .unwrap_or_else(|| Rc::new(default_trigger_button::<T>));

        let settings = Settings {
            enable_search: self.enable_search,
            is_disabled: self.is_disabled,
            is_multiple: self.is_multiple,
            on_change: self.on_change.unwrap_or_else(|| Rc::new(|_| ())),
            on_open_change: self.on_open_change.unwrap_or_else(|| Rc::new(|_| ())),
            label,
            is_visible: self.is_visible.unwrap_or_else(|| Rc::new(default_is_visible::<T>)),
            is_option_disabled: self.is_option_disabled.unwrap_or_else(|| Rc::new(|_, _| false)),
            trigger_button,
            placeholder: self.placeholder.unwrap_or(Child::Text("Select an option...".into())),
            help_text: self.help_text,
            search_placeholder: self.search_placeholder.unwrap_or_else(|| "Search...".into()),
            deselect_button: self.deselect_button.unwrap_or(Child::Text("×".into())),
            no_result: self.no_result.unwrap_or(Child::Text("No results found".into())),
            class_names: self.class_names,
        };

        (self.data, settings)
    }
}

fn default_label<T: SelectOption>(option: &T, props: OptionProps) -> Child {
    match props.is_selected {
        true => format!("{} ✅", option.label()).into(),
        false => option.label().into_owned().into(),
    }
}

fn default_trigger_button<T: SelectOption>(selection: &Selection<T>) -> Child {
    match selection {
        Selection::Single(Some(option)) => default_label(option, OptionProps::default()),
        Selection::Single(None) => Child::Empty,
        Selection::Multiple(options) => format!("{} selected", options.len()).into(),
    }
}

fn default_is_visible<T: SelectOption>(option: &T, query: &str) -> bool {
    option.label().to_lowercase().contains(query)
}

/// Normalized configuration.
pub(crate) struct Settings<T> {
    pub enable_search: bool,
    pub is_disabled: bool,
    pub is_multiple: bool,
    pub on_change: ChangeFn<T>,
    pub on_open_change: OpenChangeFn,
    pub label: LabelFn<T>,
    pub is_visible: VisibleFn<T>,
    pub is_option_disabled: DisabledFn<T>,
    pub trigger_button: TriggerFn<T>,
    pub placeholder: Child,
    pub help_text: Option<Child>,
    pub search_placeholder: String,
    pub deselect_button: Child,
    pub no_result: Child,
    pub class_names: ClassNames,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(child: Child) -> String {
        match child {
            Child::Text(text) => text.into_owned(),
            other => panic!("expected text, got {other:?}"),
        }
    }

    fn data() -> Vec<Group<&'static str>> {
        vec![Group::new("Fruit", ["Apple", "Banana"])]
    }

    #[test]
    fn defaults() {
        let (data, settings) = Config::new(data()).normalize();

        assert_eq!(data.len(), 1);
        assert!(settings.enable_search);
        assert!(!settings.is_disabled);
        assert!(!settings.is_multiple);
        assert_eq!(settings.search_placeholder, "Search...");
        assert_eq!(text(settings.placeholder), "Select an option...");
        assert_eq!(text(settings.deselect_button), "×");
        assert_eq!(text(settings.no_result), "No results found");
        assert!(settings.help_text.is_none());
        assert!(!(settings.is_option_disabled)(&"Apple", None));
    }

    #[test]
    fn default_label_marks_selection() {
        let (_, settings) = Config::new(data()).normalize();
        let selected = OptionProps {
            is_selected: true,
            is_disabled: false,
        };

        assert_eq!(text((settings.label)(&"Apple", OptionProps::default())), "Apple");
        assert_eq!(text((settings.label)(&"Apple", selected)), "Apple ✅");
    }

    #[test]
    fn default_search_is_case_insensitive_substring() {
        let (_, settings) = Config::new(data()).normalize();

        assert!((settings.is_visible)(&"Banana", "nan"));
        assert!((settings.is_visible)(&"Banana", ""));
        assert!(!(settings.is_visible)(&"Banana", "apple"));
    }

    #[test]
    fn default_trigger_content() {
        let (_, single) = Config::new(data()).normalize();
        let (_, multi) = Config::new(data()).multiple(true).normalize();

        assert_eq!(
            text((single.trigger_button)(&Selection::Single(Some("Apple")))),
            "Apple"
        );
        assert_eq!(
            text((multi.trigger_button)(&Selection::Multiple(vec!["Apple", "Banana"]))),
            "2 selected"
        );
    }

    #[test]
    fn custom_label_leaves_trigger_plain() {
        let (_, settings) = Config::new(data())
            .label(|option: &&str, _| format!("[row] {option}"))
            .normalize();

        assert_eq!(text((settings.label)(&"Apple", OptionProps::default())), "[row] Apple");
        assert_eq!(
            text((settings.trigger_button)(&Selection::Single(Some("Apple")))),
            "Apple"
        );
    }

    #[test]
    fn custom_content_is_kept() {
        let (_, settings) = Config::new(data())
            .search(false)
            .placeholder("Pick one")
            .search_placeholder("Type...")
            .label(|option: &&str, _| option.to_uppercase())
            .normalize();

        assert!(!settings.enable_search);
        assert_eq!(text(settings.placeholder), "Pick one");
        assert_eq!(settings.search_placeholder, "Type...");
        assert_eq!(text((settings.label)(&"Apple", OptionProps::default())), "APPLE");
    }
}
