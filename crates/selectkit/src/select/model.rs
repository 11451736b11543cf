// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::borrow::Cow;
use std::rc::Rc;

/// Values that can be listed in a [`CustomSelect`](crate::select::CustomSelect).
///
/// The label is what the default renderers display and what the default
/// search predicate matches against.
///
/// ```
/// use std::borrow::Cow;
/// use selectkit::select::SelectOption;
///
/// #[derive(Clone, PartialEq)]
/// struct Country {
///     code: &'static str,
///     label: String,
/// }
///
/// impl SelectOption for Country {
///     fn label(&self) -> Cow<str> {
///         Cow::Borrowed(&self.label)
///     }
/// }
/// ```
pub trait SelectOption: Clone + PartialEq + 'static {
    fn label(&self) -> Cow<str>;
}

impl SelectOption for String {
    fn label(&self) -> Cow<str> {
        Cow::Borrowed(self)
    }
}

impl SelectOption for &'static str {
    fn label(&self) -> Cow<str> {
        Cow::Borrowed(self)
    }
}

impl SelectOption for Cow<'static, str> {
    fn label(&self) -> Cow<str> {
        Cow::Borrowed(self)
    }
}

/// A named, ordered group of options.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    pub name: String,
    pub options: Vec<T>,
}

impl<T> Group<T> {
    pub fn new<I>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        Group {
            name: name.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Current value of a select, its shape is fixed by the mode of the instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<T> {
    Single(Option<T>),
    Multiple(Vec<T>),
}

impl<T: PartialEq> Selection<T> {
    pub fn is_multiple(&self) -> bool {
        matches!(self, Selection::Multiple(_))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Single(option) => option.is_some() as usize,
            Selection::Multiple(options) => options.len(),
        }
    }

    pub fn contains(&self, option: &T) -> bool {
        self.as_slice().contains(option)
    }

    /// The selected option of a single select, `None` for multi selects.
    pub fn single(&self) -> Option<&T> {
        match self {
            Selection::Single(option) => option.as_ref(),
            Selection::Multiple(_) => None,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Selection::Single(option) => option.as_slice(),
            Selection::Multiple(options) => options,
        }
    }

    fn cleared(&self) -> Self {
        match self {
            Selection::Single(_) => Selection::Single(None),
            Selection::Multiple(_) => Selection::Multiple(Vec::new()),
        }
    }
}

/// Direction of a keyboard move through the filtered options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Down,
    Up,
}

/// State of a select instance, without any DOM attached.
pub(crate) struct Model<T> {
    data: Rc<[Group<T>]>,
    flat: Vec<T>,
    pub selection: Selection<T>,
    filtered: Vec<Group<T>>,
    filtered_flat: Vec<T>,
    pub is_open: bool,
    pub is_disabled: bool,
    active: Option<usize>,
}

impl<T: SelectOption> Model<T> {
    pub fn new(data: Vec<Group<T>>, multiple: bool, disabled: bool) -> Self {
        let flat: Vec<T> = data.iter().flat_map(|group| group.options.iter().cloned()).collect();

        Model {
            filtered: data.clone(),
            filtered_flat: flat.clone(),
            data: data.into(),
            flat,
            selection: match multiple {
                true => Selection::Multiple(Vec::new()),
                false => Selection::Single(None),
            },
            is_open: false,
            is_disabled: disabled,
            active: None,
        }
    }

    pub fn is_multiple(&self) -> bool {
        self.selection.is_multiple()
    }

    pub fn options(&self) -> &[T] {
        &self.flat
    }

    pub fn filtered(&self) -> &[Group<T>] {
        &self.filtered
    }

    pub fn filtered_flat(&self) -> &[T] {
        &self.filtered_flat
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_option(&self) -> Option<&T> {
        self.active.and_then(|index| self.filtered_flat.get(index))
    }

    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|&index| index < self.filtered_flat.len());
    }

    /// Option handed to the disable predicate: the single selection, if any.
    pub fn current(&self) -> Option<&T> {
        self.selection.single()
    }

    pub fn is_selected(&self, option: &T) -> bool {
        self.selection.contains(option)
    }

    /// Position of the single selection within the filtered options.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selection.single()?;

        self.filtered_flat.iter().position(|option| option == selected)
    }

    /// Keep the groups with at least one option matching `query`. The query is
    /// lowercased before it's handed to the predicate.
    pub fn filter<F>(&mut self, query: &str, is_visible: F)
    where
        F: Fn(&T, &str) -> bool,
    {
        let query = query.to_lowercase();

        self.filtered.clear();
        self.filtered_flat.clear();

        for group in self.data.iter() {
            let options: Vec<T> = group
                .options
                .iter()
                .filter(|option| is_visible(*option, &query))
                .cloned()
                .collect();

            if !options.is_empty() {
                self.filtered_flat.extend(options.iter().cloned());
                self.filtered.push(Group {
                    name: group.name.clone(),
                    options,
                });
            }
        }

        self.active = None;
    }

    /// Move the highlight by one, skipping disabled options. Stops at the
    /// bounds without wrapping, returns `false` if nothing moved.
    pub fn step<F>(&mut self, step: Step, is_disabled: F) -> bool
    where
        F: Fn(&T, Option<&T>) -> bool,
    {
        let len = self.filtered_flat.len();
        let current = self.current();

        let next = match (step, self.active) {
            (Step::Down, None) => (0..len).find(|&i| !is_disabled(&self.filtered_flat[i], current)),
            (Step::Down, Some(active)) => {
                (active + 1..len).find(|&i| !is_disabled(&self.filtered_flat[i], current))
            }
            (Step::Up, None) => None,
            (Step::Up, Some(active)) => (0..active)
                .rev()
                .find(|&i| !is_disabled(&self.filtered_flat[i], current)),
        };

        match next {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    /// Find `candidate` among the data, `None` if it's not listed.
    pub fn resolve(&self, candidate: Option<T>) -> Option<T> {
        let candidate = candidate?;

        self.flat.iter().find(|option| **option == candidate).cloned()
    }

    /// Set the single selection, returns `false` if it was already selected.
    pub fn select(&mut self, option: Option<T>) -> bool {
        match &mut self.selection {
            Selection::Single(current) if *current != option => {
                *current = option;
                true
            }
            _ => false,
        }
    }

    /// Flip membership of `option` in the multi selection. Options not listed
    /// in the data are ignored.
    pub fn toggle(&mut self, option: &T) -> bool {
        let listed = self.flat.contains(option);

        match &mut self.selection {
            Selection::Multiple(selected) => {
                if let Some(index) = selected.iter().position(|known| known == option) {
                    selected.remove(index);
                } else if listed {
                    selected.push(option.clone());
                } else {
                    return false;
                }
                true
            }
            Selection::Single(_) => false,
        }
    }

    /// Replace the multi selection, keeping only the listed values.
    pub fn select_many<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        if let Selection::Multiple(selected) = &mut self.selection {
            selected.clear();

            for value in values {
                if self.flat.contains(&value) && !selected.contains(&value) {
                    selected.push(value);
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.selection = self.selection.cleared();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> Vec<Group<&'static str>> {
        vec![Group::new("Fruit", ["apple", "banana", "cherry"])]
    }

    fn mixed() -> Vec<Group<&'static str>> {
        vec![
            Group::new("Fruit", ["apple", "banana", "cherry"]),
            Group::new("Vegetables", ["carrot", "leek", "potato"]),
        ]
    }

    fn contains(option: &&'static str, query: &str) -> bool {
        option.to_lowercase().contains(query)
    }

    fn never(_: &&'static str, _: Option<&&'static str>) -> bool {
        false
    }

    #[test]
    fn starts_closed_with_full_filter() {
        let model = Model::new(mixed(), false, false);

        assert!(!model.is_open);
        assert!(!model.is_disabled);
        assert_eq!(model.active(), None);
        assert_eq!(model.selection, Selection::Single(None));
        assert_eq!(model.filtered(), &mixed()[..]);
        assert_eq!(
            model.filtered_flat(),
            ["apple", "banana", "cherry", "carrot", "leek", "potato"]
        );
    }

    #[test]
    fn filter_keeps_order_and_drops_empty_groups() {
        let mut model = Model::new(mixed(), false, false);

        model.filter("BAN", contains);

        assert_eq!(model.filtered_flat(), ["banana"]);
        assert_eq!(model.filtered().len(), 1);
        assert_eq!(model.filtered()[0].name, "Fruit");

        model.filter("e", contains);

        assert_eq!(model.filtered_flat(), ["apple", "cherry", "leek"]);
        assert_eq!(model.filtered().len(), 2);
    }

    #[test]
    fn filter_without_matches_is_empty() {
        let mut model = Model::new(fruit(), false, false);

        model.filter("zzz", contains);

        assert!(model.filtered_flat().is_empty());
        assert!(model.filtered().is_empty());
    }

    #[test]
    fn clearing_the_query_restores_everything() {
        let mut model = Model::new(mixed(), false, false);

        model.filter("car", contains);
        model.filter("", contains);

        assert_eq!(model.filtered(), &mixed()[..]);
        assert_eq!(model.filtered_flat(), model.options());
    }

    #[test]
    fn filter_resets_highlight() {
        let mut model = Model::new(mixed(), false, false);

        model.step(Step::Down, never);
        model.step(Step::Down, never);
        assert_eq!(model.active(), Some(1));

        model.filter("a", contains);
        assert_eq!(model.active(), None);
    }

    #[test]
    fn keyboard_walk_skips_disabled() {
        let mut model = Model::new(mixed(), false, false);
        let no_b = |option: &&'static str, _: Option<&&'static str>| option.starts_with('b');

        let mut walked = Vec::new();
        while model.step(Step::Down, no_b) {
            walked.push(*model.active_option().unwrap());
        }

        assert_eq!(walked, ["apple", "cherry", "carrot", "leek", "potato"]);
    }

    #[test]
    fn keyboard_walk_does_not_wrap() {
        let mut model = Model::new(fruit(), false, false);

        for _ in 0..10 {
            model.step(Step::Down, never);
        }
        assert_eq!(model.active(), Some(2));

        for _ in 0..10 {
            model.step(Step::Up, never);
        }
        assert_eq!(model.active(), Some(0));
    }

    #[test]
    fn up_without_highlight_does_nothing() {
        let mut model = Model::new(fruit(), false, false);

        assert!(!model.step(Step::Up, never));
        assert_eq!(model.active(), None);
    }

    #[test]
    fn down_past_last_enabled_is_noop() {
        let mut model = Model::new(fruit(), false, false);
        let last_disabled = |option: &&'static str, _: Option<&&'static str>| *option == "cherry";

        model.step(Step::Down, last_disabled);
        model.step(Step::Down, last_disabled);
        assert!(!model.step(Step::Down, last_disabled));
        assert_eq!(model.active_option(), Some(&"banana"));
    }

    #[test]
    fn single_select_and_resolve() {
        let mut model = Model::new(fruit(), false, false);

        let target = model.resolve(Some("banana"));
        assert!(model.select(target));
        assert_eq!(model.selection, Selection::Single(Some("banana")));

        // same value again is a no-op
        assert!(!model.select(Some("banana")));

        assert_eq!(model.resolve(Some("durian")), None);
        assert!(model.select(model.resolve(Some("durian"))));
        assert_eq!(model.selection, Selection::Single(None));
    }

    #[test]
    fn selected_index_follows_filter() {
        let mut model = Model::new(mixed(), false, false);

        model.select(Some("leek"));
        assert_eq!(model.selected_index(), Some(4));

        model.filter("e", contains);
        assert_eq!(model.selected_index(), Some(2));

        model.filter("ban", contains);
        assert_eq!(model.selected_index(), None);
    }

    #[test]
    fn multi_toggle() {
        let data: Vec<Group<&str>> = vec![Group::new("Letters", ["a", "b", "c"])];
        let mut model = Model::new(data, true, false);

        model.toggle(&"a");
        model.toggle(&"b");
        model.toggle(&"a");

        assert_eq!(model.selection, Selection::Multiple(vec!["b"]));
        assert!(!model.toggle(&"z"));
        assert_eq!(model.current(), None);
    }

    #[test]
    fn multi_select_many_drops_unknown() {
        let mut model = Model::new(mixed(), true, false);

        model.toggle(&"leek");
        model.select_many(["cherry", "durian", "apple", "cherry"]);

        assert_eq!(model.selection, Selection::Multiple(vec!["cherry", "apple"]));
    }

    #[test]
    fn reset_keeps_the_mode() {
        let mut single = Model::new(fruit(), false, false);
        single.select(Some("apple"));
        single.reset();
        assert_eq!(single.selection, Selection::Single(None));

        let mut multi = Model::new(fruit(), true, false);
        multi.select_many(["apple", "banana"]);
        multi.reset();
        assert_eq!(multi.selection, Selection::Multiple(vec![]));
    }

    #[test]
    fn mode_specific_calls_are_ignored() {
        let mut single = Model::new(fruit(), false, false);
        assert!(!single.toggle(&"apple"));
        single.select_many(["apple"]);
        assert_eq!(single.selection, Selection::Single(None));

        let mut multi = Model::new(fruit(), true, false);
        assert!(!multi.select(Some("apple")));
        assert!(multi.selection.is_empty());
    }

    #[test]
    fn structured_options_use_their_label() {
        #[derive(Clone, PartialEq, Debug)]
        struct Country {
            code: &'static str,
            label: &'static str,
        }

        impl SelectOption for Country {
            fn label(&self) -> Cow<str> {
                Cow::Borrowed(self.label)
            }
        }

        let data: Vec<Group<Country>> = vec![Group::new(
            "Europe",
            [
                Country { code: "pl", label: "Poland" },
                Country { code: "pt", label: "Portugal" },
                Country { code: "es", label: "Spain" },
            ],
        )];

        let mut model = Model::new(data, false, false);
        model.filter("PO", |option: &Country, query: &str| {
            option.label().to_lowercase().contains(query)
        });

        let codes: Vec<_> = model.filtered_flat().iter().map(|c| c.code).collect();
        assert_eq!(codes, ["pl", "pt"]);
    }
}
