// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::Cell;

use wasm_bindgen::{JsCast, UnwrapThrowExt};
use web_sys::{Document, HtmlElement};

use crate::Error;

pub(crate) fn try_document() -> Result<Document, Error> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or(Error::NoDocument)
}

pub(crate) fn document() -> Document {
    try_document().expect_throw("no document")
}

pub(crate) fn create_element(tag: &str) -> HtmlElement {
    document()
        .create_element(tag)
        .expect_throw("invalid tag name")
        .unchecked_into()
}

/// Resolve a selector against the document. Only the first match is returned.
pub(crate) fn query(selector: &str) -> Result<HtmlElement, Error> {
    try_document()?
        .query_selector(selector)
        .map_err(|_| Error::InvalidSelector(selector.into()))?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| Error::ContainerNotFound(selector.into()))
}

/// Page-unique id for widget instances, used to derive element ids.
pub(crate) fn next_instance_id() -> u32 {
    thread_local! {
        static NEXT: Cell<u32> = const { Cell::new(0) };
    }

    NEXT.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    })
}
