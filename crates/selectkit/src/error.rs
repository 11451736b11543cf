// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::{self, Display};

/// Error type returned by [`CustomSelect::new`](crate::select::CustomSelect::new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// There is no `window.document` in the current context, usually meaning
    /// the code is not running inside a browser page.
    NoDocument,

    /// The selector was valid, but no element on the page matches it.
    ContainerNotFound(String),

    /// The selector could not be parsed by the browser.
    InvalidSelector(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NoDocument => f.write_str("No document available in this context"),
            Error::ContainerNotFound(selector) => {
                write!(f, "No element matches the container selector `{selector}`")
            }
            Error::InvalidSelector(selector) => {
                write!(f, "`{selector}` is not a valid selector")
            }
        }
    }
}

impl std::error::Error for Error {}
