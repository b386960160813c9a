/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod dawg;
pub mod dict;
pub mod error;
pub mod format;
pub mod metric;
pub mod query;
pub mod search;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use dict::{Dict, Set};
pub use error::{Error, Result};
pub use metric::{Metric, Rule};
pub use value::Value;

/// Prelude module to import the public surface of this crate.
pub mod prelude {
    pub use crate::dict::{Dict, Set};
    pub use crate::error::{Error, Result};
    pub use crate::metric::{Metric, Rule};
    pub use crate::value::Value;
}
