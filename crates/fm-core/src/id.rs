// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID newtypes shared across the scheduler.

use std::borrow::Borrow;
use std::fmt;

/// Defines a newtype wrapping a `String` id with the usual comparison,
/// display, and conversion impls.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identifies a job within a single run's DAG.
    pub struct JobId;
}

define_id! {
    /// Identifies a step within a job (optional; only steps that declare
    /// `id` in their spec get one).
    pub struct StepId;
}

define_id! {
    /// Identifies one invocation of the scheduler, used as the run
    /// directory name.
    pub struct RunId;
}

impl RunId {
    /// Builds a run id from a timestamp, matching the
    /// `YYYYMMDD-HHMMSS-mmmmmm` convention documented for the run
    /// directory layout.
    pub fn from_parts(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32, micros: u32) -> Self {
        Self(format!(
            "{year:04}{month:02}{day:02}-{hour:02}{min:02}{sec:02}-{micros:06}"
        ))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
