//! # Error context
//!
//! Helpers shared by every art error enum. Each enum variant carries a
//! `context: Option<Cow<'static, str>>` field; [`error_context!`] generates the matching
//! `...Ext` trait with `.context()`, and [`format_context`] renders the field inside
//! `#[error(...)]` messages.
//!
//! ```rust
//! use art_error::{error_context, format_context};
//! use std::borrow::Cow;
//!
//! #[derive(Debug, thiserror::Error)]
//! pub enum StoreError {
//!     #[error("I/O error{}: {source}", format_context(.context))]
//!     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
//! }
//!
//! error_context!(StoreError, StoreErrorExt, variants: [Io], sources: [Io(std::io::Error)]);
//!
//! let err = std::fs::read("missing.bin").context("Reading blob").unwrap_err();
//! assert!(err.to_string().starts_with("I/O error (Reading blob): "));
//! ```

use std::borrow::Cow;

/// Renders an optional error context as ` (<context>)`, or nothing.
#[must_use]
pub fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

/// Generates the `...Ext` context trait for an error enum whose variants all carry a
/// `context: Option<Cow<'static, str>>` field, plus `From` and `.context()` for the
/// listed source-wrapping variants.
///
/// The generated trait is local to the calling crate, so further `...Ext` impls for
/// other results can be written by hand next to it.
#[macro_export]
macro_rules! error_context {
    (
        $error:ident, $ext:ident,
        variants: [$($variant:ident),+ $(,)?]
        $(, sources: [$($source_variant:ident($source:ty)),* $(,)?])?
    ) => {
        pub trait $ext<T> {
            /// Attaches a human readable context to the error, if any.
            ///
            /// # Errors
            /// Returns the original error with its context set.
            fn context(
                self,
                context: impl Into<::std::borrow::Cow<'static, str>>,
            ) -> ::std::result::Result<T, $error>;
        }

        impl<T> $ext<T> for ::std::result::Result<T, $error> {
            #[inline]
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        $( $error::$variant { context: c, .. } )|+ => *c = Some(context.into()),
                    }
                    e
                })
            }
        }

        $($(
            impl ::std::convert::From<$source> for $error {
                #[inline]
                fn from(source: $source) -> Self {
                    Self::$source_variant { source, context: None }
                }
            }

            impl<T> $ext<T> for ::std::result::Result<T, $source> {
                #[inline]
                fn context(
                    self,
                    context: impl Into<::std::borrow::Cow<'static, str>>,
                ) -> ::std::result::Result<T, $error> {
                    self.map_err(|source| $error::$source_variant {
                        source,
                        context: Some(context.into()),
                    })
                }
            }
        )*)?
    };
}
