//! Option declarations.
//!
//! There are six kinds, each generic over its value type `T` and each owning
//! exactly one storage slot:
//!
//! | Kind                | Named by        | Values       | Resolves to    |
//! |---------------------|-----------------|--------------|----------------|
//! | [`Flag`]            | `-`-prefixed    | one          | `Option<&T>`   |
//! | [`MultiFlag`]       | `-`-prefixed    | zero or more | `&[T]`         |
//! | [`Choice`]          | `-`-prefixed    | one          | `Option<&T>`   |
//! | [`MultiChoice`]     | `-`-prefixed    | zero or more | `&[T]`         |
//! | [`Positional`]      | position        | one          | `Option<&T>`   |
//! | [`MultiPositional`] | trailing values | zero or more | `&[T]`         |
//!
//! Declarations are plain values configured by `with_*` methods, then moved
//! into a command by `CommandMut::add_*`.
use std::any::Any;
use std::ffi::OsString;

use crate::error::ConfigError;
use crate::refl::OptionInfo;

mod named;
pub(crate) mod parts;
mod positional;

pub use named::{Choice, Flag, MultiChoice, MultiFlag};
pub use positional::{MultiPositional, Positional};

/// The six option kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Flag,
    MultiFlag,
    Positional,
    MultiPositional,
    Choice,
    MultiChoice,
}

impl Kind {
    /// Is this kind matched by name rather than position?
    #[must_use]
    pub fn is_named(self) -> bool {
        !matches!(self, Self::Positional | Self::MultiPositional)
    }

    #[must_use]
    pub fn is_multi(self) -> bool {
        matches!(self, Self::MultiFlag | Self::MultiPositional | Self::MultiChoice)
    }
}

/// One value attached to an option occurrence by the AST builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawValue {
    /// `None` requests the implicit value.
    pub text: Option<OsString>,
    /// Argv position of the value, or of the flag itself for implicit values.
    pub index: usize,
}

/// The kind-common capability every stored option exposes to the registry.
pub(crate) trait Slot: 'static {
    fn info(&self) -> OptionInfo<'_>;

    /// Reject malformed declarations before insertion.
    fn check_config(&self) -> Result<(), ConfigError>;

    fn is_set(&self) -> bool;

    /// Convert, validate and store `values`, returning user-input errors.
    ///
    /// Single-valued kinds receive one value per occurrence.
    fn bind(&mut self, values: &[RawValue]) -> Result<Vec<String>, ConfigError>;

    /// Drop bound values, keeping declarations.
    fn reset(&mut self);

    fn as_any(&self) -> &dyn Any;
}

mod sealed {
    pub trait Sealed {}
}

/// Typed view of an option kind, used to resolve [`Handle`](crate::Handle)s.
///
/// This trait is sealed and implemented by the six kinds only.
pub trait OptionKind: sealed::Sealed + Sized + 'static {
    /// What [`Results::get`](crate::Results::get) returns.
    type Output<'a>
    where
        Self: 'a;

    #[doc(hidden)]
    const KIND: Kind;

    #[doc(hidden)]
    fn resolve(&self) -> Self::Output<'_>;
}

macro_rules! impl_option_kind {
    (single: $($ty:ident),*) => {
        $(
            impl<T: 'static> sealed::Sealed for $ty<T> {}
            impl<T: 'static> OptionKind for $ty<T> {
                type Output<'a> = Option<&'a T>;
                const KIND: Kind = Kind::$ty;
                fn resolve(&self) -> Option<&T> {
                    self.storage.get()
                }
            }
        )*
    };
    (many: $($ty:ident),*) => {
        $(
            impl<T: 'static> sealed::Sealed for $ty<T> {}
            impl<T: 'static> OptionKind for $ty<T> {
                type Output<'a> = &'a [T];
                const KIND: Kind = Kind::$ty;
                fn resolve(&self) -> &[T] {
                    self.storage.get()
                }
            }
        )*
    };
}

impl_option_kind!(single: Flag, Positional, Choice);
impl_option_kind!(many: MultiFlag, MultiPositional, MultiChoice);

/// `with_description` and `with_input_hint`, shared by all kinds.
macro_rules! impl_meta_setters {
    ($($ty:ident),*) => {
        $(
            impl<T: 'static> $ty<T> {
                /// Set the help description.
                #[must_use]
                pub fn with_description(mut self, description: impl Into<String>) -> Self {
                    self.meta.description = Some(description.into());
                    self
                }

                /// Set the value placeholder shown in help, eg. `FILE`.
                #[must_use]
                pub fn with_input_hint(mut self, hint: impl Into<String>) -> Self {
                    self.meta.input_hint = Some(hint.into());
                    self
                }
            }
        )*
    };
}

/// `with_alias`, shared by flag-like kinds.
macro_rules! impl_alias_setters {
    ($($ty:ident),*) => {
        $(
            impl<T: 'static> $ty<T> {
                /// Add another name matching this option.
                #[must_use]
                pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
                    self.names.add_alias(alias);
                    self
                }

                /// The primary name.
                #[must_use]
                pub fn name(&self) -> &str {
                    &self.names.primary
                }
            }
        )*
    };
}

/// `with_value_validator`, shared by all kinds.
macro_rules! impl_value_validator_setters {
    ($($ty:ident),*) => {
        $(
            impl<T: 'static> $ty<T> {
                /// Reject single values for which `f` returns `false`, reporting `message`.
                #[must_use]
                pub fn with_value_validator(
                    mut self,
                    f: impl Fn(&T) -> bool + 'static,
                    message: impl Into<String>,
                ) -> Self {
                    self.validators.push(f, message);
                    self
                }
            }
        )*
    };
}

/// `with_group_validator` and default/implicit sequences, shared by multi-valued kinds.
macro_rules! impl_many_setters {
    ($($ty:ident),*) => {
        $(
            impl<T: 'static> $ty<T> {
                /// Reject the whole collected sequence if `f` returns `false`, reporting `message`.
                #[must_use]
                pub fn with_group_validator(
                    mut self,
                    f: impl Fn(&[T]) -> bool + 'static,
                    message: impl Into<String>,
                ) -> Self {
                    self.groups.push(f, message);
                    self
                }

                /// Values returned when this option is not given.
                #[must_use]
                pub fn with_default(mut self, values: impl IntoIterator<Item = T>) -> Self {
                    self.storage.default = values.into_iter().collect();
                    self
                }

                #[must_use]
                pub fn default_value(&self) -> &[T] {
                    &self.storage.default
                }
            }
        )*
    };
}

/// `with_default` for single-valued kinds.
macro_rules! impl_single_setters {
    ($($ty:ident),*) => {
        $(
            impl<T: 'static> $ty<T> {
                /// Value returned when this option is not given.
                #[must_use]
                pub fn with_default(mut self, value: T) -> Self {
                    self.storage.default = Some(value);
                    self
                }

                #[must_use]
                pub fn default_value(&self) -> Option<&T> {
                    self.storage.default.as_ref()
                }
            }
        )*
    };
}

/// Implicit value setters of flag-like kinds.
macro_rules! impl_implicit_setters {
    (single: $($ty:ident),*) => {
        $(
            impl<T: Clone + 'static> $ty<T> {
                /// Value bound when the flag is given without a following value.
                #[must_use]
                pub fn with_implicit(mut self, value: T) -> Self {
                    self.storage.implicit = Some(parts::Implicit::new(value));
                    self
                }
            }

            impl<T: 'static> $ty<T> {
                #[must_use]
                pub fn is_implicit_set(&self) -> bool {
                    self.storage.implicit.is_some()
                }
            }
        )*
    };
    (many: $($ty:ident),*) => {
        $(
            impl<T: Clone + 'static> $ty<T> {
                /// Values bound when the flag is given without any following value.
                #[must_use]
                pub fn with_implicit(mut self, values: impl IntoIterator<Item = T>) -> Self {
                    let values = values.into_iter().collect::<Vec<_>>();
                    self.storage.implicit = Some(parts::Implicit::new(values));
                    self
                }
            }

            impl<T: 'static> $ty<T> {
                #[must_use]
                pub fn is_implicit_set(&self) -> bool {
                    self.storage.implicit.is_some()
                }
            }
        )*
    };
}

/// `with_conversion_fn` for free-form kinds.
macro_rules! impl_conversion_setters {
    ($($ty:ident),*) => {
        $(
            impl<T: 'static> $ty<T> {
                /// Replace the built-in conversion of this option.
                #[must_use]
                pub fn with_conversion_fn<F, E>(mut self, f: F) -> Self
                where
                    F: Fn(&str) -> Result<T, E> + 'static,
                    E: Into<crate::values::ValueError>,
                {
                    self.conversion = parts::Conversion::from_fn(f);
                    self
                }
            }
        )*
    };
}

impl_meta_setters!(Flag, MultiFlag, Positional, MultiPositional, Choice, MultiChoice);
impl_alias_setters!(Flag, MultiFlag, Choice, MultiChoice);
impl_value_validator_setters!(Flag, MultiFlag, Positional, MultiPositional, Choice, MultiChoice);
impl_many_setters!(MultiFlag, MultiPositional, MultiChoice);
impl_single_setters!(Flag, Positional, Choice);
impl_implicit_setters!(single: Flag, Choice);
impl_implicit_setters!(many: MultiFlag, MultiChoice);
impl_conversion_setters!(Flag, MultiFlag, Positional, MultiPositional);
