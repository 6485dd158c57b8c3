use std::any::Any;

use crate::error::ConfigError;
use crate::refl::OptionInfo;
use crate::values::{FromArg, ValueError};

use super::parts::{
    Conversion, GroupValidators, Many, Meta, Single, Validators, bind_many, bind_single,
    check_fallbacks,
};
use super::{Kind, RawValue, Slot};

fn check_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() { Err(ConfigError::EmptyName) } else { Ok(()) }
}

/// An argument bound by position, in declaration order.
pub struct Positional<T> {
    pub(super) name: String,
    pub(super) meta: Meta,
    pub(super) storage: Single<T>,
    pub(super) conversion: Conversion<T>,
    pub(super) validators: Validators<T>,
    fallbacks_checked: bool,
}

impl<T: FromArg> Positional<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_with_conversion(name, Conversion::default())
    }
}

impl<T: 'static> Positional<T> {
    /// Declare a positional of a type without built-in conversion.
    #[must_use]
    pub fn new_with_conversion_fn<F, E>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + 'static,
        E: Into<ValueError>,
    {
        Self::new_with_conversion(name, Conversion::from_fn(f))
    }

    fn new_with_conversion(name: impl Into<String>, conversion: Conversion<T>) -> Self {
        Self {
            name: name.into(),
            meta: Meta::default(),
            storage: Single::default(),
            conversion,
            validators: Validators::default(),
            fallbacks_checked: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: 'static> Slot for Positional<T> {
    fn info(&self) -> OptionInfo<'_> {
        OptionInfo::positional(Kind::Positional, &self.name, &self.meta)
            .fallbacks(self.storage.default.is_some(), false)
    }

    fn check_config(&self) -> Result<(), ConfigError> {
        check_name(&self.name)
    }

    fn is_set(&self) -> bool {
        self.storage.value.is_some()
    }

    fn bind(&mut self, values: &[RawValue]) -> Result<Vec<String>, ConfigError> {
        if !self.fallbacks_checked {
            check_fallbacks(&self.name, &self.validators, self.storage.default.as_ref(), None)?;
            self.fallbacks_checked = true;
        }
        Ok(bind_single(&self.name, &mut self.storage, values, &self.conversion, &self.validators))
    }

    fn reset(&mut self) {
        self.storage.value = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Collects every positional value left after the [`Positional`]s are filled.
///
/// At most one may be registered per command.
pub struct MultiPositional<T> {
    pub(super) name: String,
    pub(super) meta: Meta,
    pub(super) storage: Many<T>,
    pub(super) conversion: Conversion<T>,
    pub(super) validators: Validators<T>,
    pub(super) groups: GroupValidators<T>,
    fallbacks_checked: bool,
}

impl<T: FromArg> MultiPositional<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_with_conversion(name, Conversion::default())
    }
}

impl<T: 'static> MultiPositional<T> {
    /// Declare a multi-positional of a type without built-in conversion.
    #[must_use]
    pub fn new_with_conversion_fn<F, E>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + 'static,
        E: Into<ValueError>,
    {
        Self::new_with_conversion(name, Conversion::from_fn(f))
    }

    fn new_with_conversion(name: impl Into<String>, conversion: Conversion<T>) -> Self {
        Self {
            name: name.into(),
            meta: Meta::default(),
            storage: Many::default(),
            conversion,
            validators: Validators::default(),
            groups: GroupValidators::default(),
            fallbacks_checked: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: 'static> Slot for MultiPositional<T> {
    fn info(&self) -> OptionInfo<'_> {
        OptionInfo::positional(Kind::MultiPositional, &self.name, &self.meta)
            .fallbacks(!self.storage.default.is_empty(), false)
    }

    fn check_config(&self) -> Result<(), ConfigError> {
        check_name(&self.name)
    }

    fn is_set(&self) -> bool {
        self.storage.set
    }

    fn bind(&mut self, values: &[RawValue]) -> Result<Vec<String>, ConfigError> {
        if !self.fallbacks_checked {
            check_fallbacks(&self.name, &self.validators, &self.storage.default, None)?;
            self.fallbacks_checked = true;
        }
        Ok(bind_many(
            &self.name,
            &mut self.storage,
            values,
            &self.conversion,
            &self.validators,
            &self.groups,
        ))
    }

    fn reset(&mut self) {
        self.storage.reset();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(s: &str) -> RawValue {
        RawValue { text: Some(s.into()), index: 1 }
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(Positional::<String>::new("").check_config(), Err(ConfigError::EmptyName));
        assert_eq!(MultiPositional::<String>::new("").check_config(), Err(ConfigError::EmptyName));
        assert_eq!(Positional::<String>::new("FILE").check_config(), Ok(()));
    }

    #[test]
    fn multi_positional_default_until_bound() {
        let mut p = MultiPositional::<i32>::new("N").with_default([1, 2]);
        assert_eq!(p.storage.get(), [1, 2]);
        assert_eq!(p.bind(&[raw("-3")]), Ok(vec![]));
        assert_eq!(p.storage.get(), [-3]);
    }
}
