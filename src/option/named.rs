use std::any::Any;

use crate::error::ConfigError;
use crate::refl::OptionInfo;
use crate::util::is_valid_flag_name;
use crate::values::{FromArg, ValueError};

use super::parts::{
    ChoiceSet, Conversion, GroupValidators, Implicit, Many, Meta, Names, Single, Validators,
    bind_many, bind_single, check_fallbacks,
};
use super::{Kind, RawValue, Slot};

fn check_names(names: &Names) -> Result<(), ConfigError> {
    match names.all().find(|n| !is_valid_flag_name(n)) {
        Some(bad) => Err(ConfigError::InvalidFlagName(bad.into())),
        None => Ok(()),
    }
}

/// A named option taking one value, eg. `--jobs 4`.
///
/// Give it an implicit value to make the value optional, eg. a `bool`
/// switch: `Flag::new("--verbose").with_implicit(true)`.
pub struct Flag<T> {
    pub(super) names: Names,
    pub(super) meta: Meta,
    pub(super) storage: Single<T>,
    pub(super) conversion: Conversion<T>,
    pub(super) validators: Validators<T>,
    fallbacks_checked: bool,
}

impl<T: FromArg> Flag<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_with_conversion(name, Conversion::default())
    }
}

impl<T: 'static> Flag<T> {
    /// Declare a flag of a type without built-in conversion.
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
            names: Names::new(name),
            meta: Meta::default(),
            storage: Single::default(),
            conversion,
            validators: Validators::default(),
            fallbacks_checked: false,
        }
    }
}

impl<T: 'static> Slot for Flag<T> {
    fn info(&self) -> OptionInfo<'_> {
        OptionInfo::named(Kind::Flag, &self.names, &self.meta)
            .fallbacks(self.storage.default.is_some(), self.storage.implicit.is_some())
    }

    fn check_config(&self) -> Result<(), ConfigError> {
        check_names(&self.names)
    }

    fn is_set(&self) -> bool {
        self.storage.value.is_some()
    }

    fn bind(&mut self, values: &[RawValue]) -> Result<Vec<String>, ConfigError> {
        if !self.fallbacks_checked {
            check_fallbacks(
                &self.names.primary,
                &self.validators,
                self.storage.default.as_ref(),
                self.storage.implicit.as_ref().map(Implicit::make),
            )?;
            self.fallbacks_checked = true;
        }
        let name = &self.names.primary;
        Ok(bind_single(name, &mut self.storage, values, &self.conversion, &self.validators))
    }

    fn reset(&mut self) {
        self.storage.value = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A named option collecting zero or more values per occurrence, eg. `--include a b --include c`.
///
/// Values of every occurrence are accumulated in command line order.
pub struct MultiFlag<T> {
    pub(super) names: Names,
    pub(super) meta: Meta,
    pub(super) storage: Many<T>,
    pub(super) conversion: Conversion<T>,
    pub(super) validators: Validators<T>,
    pub(super) groups: GroupValidators<T>,
    fallbacks_checked: bool,
}

impl<T: FromArg> MultiFlag<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_with_conversion(name, Conversion::default())
    }
}

impl<T: 'static> MultiFlag<T> {
    /// Declare a multi-flag of a type without built-in conversion.
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
            names: Names::new(name),
            meta: Meta::default(),
            storage: Many::default(),
            conversion,
            validators: Validators::default(),
            groups: GroupValidators::default(),
            fallbacks_checked: false,
        }
    }
}

impl<T: 'static> Slot for MultiFlag<T> {
    fn info(&self) -> OptionInfo<'_> {
        OptionInfo::named(Kind::MultiFlag, &self.names, &self.meta)
            .fallbacks(!self.storage.default.is_empty(), self.storage.implicit.is_some())
    }

    fn check_config(&self) -> Result<(), ConfigError> {
        check_names(&self.names)
    }

    fn is_set(&self) -> bool {
        self.storage.set
    }

    fn bind(&mut self, values: &[RawValue]) -> Result<Vec<String>, ConfigError> {
        if !self.fallbacks_checked {
            check_fallbacks(
                &self.names.primary,
                &self.validators,
                &self.storage.default,
                self.storage.implicit.as_ref().map(Implicit::make).into_iter().flatten(),
            )?;
            self.fallbacks_checked = true;
        }
        Ok(bind_many(
            &self.names.primary,
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

/// A named option whose value is one of a closed set of literals, eg. `--color auto`.
///
/// Each literal maps to a value of `T`.
pub struct Choice<T> {
    pub(super) names: Names,
    pub(super) meta: Meta,
    pub(super) storage: Single<T>,
    pub(super) choices: ChoiceSet<T>,
    pub(super) validators: Validators<T>,
    fallbacks_checked: bool,
}

impl<T: Clone + 'static> Choice<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: Names::new(name),
            meta: Meta::default(),
            storage: Single::default(),
            choices: ChoiceSet::default(),
            validators: Validators::default(),
            fallbacks_checked: false,
        }
    }

    /// Accept `literal` on the command line, binding `value`.
    #[must_use]
    pub fn with_choice(mut self, literal: impl Into<String>, value: T) -> Self {
        self.choices.push(literal, value);
        self
    }
}

impl<T: 'static> Choice<T> {
    pub fn choices(&self) -> impl Iterator<Item = &str> {
        self.choices.keys()
    }
}

impl<T: Clone + 'static> Slot for Choice<T> {
    fn info(&self) -> OptionInfo<'_> {
        OptionInfo::named(Kind::Choice, &self.names, &self.meta)
            .fallbacks(self.storage.default.is_some(), self.storage.implicit.is_some())
            .with_choices(self.choices.keys())
    }

    fn check_config(&self) -> Result<(), ConfigError> {
        check_names(&self.names)?;
        self.choices.validate(&self.names.primary)
    }

    fn is_set(&self) -> bool {
        self.storage.value.is_some()
    }

    fn bind(&mut self, values: &[RawValue]) -> Result<Vec<String>, ConfigError> {
        if !self.fallbacks_checked {
            check_fallbacks(
                &self.names.primary,
                &self.validators,
                self.storage.default.as_ref(),
                self.storage.implicit.as_ref().map(Implicit::make),
            )?;
            self.fallbacks_checked = true;
        }
        let name = &self.names.primary;
        Ok(bind_single(name, &mut self.storage, values, &self.choices, &self.validators))
    }

    fn reset(&mut self) {
        self.storage.value = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A named option collecting literals of a closed set, eg. `--feature a b`.
pub struct MultiChoice<T> {
    pub(super) names: Names,
    pub(super) meta: Meta,
    pub(super) storage: Many<T>,
    pub(super) choices: ChoiceSet<T>,
    pub(super) validators: Validators<T>,
    pub(super) groups: GroupValidators<T>,
    fallbacks_checked: bool,
}

impl<T: Clone + 'static> MultiChoice<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: Names::new(name),
            meta: Meta::default(),
            storage: Many::default(),
            choices: ChoiceSet::default(),
            validators: Validators::default(),
            groups: GroupValidators::default(),
            fallbacks_checked: false,
        }
    }

    /// Accept `literal` on the command line, binding `value`.
    #[must_use]
    pub fn with_choice(mut self, literal: impl Into<String>, value: T) -> Self {
        self.choices.push(literal, value);
        self
    }
}

impl<T: 'static> MultiChoice<T> {
    pub fn choices(&self) -> impl Iterator<Item = &str> {
        self.choices.keys()
    }
}

impl<T: Clone + 'static> Slot for MultiChoice<T> {
    fn info(&self) -> OptionInfo<'_> {
        OptionInfo::named(Kind::MultiChoice, &self.names, &self.meta)
            .fallbacks(!self.storage.default.is_empty(), self.storage.implicit.is_some())
            .with_choices(self.choices.keys())
    }

    fn check_config(&self) -> Result<(), ConfigError> {
        check_names(&self.names)?;
        self.choices.validate(&self.names.primary)
    }

    fn is_set(&self) -> bool {
        self.storage.set
    }

    fn bind(&mut self, values: &[RawValue]) -> Result<Vec<String>, ConfigError> {
        if !self.fallbacks_checked {
            check_fallbacks(
                &self.names.primary,
                &self.validators,
                &self.storage.default,
                self.storage.implicit.as_ref().map(Implicit::make).into_iter().flatten(),
            )?;
            self.fallbacks_checked = true;
        }
        Ok(bind_many(
            &self.names.primary,
            &mut self.storage,
            values,
            &self.choices,
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
