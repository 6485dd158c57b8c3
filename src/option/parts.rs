//! Components shared by option kinds. Each kind embeds the subset it needs.
use std::ffi::{OsStr, OsString};

use crate::error::ConfigError;
use crate::values::{FromArg, ValueError};

use super::RawValue;

/// Primary name and aliases of a flag-like option.
#[derive(Debug, Clone)]
pub(crate) struct Names {
    pub primary: String,
    pub aliases: Vec<String>,
}

impl Names {
    pub fn new(primary: impl Into<String>) -> Self {
        Self { primary: primary.into(), aliases: Vec::new() }
    }

    pub fn add_alias(&mut self, alias: impl Into<String>) {
        self.aliases.push(alias.into());
    }

    pub fn all(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.all().any(|n| n == name)
    }
}

/// Help-only strings.
#[derive(Debug, Clone, Default)]
pub(crate) struct Meta {
    pub description: Option<String>,
    pub input_hint: Option<String>,
}

/// A value substituted for a flag given without any following value.
pub(crate) struct Implicit<T>(Box<dyn Fn() -> T>);

impl<T: Clone + 'static> Implicit<T> {
    pub fn new(value: T) -> Self {
        Self(Box::new(move || value.clone()))
    }
}

impl<T> Implicit<T> {
    pub fn make(&self) -> T {
        (self.0)()
    }
}

/// Storage of single-valued kinds.
pub(crate) struct Single<T> {
    pub value: Option<T>,
    pub default: Option<T>,
    pub implicit: Option<Implicit<T>>,
}

impl<T> Default for Single<T> {
    fn default() -> Self {
        Self { value: None, default: None, implicit: None }
    }
}

impl<T> Single<T> {
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref().or(self.default.as_ref())
    }
}

/// Storage of multi-valued kinds.
pub(crate) struct Many<T> {
    pub values: Vec<T>,
    pub set: bool,
    pub default: Vec<T>,
    pub implicit: Option<Implicit<Vec<T>>>,
}

impl<T> Default for Many<T> {
    fn default() -> Self {
        Self { values: Vec::new(), set: false, default: Vec::new(), implicit: None }
    }
}

impl<T> Many<T> {
    pub fn get(&self) -> &[T] {
        if self.set { &self.values } else { &self.default }
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.set = false;
    }
}

type Predicate<T> = Box<dyn Fn(&T) -> bool>;
type GroupPredicate<T> = Box<dyn Fn(&[T]) -> bool>;

/// Per-value predicates, each with the message reported when it rejects.
pub(crate) struct Validators<T>(Vec<(Predicate<T>, String)>);

impl<T> Default for Validators<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Validators<T> {
    pub fn push(&mut self, f: impl Fn(&T) -> bool + 'static, message: impl Into<String>) {
        self.0.push((Box::new(f), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the message of the first rejecting validator.
    pub fn check(&self, v: &T) -> Result<(), &str> {
        match self.0.iter().find(|(f, _)| !f(v)) {
            Some((_, msg)) => Err(msg),
            None => Ok(()),
        }
    }
}

/// Predicates over the whole collected sequence of a multi-valued kind.
pub(crate) struct GroupValidators<T>(Vec<(GroupPredicate<T>, String)>);

impl<T> Default for GroupValidators<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> GroupValidators<T> {
    pub fn push(&mut self, f: impl Fn(&[T]) -> bool + 'static, message: impl Into<String>) {
        self.0.push((Box::new(f), message.into()));
    }

    /// Messages of every rejecting validator.
    pub fn check<'a>(&'a self, vs: &'a [T]) -> impl Iterator<Item = &'a str> {
        self.0.iter().filter(|(f, _)| !f(vs)).map(|(_, msg)| msg.as_str())
    }
}

/// Turns one raw argument into `T` or a human readable reason.
pub(crate) trait Decode<T> {
    fn decode(&self, raw: &OsStr) -> Result<T, String>;
}

/// The conversion hook of free-form kinds, [`FromArg`] unless replaced.
pub(crate) struct Conversion<T>(Box<dyn Fn(&OsStr) -> Result<T, ValueError>>);

impl<T: FromArg> Default for Conversion<T> {
    fn default() -> Self {
        Self(Box::new(T::from_arg))
    }
}

impl<T> Conversion<T> {
    pub fn from_fn<F, E>(f: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + 'static,
        E: Into<ValueError>,
    {
        Self(Box::new(move |raw| {
            let s = raw.to_str().ok_or(ValueError::InvalidUtf8)?;
            f(s).map_err(Into::into)
        }))
    }
}

impl<T> Decode<T> for Conversion<T> {
    fn decode(&self, raw: &OsStr) -> Result<T, String> {
        (self.0)(raw).map_err(|err| err.to_string())
    }
}

/// The closed set of accepted literals of choice kinds.
pub(crate) struct ChoiceSet<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for ChoiceSet<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> ChoiceSet<T> {
    pub fn push(&mut self, key: impl Into<String>, value: T) {
        self.entries.push((key.into(), value));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Reject empty or repeated choice sets.
    pub fn validate(&self, option: &str) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyChoices(option.into()));
        }
        for (i, (key, _)) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|(k, _)| k == key) {
                return Err(ConfigError::DuplicateChoice {
                    option: option.into(),
                    choice: key.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<T: Clone> Decode<T> for ChoiceSet<T> {
    fn decode(&self, raw: &OsStr) -> Result<T, String> {
        raw.to_str()
            .and_then(|s| self.entries.iter().find(|(k, _)| k == s))
            .map(|(_, v)| v.clone())
            .ok_or_else(|| {
                format!("expected one of {}", self.keys().collect::<Vec<_>>().join(", "))
            })
    }
}

fn lossy(raw: &OsString) -> std::borrow::Cow<'_, str> {
    raw.to_string_lossy()
}

/// Decode and validate one raw value.
fn decode_checked<T>(
    name: &str,
    raw: &OsString,
    decoder: &dyn Decode<T>,
    validators: &Validators<T>,
) -> Result<T, String> {
    let invalid = |reason: &str| format!("invalid value '{}' for '{name}': {reason}", lossy(raw));
    let v = decoder.decode(raw).map_err(|reason| invalid(&reason))?;
    validators.check(&v).map_err(invalid)?;
    Ok(v)
}

/// Validate default and implicit values once against `validators`.
pub(crate) fn check_fallbacks<'a, T: 'a>(
    name: &str,
    validators: &Validators<T>,
    default: impl IntoIterator<Item = &'a T>,
    implicit: impl IntoIterator<Item = T>,
) -> Result<(), ConfigError> {
    if validators.is_empty() {
        return Ok(());
    }
    let fail = |kind: &'static str, message: &str| ConfigError::InvalidDefault {
        option: name.into(),
        kind,
        message: message.into(),
    };
    for v in default {
        validators.check(v).map_err(|msg| fail("default", msg))?;
    }
    for v in implicit {
        validators.check(&v).map_err(|msg| fail("implicit", msg))?;
    }
    Ok(())
}

/// Bind a single-valued option. Every occurrence after the first is an error.
pub(crate) fn bind_single<T>(
    name: &str,
    storage: &mut Single<T>,
    values: &[RawValue],
    decoder: &dyn Decode<T>,
    validators: &Validators<T>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (i, raw) in values.iter().enumerate() {
        if i != 0 {
            errors.push(format!("'{name}' cannot be given more than once"));
            continue;
        }
        let v = match &raw.text {
            Some(text) => decode_checked(name, text, decoder, validators),
            None => match &storage.implicit {
                Some(implicit) => Ok(implicit.make()),
                None => Err(format!("'{name}' has no implicit value and no value was given")),
            },
        };
        match v {
            Ok(v) => storage.value = Some(v),
            Err(msg) => errors.push(msg),
        }
    }
    errors
}

/// Bind every collected value of a multi-valued option, then run group validators.
pub(crate) fn bind_many<T>(
    name: &str,
    storage: &mut Many<T>,
    values: &[RawValue],
    decoder: &dyn Decode<T>,
    validators: &Validators<T>,
    groups: &GroupValidators<T>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for raw in values {
        match &raw.text {
            Some(text) => match decode_checked(name, text, decoder, validators) {
                Ok(v) => storage.values.push(v),
                Err(msg) => errors.push(msg),
            },
            None => match &storage.implicit {
                Some(implicit) => storage.values.extend(implicit.make()),
                None => {
                    errors.push(format!("'{name}' has no implicit value and no value was given"))
                }
            },
        }
    }
    if errors.is_empty() {
        storage.set = true;
        let rejected = groups.check(&storage.values);
        errors.extend(rejected.map(|msg| format!("invalid values for '{name}': {msg}")));
    }
    errors
}
