//! Runtime reflection of commands and options.
//! Consumed by help rendering; the parser core never formats anything itself.
use crate::option::parts::{Meta, Names};
use crate::option::{Kind, Slot};
use crate::registry::Registry;

/// Read-only description of one declared option.
#[derive(Debug, Clone)]
pub struct OptionInfo<'a> {
    kind: Kind,
    name: &'a str,
    aliases: &'a [String],
    description: Option<&'a str>,
    input_hint: Option<&'a str>,
    choices: Vec<&'a str>,
    has_default: bool,
    has_implicit: bool,
}

impl<'a> OptionInfo<'a> {
    pub(crate) fn named(kind: Kind, names: &'a Names, meta: &'a Meta) -> Self {
        Self {
            kind,
            name: &names.primary,
            aliases: &names.aliases,
            description: meta.description.as_deref(),
            input_hint: meta.input_hint.as_deref(),
            choices: Vec::new(),
            has_default: false,
            has_implicit: false,
        }
    }

    pub(crate) fn positional(kind: Kind, name: &'a str, meta: &'a Meta) -> Self {
        Self {
            kind,
            name,
            aliases: &[],
            description: meta.description.as_deref(),
            input_hint: meta.input_hint.as_deref(),
            choices: Vec::new(),
            has_default: false,
            has_implicit: false,
        }
    }

    pub(crate) fn fallbacks(mut self, has_default: bool, has_implicit: bool) -> Self {
        self.has_default = has_default;
        self.has_implicit = has_implicit;
        self
    }

    pub(crate) fn with_choices(mut self, choices: impl Iterator<Item = &'a str>) -> Self {
        self.choices = choices.collect();
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The primary flag name, or the positional name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[must_use]
    pub fn aliases(&self) -> &'a [String] {
        self.aliases
    }

    /// Does `name` equal the primary name or any alias?
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    #[must_use]
    pub fn description(&self) -> Option<&'a str> {
        self.description
    }

    #[must_use]
    pub fn input_hint(&self) -> Option<&'a str> {
        self.input_hint
    }

    /// Accepted literals of choice kinds, in declaration order. Empty for other kinds.
    pub fn choices(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.choices.iter().copied()
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    #[must_use]
    pub fn has_implicit(&self) -> bool {
        self.has_implicit
    }
}

/// Read-only description of one command of a [`Cli`](crate::Cli).
#[derive(Debug, Clone)]
pub struct CommandInfo<'a> {
    pub(crate) path: Vec<&'a str>,
    pub(crate) description: Option<&'a str>,
    pub(crate) registry: &'a Registry,
    pub(crate) subcommands: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> CommandInfo<'a> {
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.path.last().copied().unwrap_or_default()
    }

    /// Names from the program name down to this command.
    #[must_use]
    pub fn path(&self) -> &[&'a str] {
        &self.path
    }

    #[must_use]
    pub fn description(&self) -> Option<&'a str> {
        self.description
    }

    /// Flag-like options in registration order.
    pub fn named_options(&self) -> impl Iterator<Item = OptionInfo<'a>> + '_ {
        let registry = self.registry;
        registry
            .named_order()
            .iter()
            .filter_map(move |&(kind, id)| registry.slot(kind, id))
            .map(Slot::info)
    }

    /// Positionals in binding order, followed by the multi-positional if any.
    pub fn positionals(&self) -> impl Iterator<Item = OptionInfo<'a>> + '_ {
        let registry = self.registry;
        let singles = registry
            .positional_order()
            .iter()
            .filter_map(move |&id| registry.slot(Kind::Positional, id))
            .map(Slot::info);
        singles.chain(registry.get_multi_positional().map(|(_, s)| s.info()))
    }

    /// Direct subcommand names and descriptions in registration order.
    pub fn subcommands(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + '_ {
        self.subcommands.iter().copied()
    }
}
