//! The per-command collection of declared options.
use std::collections::HashMap;
use std::fmt;

use crate::error::ConfigError;
use crate::option::{Kind, OptionKind, Slot};

/// Process-unique identity of a registered option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Id(u64);

/// Hands out [`Id`]s monotonically. One allocator is shared by a whole command tree.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn next(&mut self) -> Id {
        let id = Id(self.next);
        self.next += 1;
        id
    }
}

type SlotMap = HashMap<Id, Box<dyn Slot>>;

/// Options of one command scope, keyed by kind and [`Id`].
///
/// Built during configuration, written during analysis, read-only afterwards.
#[derive(Default)]
pub(crate) struct Registry {
    command: String,
    flags: SlotMap,
    multi_flags: SlotMap,
    positionals: SlotMap,
    multi_positionals: SlotMap,
    choices: SlotMap,
    multi_choices: SlotMap,
    /// Flag-like options in registration order.
    named_order: Vec<(Kind, Id)>,
    /// Positional binding order.
    positional_order: Vec<Id>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("command", &self.command)
            .field("named_order", &self.named_order)
            .field("positional_order", &self.positional_order)
            .finish_non_exhaustive()
    }
}

impl Registry {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), ..Self::default() }
    }

    fn map(&self, kind: Kind) -> &SlotMap {
        match kind {
            Kind::Flag => &self.flags,
            Kind::MultiFlag => &self.multi_flags,
            Kind::Positional => &self.positionals,
            Kind::MultiPositional => &self.multi_positionals,
            Kind::Choice => &self.choices,
            Kind::MultiChoice => &self.multi_choices,
        }
    }

    fn map_mut(&mut self, kind: Kind) -> &mut SlotMap {
        match kind {
            Kind::Flag => &mut self.flags,
            Kind::MultiFlag => &mut self.multi_flags,
            Kind::Positional => &mut self.positionals,
            Kind::MultiPositional => &mut self.multi_positionals,
            Kind::Choice => &mut self.choices,
            Kind::MultiChoice => &mut self.multi_choices,
        }
    }

    /// Register `option`, rejecting malformed declarations and name collisions
    /// with options of this command.
    ///
    /// Flag-like names and aliases are unique across all flag-like kinds,
    /// positional names across both positional kinds.
    pub fn add<O: OptionKind + Slot>(
        &mut self,
        ids: &mut IdAllocator,
        option: O,
    ) -> Result<Id, ConfigError> {
        option.check_config()?;
        let info = option.info();
        let duplicate = |name: &str| ConfigError::DuplicateName {
            command: self.command.clone(),
            name: name.into(),
        };
        if O::KIND.is_named() {
            let mut seen = Vec::with_capacity(1 + info.aliases().len());
            let aliases = info.aliases().iter().map(String::as_str);
            for name in std::iter::once(info.name()).chain(aliases) {
                if seen.contains(&name) || self.find_named(name).is_some() {
                    return Err(duplicate(name));
                }
                seen.push(name);
            }
        } else if self.contains(Kind::Positional, info.name())
            || self.contains(Kind::MultiPositional, info.name())
        {
            return Err(duplicate(info.name()));
        }
        if O::KIND == Kind::MultiPositional {
            if let Some((_, existing)) = self.get_multi_positional() {
                return Err(ConfigError::MultiplePositionalSinks {
                    command: self.command.clone(),
                    existing: existing.info().name().into(),
                });
            }
        }

        let id = ids.next();
        tracing::trace!(
            command = %self.command,
            kind = ?O::KIND,
            name = info.name(),
            ?id,
            "register option"
        );
        match O::KIND {
            Kind::Positional => self.positional_order.push(id),
            Kind::MultiPositional => {}
            kind => self.named_order.push((kind, id)),
        }
        self.map_mut(O::KIND).insert(id, Box::new(option));
        Ok(id)
    }

    pub fn slot(&self, kind: Kind, id: Id) -> Option<&dyn Slot> {
        self.map(kind).get(&id).map(|s| &**s)
    }

    pub fn slot_mut(&mut self, kind: Kind, id: Id) -> Option<&mut dyn Slot> {
        self.map_mut(kind).get_mut(&id).map(|s| &mut **s)
    }

    /// Look up an option of `kind` by exact name or alias.
    pub fn get(&self, kind: Kind, name: &str) -> Option<(Id, &dyn Slot)> {
        let ids: Box<dyn Iterator<Item = Id> + '_> = match kind {
            Kind::Positional => Box::new(self.positional_order.iter().copied()),
            Kind::MultiPositional => Box::new(self.multi_positionals.keys().copied()),
            _ => Box::new(
                self.named_order.iter().filter(move |(k, _)| *k == kind).map(|&(_, id)| id),
            ),
        };
        ids.filter_map(|id| Some((id, self.slot(kind, id)?))).find(|(_, s)| s.info().matches(name))
    }

    pub fn contains(&self, kind: Kind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// Look up a flag-like option of any kind by exact name or alias.
    pub fn find_named(&self, name: &str) -> Option<(Kind, Id)> {
        self.named_order
            .iter()
            .copied()
            .find(|&(kind, id)| self.slot(kind, id).is_some_and(|s| s.info().matches(name)))
    }

    pub fn get_positional(&self, index: usize) -> Option<(Id, &dyn Slot)> {
        let id = *self.positional_order.get(index)?;
        Some((id, self.slot(Kind::Positional, id)?))
    }

    pub fn get_multi_positional(&self) -> Option<(Id, &dyn Slot)> {
        self.multi_positionals.iter().next().map(|(&id, s)| (id, &**s))
    }

    pub fn named_order(&self) -> &[(Kind, Id)] {
        &self.named_order
    }

    pub fn positional_order(&self) -> &[Id] {
        &self.positional_order
    }

    pub fn is_set(&self, kind: Kind, id: Id) -> bool {
        self.slot(kind, id).is_some_and(|s| s.is_set())
    }

    /// Resolve a typed option.
    ///
    /// # Panics
    ///
    /// If `id` is not an `O` of this registry, which means a handle was
    /// resolved against the wrong command.
    pub fn resolve<O: OptionKind>(&self, id: Id) -> O::Output<'_> {
        let option = self.slot(O::KIND, id).and_then(|s| s.as_any().downcast_ref::<O>());
        let Some(option) = option else {
            panic!(
                "option {id:?} of kind {:?} is not registered in command `{}`",
                O::KIND,
                self.command,
            );
        };
        option.resolve()
    }

    /// Forget every bound value.
    pub fn reset(&mut self) {
        for map in [
            &mut self.flags,
            &mut self.multi_flags,
            &mut self.positionals,
            &mut self.multi_positionals,
            &mut self.choices,
            &mut self.multi_choices,
        ] {
            map.values_mut().for_each(|s| s.reset());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{Choice, Flag, MultiChoice, MultiFlag, MultiPositional, Positional};

    fn registry() -> (Registry, IdAllocator) {
        (Registry::new("me"), IdAllocator::default())
    }

    #[test]
    fn names_are_unique_across_kinds() {
        let (mut reg, mut ids) = registry();
        reg.add(&mut ids, Flag::<u8>::new("--num").with_alias("-n")).unwrap();

        let dup =
            |name: &str| ConfigError::DuplicateName { command: "me".into(), name: name.into() };
        assert_eq!(reg.add(&mut ids, MultiFlag::<u8>::new("-n")).unwrap_err(), dup("-n"));
        let mode = Choice::new("--mode").with_choice("a", 1).with_alias("--num");
        assert_eq!(reg.add(&mut ids, mode).unwrap_err(), dup("--num"));
        let repeated = MultiChoice::new("-x").with_alias("-x").with_choice("a", 1);
        assert_eq!(reg.add(&mut ids, repeated).unwrap_err(), dup("-x"));
        reg.add(&mut ids, MultiFlag::<u8>::new("--other")).unwrap();
        assert_eq!(reg.named_order().len(), 2);
    }

    #[test]
    fn positional_names_are_unique() {
        let (mut reg, mut ids) = registry();
        reg.add(&mut ids, Positional::<String>::new("A")).unwrap();
        let dup = ConfigError::DuplicateName { command: "me".into(), name: "A".into() };
        assert_eq!(reg.add(&mut ids, Positional::<String>::new("A")).unwrap_err(), dup);
        assert_eq!(reg.add(&mut ids, MultiPositional::<String>::new("A")).unwrap_err(), dup);
        reg.add(&mut ids, MultiPositional::<String>::new("REST")).unwrap();
        let dup = ConfigError::DuplicateName { command: "me".into(), name: "REST".into() };
        assert_eq!(reg.add(&mut ids, Positional::<String>::new("REST")).unwrap_err(), dup);
        // Positional names live apart from flag names.
        reg.add(&mut ids, Flag::<u8>::new("-A")).unwrap();
        assert_eq!(reg.positional_order().len(), 1);
    }

    #[test]
    fn lookups() {
        let (mut reg, mut ids) = registry();
        let num = reg.add(&mut ids, Flag::<u8>::new("--num").with_alias("-n")).unwrap();
        let file = reg.add(&mut ids, Positional::<String>::new("FILE")).unwrap();
        let rest = reg.add(&mut ids, MultiPositional::<String>::new("REST")).unwrap();

        assert!(reg.contains(Kind::Flag, "-n"));
        assert!(!reg.contains(Kind::MultiFlag, "-n"));
        assert_eq!(reg.get(Kind::Flag, "--num").map(|(id, _)| id), Some(num));
        assert_eq!(reg.find_named("-n"), Some((Kind::Flag, num)));
        assert_eq!(reg.find_named("FILE"), None);
        assert_eq!(reg.get_positional(0).map(|(id, _)| id), Some(file));
        assert!(reg.get_positional(1).is_none());
        assert_eq!(reg.get_multi_positional().map(|(id, _)| id), Some(rest));
        assert_eq!(reg.get(Kind::MultiPositional, "REST").map(|(id, _)| id), Some(rest));

        assert_eq!(
            reg.add(&mut ids, MultiPositional::<String>::new("MORE")).unwrap_err(),
            ConfigError::MultiplePositionalSinks { command: "me".into(), existing: "REST".into() }
        );
    }

    #[test]
    fn ids_are_monotonic() {
        let mut ids = IdAllocator::default();
        let a = ids.next();
        let b = ids.next();
        assert!(a < b);
    }

    #[test]
    #[should_panic = "is not registered"]
    fn resolving_with_wrong_type_panics() {
        let (mut reg, mut ids) = registry();
        let id = reg.add(&mut ids, Flag::<u8>::new("-n")).unwrap();
        let _ = reg.resolve::<Flag<u16>>(id);
    }
}
