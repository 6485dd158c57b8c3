//! Typed handles and the read-only view they resolve against.
use std::fmt;
use std::marker::PhantomData;

use ref_cast::{RefCastCustom, ref_cast_custom};

use crate::option::{Kind, OptionKind};
use crate::registry::{Id, Registry};

/// Identifies an option of kind `O` registered on the command tagged `S`.
///
/// Returned by the `CommandMut::add_*` methods. It is only usable with
/// [`Results<S>`] of the same command, and resolves to `O`'s value type.
pub struct Handle<S, O> {
    pub(crate) id: Id,
    _marker: PhantomData<fn() -> (S, O)>,
}

impl<S, O> Handle<S, O> {
    pub(crate) fn new(id: Id) -> Self {
        Self { id, _marker: PhantomData }
    }
}

impl<S, O> Clone for Handle<S, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, O> Copy for Handle<S, O> {}

impl<S, O> fmt::Debug for Handle<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

/// A [`Handle`] with its option type erased, for presence queries and conditions.
pub struct AnyHandle<S> {
    pub(crate) kind: Kind,
    pub(crate) id: Id,
    _scope: PhantomData<fn() -> S>,
}

impl<S> Clone for AnyHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for AnyHandle<S> {}

impl<S> fmt::Debug for AnyHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyHandle").field("kind", &self.kind).field("id", &self.id).finish()
    }
}

impl<S, O: OptionKind> From<Handle<S, O>> for AnyHandle<S> {
    fn from(h: Handle<S, O>) -> Self {
        Self { kind: O::KIND, id: h.id, _scope: PhantomData }
    }
}

/// Parsed values of the command tagged `S`.
///
/// Obtained from [`Cli::try_get_results`](crate::Cli::try_get_results) after
/// that command was parsed successfully.
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct Results<S> {
    #[trivial]
    _scope: PhantomData<fn() -> S>,
    registry: Registry,
}

impl<S> Results<S> {
    #[ref_cast_custom]
    pub(crate) fn new(registry: &Registry) -> &Self;

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Was the option given on the command line? Defaults do not count.
    #[must_use]
    pub fn is_specified(&self, handle: impl Into<AnyHandle<S>>) -> bool {
        let h = handle.into();
        self.registry.is_set(h.kind, h.id)
    }

    /// The parsed value, else the declared default, else nothing.
    ///
    /// Single-valued kinds resolve to `Option<&T>`, multi-valued kinds to `&[T]`.
    ///
    /// # Panics
    ///
    /// If `handle` was issued by a different [`Cli`](crate::Cli) whose command
    /// happens to share the scope tag `S`.
    #[must_use]
    pub fn get<O: OptionKind>(&self, handle: Handle<S, O>) -> O::Output<'_> {
        self.registry.resolve::<O>(handle.id)
    }
}

impl<S> fmt::Debug for Results<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Results").field(&self.registry).finish()
    }
}
