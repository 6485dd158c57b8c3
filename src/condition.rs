//! Declarative requirements checked after a command's values are bound.
//!
//! ```
//! # use argot::{Cli, Flag, at_most, present};
//! let mut cli = Cli::new("me");
//! let mut root = cli.command(cli.root());
//! let json = root.add_flag(Flag::<bool>::new("--json").with_implicit(true))?;
//! let yaml = root.add_flag(Flag::<bool>::new("--yaml").with_implicit(true))?;
//! let out = root.add_flag(Flag::<String>::new("--out"))?;
//! root.require(at_most(1, [json.into(), yaml.into()]), "at most one output format");
//! root.when(present(yaml), "--yaml").require(present(out), "requires --out");
//!
//! let err = cli.run(["me", "--json", "--yaml"]).unwrap_err();
//! assert_eq!(err.to_string(), "error: at most one output format\nerror: --yaml: requires --out");
//! # Ok::<_, argot::Error>(())
//! ```
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::option::Kind;
use crate::registry::{Id, Registry};
use crate::results::{AnyHandle, Results};

/// How many of a set of options must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl Threshold {
    fn holds(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
            Self::AtMost(n) => count <= n,
        }
    }
}

#[derive(Clone)]
pub(crate) enum Expr {
    Present(Kind, Id),
    Absent(Kind, Id),
    Threshold(Threshold, Vec<(Kind, Id)>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Custom(Rc<dyn Fn(&Registry) -> bool>),
}

impl Expr {
    fn eval(&self, registry: &Registry) -> bool {
        match self {
            Self::Present(kind, id) => registry.is_set(*kind, *id),
            Self::Absent(kind, id) => !registry.is_set(*kind, *id),
            Self::Threshold(policy, handles) => {
                let count = handles.iter().filter(|&&(kind, id)| registry.is_set(kind, id)).count();
                policy.holds(count)
            }
            // Both sides are always evaluated.
            Self::And(a, b) => a.eval(registry) & b.eval(registry),
            Self::Or(a, b) => a.eval(registry) | b.eval(registry),
            Self::Not(a) => !a.eval(registry),
            Self::Custom(f) => f(registry),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(_, id) => f.debug_tuple("Present").field(id).finish(),
            Self::Absent(_, id) => f.debug_tuple("Absent").field(id).finish(),
            Self::Threshold(policy, handles) => {
                let ids = handles.iter().map(|(_, id)| id).collect::<Vec<_>>();
                f.debug_tuple("Threshold").field(policy).field(&ids).finish()
            }
            Self::And(a, b) => f.debug_tuple("And").field(a).field(b).finish(),
            Self::Or(a, b) => f.debug_tuple("Or").field(a).field(b).finish(),
            Self::Not(a) => f.debug_tuple("Not").field(a).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A boolean expression over the options of the command tagged `S`.
///
/// Evaluated on demand against the bound values, never cached.
pub struct Condition<S> {
    expr: Expr,
    _scope: PhantomData<fn() -> S>,
}

impl<S> Clone for Condition<S> {
    fn clone(&self) -> Self {
        Self::from_expr(self.expr.clone())
    }
}

impl<S> fmt::Debug for Condition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}

impl<S> Condition<S> {
    fn from_expr(expr: Expr) -> Self {
        Self { expr, _scope: PhantomData }
    }

    pub(crate) fn into_expr(self) -> Expr {
        self.expr
    }

    #[must_use]
    pub fn evaluate(&self, results: &Results<S>) -> bool {
        self.expr.eval(results.registry())
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        and(self, other)
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        or(self, other)
    }

    #[must_use]
    #[expect(clippy::should_implement_trait, reason = "no operator sugar for conditions")]
    pub fn not(self) -> Self {
        not(self)
    }
}

/// The option was given on the command line.
pub fn present<S>(handle: impl Into<AnyHandle<S>>) -> Condition<S> {
    let h = handle.into();
    Condition::from_expr(Expr::Present(h.kind, h.id))
}

/// The option was not given on the command line. Defaults do not count.
pub fn absent<S>(handle: impl Into<AnyHandle<S>>) -> Condition<S> {
    let h = handle.into();
    Condition::from_expr(Expr::Absent(h.kind, h.id))
}

fn threshold<S>(
    policy: Threshold,
    handles: impl IntoIterator<Item = AnyHandle<S>>,
) -> Condition<S> {
    let handles = handles.into_iter().map(|h| (h.kind, h.id)).collect();
    Condition::from_expr(Expr::Threshold(policy, handles))
}

/// Exactly `n` of `handles` were given.
pub fn exactly<S>(n: usize, handles: impl IntoIterator<Item = AnyHandle<S>>) -> Condition<S> {
    threshold(Threshold::Exactly(n), handles)
}

/// At least `n` of `handles` were given.
pub fn at_least<S>(n: usize, handles: impl IntoIterator<Item = AnyHandle<S>>) -> Condition<S> {
    threshold(Threshold::AtLeast(n), handles)
}

/// At most `n` of `handles` were given.
pub fn at_most<S>(n: usize, handles: impl IntoIterator<Item = AnyHandle<S>>) -> Condition<S> {
    threshold(Threshold::AtMost(n), handles)
}

pub fn and<S>(a: Condition<S>, b: Condition<S>) -> Condition<S> {
    Condition::from_expr(Expr::And(Box::new(a.expr), Box::new(b.expr)))
}

pub fn or<S>(a: Condition<S>, b: Condition<S>) -> Condition<S> {
    Condition::from_expr(Expr::Or(Box::new(a.expr), Box::new(b.expr)))
}

pub fn not<S>(a: Condition<S>) -> Condition<S> {
    Condition::from_expr(Expr::Not(Box::new(a.expr)))
}

/// An arbitrary predicate over the parsed values.
pub fn custom<S: 'static>(f: impl Fn(&Results<S>) -> bool + 'static) -> Condition<S> {
    let predicate = move |registry: &Registry| f(Results::new(registry));
    Condition::from_expr(Expr::Custom(Rc::new(predicate)))
}

#[derive(Debug)]
pub(crate) struct Requirement {
    condition: Expr,
    message: String,
}

#[derive(Debug)]
struct WhenGroup {
    precondition: Expr,
    label: String,
    requirements: Vec<Requirement>,
}

/// The requirements of one command.
#[derive(Debug, Default)]
pub(crate) struct Constraints {
    requirements: Vec<Requirement>,
    groups: Vec<WhenGroup>,
}

impl Constraints {
    pub fn require(&mut self, condition: Expr, message: String) {
        self.requirements.push(Requirement { condition, message });
    }

    /// Start a group whose requirements only apply when `precondition` holds.
    pub fn when(&mut self, precondition: Expr, label: String) -> &mut Vec<Requirement> {
        self.groups.push(WhenGroup { precondition, label, requirements: Vec::new() });
        let group = self.groups.len() - 1;
        &mut self.groups[group].requirements
    }

    /// Every failing requirement, top-level ones first, then groups in registration order.
    pub fn check(&self, registry: &Registry) -> Vec<String> {
        let mut errors = self
            .requirements
            .iter()
            .filter(|r| !r.condition.eval(registry))
            .map(|r| r.message.clone())
            .collect::<Vec<_>>();
        for group in &self.groups {
            if !group.precondition.eval(registry) {
                continue;
            }
            errors.extend(
                group
                    .requirements
                    .iter()
                    .filter(|r| !r.condition.eval(registry))
                    .map(|r| format!("{}: {}", group.label, r.message)),
            );
        }
        tracing::debug!(errors = errors.len(), "checked constraints");
        errors
    }
}

/// Requirements gated by a precondition, created by
/// [`CommandMut::when`](crate::CommandMut::when).
pub struct When<'a, S> {
    requirements: &'a mut Vec<Requirement>,
    _scope: PhantomData<fn() -> S>,
}

impl<'a, S> When<'a, S> {
    pub(crate) fn new(requirements: &'a mut Vec<Requirement>) -> Self {
        Self { requirements, _scope: PhantomData }
    }

    /// Fail with `"<label>: <message>"` if the precondition holds but `condition` does not.
    pub fn require(self, condition: Condition<S>, message: impl Into<String>) -> Self {
        self.requirements.push(Requirement { condition: condition.expr, message: message.into() });
        self
    }
}
