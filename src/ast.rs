//! Assigning tokens to options.
//!
//! A single forward pass without backtracking. Whether a token is a flag, a
//! value of the preceding flag, or a positional depends on the registered
//! names, so this step needs the [`Registry`] but never writes to it.
use crate::option::{Kind, RawValue};
use crate::registry::{Id, Registry};
use crate::token::{Token, TokenKind};
use crate::util::looks_like_flag;

/// All raw values given to one option, in command line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    /// Primary flag name, or the positional name.
    pub name: String,
    pub values: Vec<RawValue>,
}

#[derive(Debug, Default)]
pub(crate) struct Ast {
    pub flags: Vec<Node>,
    pub multi_flags: Vec<Node>,
    pub positionals: Vec<Node>,
    pub multi_positional: Vec<Node>,
    pub choices: Vec<Node>,
    pub multi_choices: Vec<Node>,
    /// Structural errors, in the order they were found.
    pub errors: Vec<String>,
    /// Index into the subcommand list, and the token position following its name.
    pub subcommand: Option<(usize, usize)>,
}

impl Ast {
    fn nodes_mut(&mut self, kind: Kind) -> &mut Vec<Node> {
        match kind {
            Kind::Flag => &mut self.flags,
            Kind::MultiFlag => &mut self.multi_flags,
            Kind::Positional => &mut self.positionals,
            Kind::MultiPositional => &mut self.multi_positional,
            Kind::Choice => &mut self.choices,
            Kind::MultiChoice => &mut self.multi_choices,
        }
    }

    /// Record `values` for `name`, merging with earlier occurrences of the same option.
    fn push(&mut self, kind: Kind, name: &str, values: impl IntoIterator<Item = RawValue>) {
        let nodes = self.nodes_mut(kind);
        match nodes.iter_mut().find(|n| n.name == name) {
            Some(node) => node.values.extend(values),
            None => nodes.push(Node { name: name.into(), values: values.into_iter().collect() }),
        }
    }

    /// Nodes grouped by kind, in analysis order.
    pub fn categories(&self) -> [(Kind, &[Node]); 6] {
        [
            (Kind::Flag, self.flags.as_slice()),
            (Kind::MultiFlag, self.multi_flags.as_slice()),
            (Kind::Positional, self.positionals.as_slice()),
            (Kind::MultiPositional, self.multi_positional.as_slice()),
            (Kind::Choice, self.choices.as_slice()),
            (Kind::MultiChoice, self.multi_choices.as_slice()),
        ]
    }
}

struct Builder<'a> {
    tokens: &'a [Token],
    registry: &'a Registry,
    subcommands: &'a [&'a str],
    pos: usize,
    /// Number of positional values seen so far.
    positional_count: usize,
    ast: Ast,
}

/// Build the AST of one command from `tokens`.
///
/// Stops at the first positional-looking token naming one of `subcommands`
/// before any `--`, leaving the rest to that subcommand.
pub(crate) fn build(tokens: &[Token], registry: &Registry, subcommands: &[&str]) -> Ast {
    let mut b = Builder {
        tokens,
        registry,
        subcommands,
        pos: 0,
        positional_count: 0,
        ast: Ast::default(),
    };
    b.run();
    b.finish()
}

impl<'a> Builder<'a> {
    fn run(&mut self) {
        let tokens = self.tokens;
        while let Some(tok) = tokens.get(self.pos) {
            self.pos += 1;

            if tok.kind == TokenKind::DoubleDash {
                tracing::trace!(index = tok.index, "separator");
                while let Some(tok) = tokens.get(self.pos) {
                    self.pos += 1;
                    self.positional(tok);
                }
                return;
            }

            let name = tok.text().to_str();
            if let Some((kind, id)) = name.and_then(|name| self.registry.find_named(name)) {
                self.named(tok, kind, id);
            } else if looks_like_flag(tok.text()) {
                tracing::trace!(index = tok.index, token = %tok.display(), "unknown flag");
                self.ast.errors.push(format!("unknown flag '{}'", tok.display()));
            } else if let Some(child) = self.subcommand_of(tok) {
                let subcommand = self.subcommands[child];
                tracing::trace!(index = tok.index, subcommand, "subcommand");
                self.ast.subcommand = Some((child, self.pos));
                return;
            } else {
                self.positional(tok);
            }
        }
    }

    fn subcommand_of(&self, tok: &Token) -> Option<usize> {
        let name = tok.text().to_str()?;
        self.subcommands.iter().position(|&s| s == name)
    }

    /// Can the next token be taken as a value of the preceding flag?
    fn peek_value(&self) -> Option<&'a Token> {
        let tokens: &'a [Token] = self.tokens;
        let tok = tokens.get(self.pos)?;
        let is_value =
            tok.is_string() && !looks_like_flag(tok.text()) && self.subcommand_of(tok).is_none();
        is_value.then_some(tok)
    }

    fn named(&mut self, flag: &Token, kind: Kind, id: Id) {
        let registry = self.registry;
        let Some(slot) = registry.slot(kind, id) else { return };
        let info = slot.info();
        let name = info.name();

        let mut values = Vec::new();
        while let Some(tok) = self.peek_value() {
            values.push(RawValue { text: Some(tok.text.clone()), index: tok.index });
            self.pos += 1;
            if !kind.is_multi() {
                break;
            }
        }
        tracing::trace!(index = flag.index, name, ?kind, values = values.len(), "flag");

        if values.is_empty() {
            if !info.has_implicit() {
                let msg = format!("'{name}' has no implicit value and no value was given");
                self.ast.errors.push(msg);
                return;
            }
            values.push(RawValue { text: None, index: flag.index });
        }
        self.ast.push(kind, name, values);
    }

    fn positional(&mut self, tok: &Token) {
        let registry = self.registry;
        let value = RawValue { text: Some(tok.text.clone()), index: tok.index };
        let nth = self.positional_count;
        self.positional_count += 1;
        if let Some((_, slot)) = registry.get_positional(nth) {
            tracing::trace!(index = tok.index, name = slot.info().name(), "positional");
            self.ast.push(Kind::Positional, slot.info().name(), [value]);
        } else if let Some((_, slot)) = registry.get_multi_positional() {
            tracing::trace!(index = tok.index, name = slot.info().name(), "trailing positional");
            self.ast.push(Kind::MultiPositional, slot.info().name(), [value]);
        } else {
            tracing::trace!(index = tok.index, "excess positional");
        }
    }

    fn finish(mut self) -> Ast {
        let max = self.registry.positional_order().len();
        if self.positional_count > max && self.registry.get_multi_positional().is_none() {
            self.ast.errors.push(format!(
                "too many positional arguments: expected at most {max}, got {}",
                self.positional_count
            ));
        }
        tracing::debug!(
            consumed = self.pos,
            total = self.tokens.len(),
            errors = self.ast.errors.len(),
            subcommand = ?self.ast.subcommand,
            "built AST"
        );
        self.ast
    }
}
