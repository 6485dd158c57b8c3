//! Binding AST nodes to their options.
use crate::ast::Ast;
use crate::error::ConfigError;
use crate::registry::Registry;

/// Convert, validate and store every node of `ast`.
///
/// User-input errors are collected in category order (flags, multi-flags,
/// positionals, multi-positional, choices, multi-choices) rather than argv
/// order. Only a misdeclared option aborts.
pub(crate) fn analyze(ast: &Ast, registry: &mut Registry) -> Result<Vec<String>, ConfigError> {
    let mut errors = Vec::new();
    for (kind, nodes) in ast.categories() {
        for node in nodes {
            let id = registry.get(kind, &node.name).map(|(id, _)| id);
            let Some(slot) = id.and_then(|id| registry.slot_mut(kind, id)) else {
                let what = if kind.is_named() { "flag" } else { "argument" };
                errors.push(format!("unknown {what} '{}'", node.name));
                continue;
            };
            let errs = slot.bind(&node.values)?;
            tracing::trace!(
                name = %node.name,
                ?kind,
                values = node.values.len(),
                errors = errs.len(),
                "bound"
            );
            errors.extend(errs);
        }
    }
    tracing::debug!(errors = errors.len(), "analyzed");
    Ok(errors)
}
