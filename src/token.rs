//! Splitting raw arguments into a token stream.
use std::ffi::{OsStr, OsString};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Any argument other than the separator.
    String,
    /// Exactly `--`.
    DoubleDash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: OsString,
    /// Position in the original argv, where 0 is the program name.
    pub index: usize,
}

impl Token {
    pub fn text(&self) -> &OsStr {
        &self.text
    }

    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::String
    }

    /// Lossy text for error messages.
    pub fn display(&self) -> String {
        self.text.to_string_lossy().into_owned()
    }
}

/// Tokenize arguments following the program name.
///
/// Classification into flags and values is left to the AST builder since it
/// depends on the registered options.
pub(crate) fn tokenize(args: impl IntoIterator<Item = OsString>) -> Vec<Token> {
    args.into_iter()
        .enumerate()
        .map(|(i, text)| {
            let kind = if text == "--" { TokenKind::DoubleDash } else { TokenKind::String };
            Token { kind, text, index: i + 1 }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_and_indices() {
        let toks = tokenize(["-a", "--", "x", "---"].map(OsString::from));
        let kinds = toks.iter().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [TokenKind::String, TokenKind::DoubleDash, TokenKind::String, TokenKind::String]
        );
        assert_eq!(toks.iter().map(|t| t.index).collect::<Vec<_>>(), [1, 2, 3, 4]);
        assert_eq!(toks[3].display(), "---");
    }

    #[test]
    fn empty() {
        assert!(tokenize(Vec::<OsString>::new()).is_empty());
    }
}
