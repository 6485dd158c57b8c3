//! Token shape heuristics shared by registration and the AST builder.
use std::ffi::OsStr;

use os_str_bytes::OsStrBytesExt;

/// Is `s` a numeric literal as far as flag classification is concerned?
///
/// Accepts an optional sign followed by either `0x`/`0X` and hex digits,
/// `0b`/`0B` and binary digits, or decimal digits with at most one `.`.
/// Exponents are not recognized.
pub(crate) fn looks_like_number(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let b = s.as_bytes();
    match b {
        [b'0', b'x' | b'X', rest @ ..] => {
            !rest.is_empty() && rest.iter().all(u8::is_ascii_hexdigit)
        }
        [b'0', b'b' | b'B', rest @ ..] => {
            !rest.is_empty() && rest.iter().all(|&c| c == b'0' || c == b'1')
        }
        _ => {
            let mut digits = 0usize;
            let mut dots = 0usize;
            for &c in b {
                match c {
                    b'0'..=b'9' => digits += 1,
                    b'.' => dots += 1,
                    _ => return false,
                }
            }
            digits != 0 && dots <= 1
        }
    }
}

/// A token looks like a flag iff it is non-empty, starts with `-` and is not a number.
///
/// Non-UTF-8 input is never a number.
pub(crate) fn looks_like_flag(arg: &OsStr) -> bool {
    arg.starts_with('-') && !arg.to_str().is_some_and(looks_like_number)
}

/// The shape every flag-like name and alias must have.
pub(crate) fn is_valid_flag_name(name: &str) -> bool {
    name.len() > 1
        && name != "--"
        && name.starts_with('-')
        && !looks_like_number(name)
        && !name.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        for s in ["0", "-5", "+5", "1.5", "-.5", "5.", "0x1F", "-0XfF", "0b101", "+0B0"] {
            assert!(looks_like_number(s), "{s}");
        }
        for s in ["", "-", "+", ".", "1.2.3", "0x", "0b2", "1e5", "-x", "0x1G", "--5"] {
            assert!(!looks_like_number(s), "{s}");
        }
    }

    #[test]
    fn flags() {
        assert!(looks_like_flag("-x".as_ref()));
        assert!(looks_like_flag("--long".as_ref()));
        assert!(looks_like_flag("-".as_ref()));
        assert!(looks_like_flag("--".as_ref()));
        assert!(!looks_like_flag("-5".as_ref()));
        assert!(!looks_like_flag("-0x10".as_ref()));
        assert!(!looks_like_flag("value".as_ref()));
        assert!(!looks_like_flag("".as_ref()));
    }

    #[test]
    fn flag_names() {
        assert!(is_valid_flag_name("-v"));
        assert!(is_valid_flag_name("--verbose"));
        assert!(!is_valid_flag_name("-"));
        assert!(!is_valid_flag_name("--"));
        assert!(!is_valid_flag_name("verbose"));
        assert!(!is_valid_flag_name("-1"));
        assert!(!is_valid_flag_name("--a b"));
    }
}
