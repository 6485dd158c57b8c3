//! Conversion of raw argument strings into typed values.
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Why a raw value could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("not a valid {0}")]
    Invalid(&'static str),
    #[error("out of range for {0}")]
    OutOfRange(&'static str),
    #[error("expected one of {0}")]
    Expected(&'static str),
    #[error("{0}")]
    Custom(String),
}

impl From<String> for ValueError {
    fn from(msg: String) -> Self {
        Self::Custom(msg)
    }
}

impl From<&str> for ValueError {
    fn from(msg: &str) -> Self {
        Self::Custom(msg.into())
    }
}

/// Value types with a built-in conversion from a raw argument.
///
/// Options of other types must be given a conversion function at declaration.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no built-in argument conversion",
    label = "unconvertible value type",
    note = "declare the option with `new_with_conversion_fn` to supply one"
)]
pub trait FromArg: Sized + 'static {
    /// The name used for this type in error messages.
    const TYPE_NAME: &'static str;

    fn from_arg(raw: &OsStr) -> Result<Self, ValueError>;
}

fn utf8(raw: &OsStr) -> Result<&str, ValueError> {
    raw.to_str().ok_or(ValueError::InvalidUtf8)
}

/// Split sign, radix and digits of an integer literal.
fn parse_int_parts(s: &str) -> Option<(bool, u32, &str)> {
    let (neg, s) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = if let Some(d) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (16, d)
    } else if let Some(d) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (2, d)
    } else {
        (10, s)
    };
    // `from_str_radix` would accept another sign here.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some((neg, radix, digits))
}

fn parse_int<T>(raw: &OsStr) -> Result<T, ValueError>
where
    T: FromArg + TryFrom<u128> + TryFrom<i128>,
{
    use std::num::IntErrorKind;

    let s = utf8(raw)?;
    let (neg, radix, digits) = parse_int_parts(s).ok_or(ValueError::Invalid(T::TYPE_NAME))?;
    let magnitude = u128::from_str_radix(digits, radix).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ValueError::OutOfRange(T::TYPE_NAME)
        }
        _ => ValueError::Invalid(T::TYPE_NAME),
    })?;
    let out_of_range = || ValueError::OutOfRange(T::TYPE_NAME);
    if neg {
        let v = 0i128.checked_sub_unsigned(magnitude).ok_or_else(out_of_range)?;
        T::try_from(v).map_err(|_| out_of_range())
    } else {
        T::try_from(magnitude).map_err(|_| out_of_range())
    }
}

macro_rules! impl_int {
    ($($ty:ident),*) => {
        $(
            impl FromArg for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                fn from_arg(raw: &OsStr) -> Result<Self, ValueError> {
                    parse_int(raw)
                }
            }
        )*
    };
}

impl_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! impl_float {
    ($($ty:ident),*) => {
        $(
            impl FromArg for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                fn from_arg(raw: &OsStr) -> Result<Self, ValueError> {
                    utf8(raw)?.parse().map_err(|_| ValueError::Invalid(Self::TYPE_NAME))
                }
            }
        )*
    };
}

impl_float!(f32, f64);

impl FromArg for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_arg(raw: &OsStr) -> Result<Self, ValueError> {
        const TRUE: [&str; 5] = ["true", "yes", "y", "1", "on"];
        const FALSE: [&str; 5] = ["false", "no", "n", "0", "off"];

        let s = utf8(raw)?;
        if TRUE.iter().any(|t| s.eq_ignore_ascii_case(t)) {
            Ok(true)
        } else if FALSE.iter().any(|f| s.eq_ignore_ascii_case(f)) {
            Ok(false)
        } else {
            Err(ValueError::Expected("true, yes, y, 1, on, false, no, n, 0, off"))
        }
    }
}

impl FromArg for char {
    const TYPE_NAME: &'static str = "char";

    fn from_arg(raw: &OsStr) -> Result<Self, ValueError> {
        let mut chars = utf8(raw)?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ValueError::Invalid(Self::TYPE_NAME)),
        }
    }
}

impl FromArg for String {
    const TYPE_NAME: &'static str = "string";

    fn from_arg(raw: &OsStr) -> Result<Self, ValueError> {
        utf8(raw).map(Into::into)
    }
}

impl FromArg for OsString {
    const TYPE_NAME: &'static str = "string";

    fn from_arg(raw: &OsStr) -> Result<Self, ValueError> {
        Ok(raw.to_owned())
    }
}

impl FromArg for PathBuf {
    const TYPE_NAME: &'static str = "path";

    fn from_arg(raw: &OsStr) -> Result<Self, ValueError> {
        Ok(raw.into())
    }
}
