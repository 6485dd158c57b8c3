//! *Command line argument parser with typed result handles and declarative constraints.*
//!
//! Options are plain values configured with `with_*` methods and registered on
//! a command of a [`Cli`]. Registration returns a [`Handle`] which, after a
//! successful [`Cli::run`], resolves to the parsed value through the command's
//! [`Results`]. Handles carry the command's scope tag and the option's value
//! type, so they cannot be resolved against another command or to another type.
//!
//! ```
//! use argot::{Choice, Cli, Flag, MultiFlag, Positional, present};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Color { Auto, Never }
//!
//! let mut cli = Cli::new("me").with_description("My great app.");
//! let mut root = cli.command(cli.root());
//! let verbose =
//!     root.add_flag(Flag::<bool>::new("-v").with_alias("--verbose").with_implicit(true))?;
//! let color = root.add_choice(
//!     Choice::new("--color")
//!         .with_choice("auto", Color::Auto)
//!         .with_choice("never", Color::Never)
//!         .with_default(Color::Auto),
//! )?;
//! let offsets = root.add_multi_flag(MultiFlag::<i64>::new("--offset"))?;
//! let input = root.add_positional(Positional::<std::path::PathBuf>::new("INPUT"))?;
//! root.require(present(input), "an input file is required");
//!
//! cli.run(["me", "in.txt", "--offset", "-5", "0x10", "-v"])?;
//! let results = cli.try_get_results(cli.root()).unwrap();
//! assert_eq!(results.get(verbose), Some(&true));
//! assert_eq!(results.get(color), Some(&Color::Auto));
//! assert!(!results.is_specified(color));
//! assert_eq!(results.get(offsets), [-5, 16]);
//! assert_eq!(results.get(input).unwrap().to_str(), Some("in.txt"));
//! # Ok::<_, argot::Error>(())
//! ```
//!
//! User-input errors are never fail-fast: [`Cli::run`] reports every problem
//! of the failing command at once as a [`ParseError`]. Misuse of the
//! declaration API is a [`ConfigError`].
#![forbid(unsafe_code)]

mod analyze;
mod ast;
mod command;
mod condition;
mod error;
mod option;
mod refl;
mod registry;
mod results;
mod token;
mod util;
mod values;

#[cfg(feature = "help")]
mod help;

pub use crate::command::{Cli, CommandHandle, CommandMut, Root};
pub use crate::condition::{
    Condition, Threshold, When, absent, and, at_least, at_most, custom, exactly, not, or, present,
};
pub use crate::error::{ConfigError, Error, ParseError};
pub use crate::option::{
    Choice, Flag, Kind, MultiChoice, MultiFlag, MultiPositional, OptionKind, Positional,
};
pub use crate::refl::{CommandInfo, OptionInfo};
pub use crate::results::{AnyHandle, Handle, Results};
pub use crate::values::{FromArg, ValueError};

pub type Result<T, E = Error> = std::result::Result<T, E>;
