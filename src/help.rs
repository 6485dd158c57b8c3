use crate::option::Kind;
use crate::refl::{CommandInfo, OptionInfo};

#[inline(never)]
fn push_str(out: &mut String, s: &str) {
    out.push_str(s);
}

/// The value placeholder of `arg`: its input hint, else its name upper-cased without dashes.
fn value_name(arg: &OptionInfo<'_>) -> String {
    match arg.input_hint() {
        Some(hint) => hint.into(),
        None => arg.name().trim_start_matches('-').replace('-', "_").to_uppercase(),
    }
}

/// `-n, --num <NUM>`, `--verbose [<VERBOSE>]` or `--feature <FEATURE>...`.
fn named_desc(arg: &OptionInfo<'_>) -> String {
    let mut desc = std::iter::once(arg.name())
        .chain(arg.aliases().iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(", ");
    let value = value_name(arg);
    let value = if arg.has_implicit() { format!(" [<{value}>]") } else { format!(" <{value}>") };
    desc.push_str(&value);
    if arg.kind().is_multi() {
        desc.push_str("...");
    }
    desc
}

/// `<FILE>`, `[FILE]` when defaulted, or `[FILE]...`.
fn positional_desc(arg: &OptionInfo<'_>) -> String {
    let name = value_name(arg);
    match arg.kind() {
        Kind::MultiPositional => format!("[{name}]..."),
        _ if arg.has_default() => format!("[{name}]"),
        _ => format!("<{name}>"),
    }
}

#[cold]
pub(crate) fn render_help_into(out: &mut String, info: &CommandInfo<'_>) {
    macro_rules! w {
        ($($e:expr),*) => {{
            $(push_str(out, $e);)*
        }};
    }

    // About this (sub)command.
    if let Some(about) = info.description() {
        w!(about, "\n\n");
    }

    // Usage of current subcommand path, program name included.

    w!("Usage:");
    for cmd in info.path() {
        w!(" ", cmd);
    }
    let has_named = info.named_options().next().is_some();
    if has_named {
        w!(" [OPTIONS]");
    }
    let has_unnamed = info.positionals().next().is_some();
    for arg in info.positionals() {
        w!(" ", &positional_desc(&arg));
    }
    let has_subcmd = info.subcommands().next().is_some();
    if has_subcmd {
        w!(" [COMMAND]");
    }
    w!("\n");

    // List of commands.

    if has_subcmd {
        w!("\nCommands:\n");
        let pad = "                        ";
        let max_len = info.subcommands().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);

        // Only the first line of each description.
        for (cmd, about) in info.subcommands() {
            w!("    ", cmd);
            if let Some(about) = about {
                let short = about.split_terminator('\n').next().unwrap_or(about);
                let pad_len = max_len.saturating_sub(cmd.len()) + 2;
                w!(&pad[..pad.len().min(pad_len)], short);
            }
            w!("\n");
        }
    }

    // List of positional arguments.

    if has_unnamed {
        w!("\nArguments:\n");
        for arg in info.positionals() {
            w!("  ", &positional_desc(&arg), "\n");
            if let Some(help) = arg.description() {
                for s in help.split_terminator('\n') {
                    w!("          ", s, "\n");
                }
            }
            w!("\n");
        }
    }

    // List of named options.

    if has_named {
        // Argument entries already end with a blank line.
        w!(if has_unnamed { "Options:\n" } else { "\nOptions:\n" });
        for arg in info.named_options() {
            w!("  ", &named_desc(&arg), "\n");
            if let Some(help) = arg.description() {
                for s in help.split_terminator('\n') {
                    w!("          ", s, "\n");
                }
            }
            let choices = arg.choices().collect::<Vec<_>>();
            if !choices.is_empty() {
                w!("          [possible values: ", &choices.join(", "), "]\n");
            }
            w!("\n");
        }
    }
}
