use std::ffi::OsString;
use std::path::PathBuf;

use argot::{
    Choice, Cli, ConfigError, Error, Flag, FromArg, MultiChoice, MultiFlag, MultiPositional,
    Positional,
};
use expect_test::{Expect, expect};

#[track_caller]
fn assert_errors(cli: &mut Cli, args: &[&str], expect: Expect) {
    let err = cli.run(args).unwrap_err();
    expect.assert_eq(&err.to_string());
}

#[test]
fn duplicate_names_fail_before_parsing() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    root.add_flag(Flag::<u8>::new("--jobs").with_alias("-j")).unwrap();
    for name in ["--jobs", "-j"] {
        let err = ConfigError::DuplicateName { command: "me".into(), name: name.into() };
        assert_eq!(root.add_flag(Flag::<u8>::new(name)).unwrap_err(), err);
        assert_eq!(
            root.add_multi_flag(MultiFlag::<u8>::new("-x").with_alias(name)).unwrap_err(),
            err
        );
        assert_eq!(
            root.add_choice(Choice::new("-y").with_alias(name).with_choice("a", ())).unwrap_err(),
            err
        );
        assert_eq!(
            root.add_multi_choice(MultiChoice::new(name).with_choice("a", ())).unwrap_err(),
            err
        );
    }
}

#[test]
fn positionals_bind_by_position() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    let src = root.add_positional(Positional::<String>::new("SRC")).unwrap();
    let dup = ConfigError::DuplicateName { command: "me".into(), name: "SRC".into() };
    assert_eq!(root.add_positional(Positional::<String>::new("SRC")).unwrap_err(), dup);
    assert_eq!(root.add_multi_positional(MultiPositional::<String>::new("SRC")).unwrap_err(), dup);
    let dst = root.add_positional(Positional::<String>::new("DST")).unwrap();

    cli.run(["me", "x", "y"]).unwrap();
    let results = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(results.get(src).map(String::as_str), Some("x"));
    assert_eq!(results.get(dst).map(String::as_str), Some("y"));
}

#[test]
fn malformed_declarations() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    assert_eq!(
        root.add_flag(Flag::<u8>::new("jobs")).unwrap_err(),
        ConfigError::InvalidFlagName("jobs".into())
    );
    assert_eq!(
        root.add_flag(Flag::<u8>::new("-1")).unwrap_err(),
        ConfigError::InvalidFlagName("-1".into())
    );
    assert_eq!(root.add_positional(Positional::<u8>::new("")).unwrap_err(), ConfigError::EmptyName);
    assert_eq!(
        root.add_choice(Choice::<u8>::new("--mode")).unwrap_err(),
        ConfigError::EmptyChoices("--mode".into())
    );
    assert_eq!(
        root.add_choice(Choice::new("--mode").with_choice("a", 1).with_choice("a", 2)).unwrap_err(),
        ConfigError::DuplicateChoice { option: "--mode".into(), choice: "a".into() }
    );
    root.add_multi_positional(MultiPositional::<String>::new("REST")).unwrap();
    assert_eq!(
        root.add_multi_positional(MultiPositional::<String>::new("MORE")).unwrap_err(),
        ConfigError::MultiplePositionalSinks { command: "me".into(), existing: "REST".into() }
    );
}

macro_rules! check_int_bounds {
    ($($ty:ident),*) => {$(
        let mut cli = Cli::new("me");
        let n = cli.command(cli.root()).add_flag(Flag::<$ty>::new("-n")).unwrap();
        for v in [$ty::MIN, $ty::MAX] {
            cli.run(["me".to_owned(), "-n".to_owned(), v.to_string()]).unwrap();
            assert_eq!(cli.try_get_results(cli.root()).unwrap().get(n), Some(&v));
        }

        let below = (i128::from($ty::MIN) - 1).unsigned_abs();
        let above = u128::try_from($ty::MAX).unwrap() + 1;
        for bad in [
            format!("-{below}"),
            format!("-{below:#x}"),
            format!("-{below:#b}"),
            format!("{above}"),
            format!("{above:#x}"),
            format!("{above:#b}"),
        ] {
            let err = cli.run(["me", "-n", bad.as_str()]).unwrap_err();
            let msgs = err.as_parse().unwrap().messages();
            assert_eq!(
                msgs,
                [format!("invalid value '{bad}' for '-n': out of range for {}", stringify!($ty))],
            );
        }
    )*};
}

#[test]
fn integer_bounds() {
    check_int_bounds!(u8, u16, u32, u64, i8, i16, i32, i64);
}

#[test]
fn booleans() {
    let mut cli = Cli::new("me");
    let b = cli.command(cli.root()).add_flag(Flag::<bool>::new("-b")).unwrap();
    for lit in ["true", "YES", "y", "On", "1"] {
        cli.run(["me", "-b", lit]).unwrap();
        assert_eq!(cli.try_get_results(cli.root()).unwrap().get(b), Some(&true), "{lit}");
    }
    for lit in ["false", "No", "N", "off", "0"] {
        cli.run(["me", "-b", lit]).unwrap();
        assert_eq!(cli.try_get_results(cli.root()).unwrap().get(b), Some(&false), "{lit}");
    }
    let err = cli.run(["me", "-b", "maybe"]).unwrap_err();
    assert_eq!(
        err.as_parse().unwrap().messages(),
        ["invalid value 'maybe' for '-b': \
          expected one of true, yes, y, 1, on, false, no, n, 0, off"]
    );
}

#[test]
fn defaults_and_specified() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    let n = root.add_flag(Flag::<u32>::new("-n").with_default(3)).unwrap();
    let xs = root.add_multi_flag(MultiFlag::<u32>::new("-x").with_default([1, 2])).unwrap();
    let p = root.add_positional(Positional::<String>::new("P")).unwrap();

    cli.run(["me"]).unwrap();
    let results = cli.try_get_results(cli.root()).unwrap();
    for _ in 0..2 {
        assert_eq!(results.get(n), Some(&3));
        assert_eq!(results.get(xs), [1, 2]);
        assert_eq!(results.get(p), None);
    }
    assert!(!results.is_specified(n));
    assert!(!results.is_specified(xs));

    cli.run(["me", "-x", "5", "-n", "4", "pos"]).unwrap();
    let results = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(results.get(n), Some(&4));
    assert_eq!(results.get(xs), [5]);
    assert_eq!(results.get(p).map(String::as_str), Some("pos"));
    assert!(results.is_specified(n) && results.is_specified(xs) && results.is_specified(p));

    // Values of the previous run are gone.
    cli.run(["me"]).unwrap();
    assert_eq!(cli.try_get_results(cli.root()).unwrap().get(n), Some(&3));
}

#[test]
fn multi_values_accumulate_across_occurrences() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    let x = root.add_multi_flag(MultiFlag::<i32>::new("--x")).unwrap();
    let f = root
        .add_multi_choice(MultiChoice::new("--feat").with_choice("a", 'a').with_choice("b", 'b'))
        .unwrap();
    cli.run(["me", "--x", "1", "2", "--feat", "b", "--x", "3", "--feat", "a", "b"]).unwrap();
    let results = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(results.get(x), [1, 2, 3]);
    assert_eq!(results.get(f), ['b', 'a', 'b']);
}

#[test]
fn adjacent_numeric_multi_flags() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    let a = root.add_multi_flag(MultiFlag::<i32>::new("-a")).unwrap();
    let b = root.add_multi_flag(MultiFlag::<i32>::new("-b")).unwrap();
    cli.run(["me", "-a", "-1", "-2", "-b", "-3", "0b11", "-a", "4"]).unwrap();
    let results = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(results.get(a), [-1, -2, 4]);
    assert_eq!(results.get(b), [-3, 3]);
}

#[test]
fn negative_numbers_and_implicit_values() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    let n = root.add_flag(Flag::<i8>::new("-n")).unwrap();
    let level = root.add_flag(Flag::<u8>::new("--level").with_implicit(1)).unwrap();
    let x = root.add_flag(Flag::<bool>::new("-x").with_implicit(true)).unwrap();

    cli.run(["me", "-n", "-5", "--level", "-x"]).unwrap();
    let results = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(results.get(n), Some(&-5));
    assert_eq!(results.get(level), Some(&1));
    assert_eq!(results.get(x), Some(&true));

    assert_errors(
        &mut cli,
        &["me", "-n", "-x"],
        expect!["error: '-n' has no implicit value and no value was given"],
    );
    assert_errors(&mut cli, &["me", "-z", "-n"], expect![[r#"
        error: unknown flag '-z'
        error: '-n' has no implicit value and no value was given"#]]);
}

#[test]
fn too_many_positionals() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    root.add_positional(Positional::<String>::new("A")).unwrap();
    root.add_positional(Positional::<String>::new("B")).unwrap();
    assert_errors(
        &mut cli,
        &["me", "1", "2", "3", "4", "5"],
        expect!["error: too many positional arguments: expected at most 2, got 5"],
    );
}

#[test]
fn separator() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    let v = root.add_flag(Flag::<bool>::new("-v").with_implicit(true)).unwrap();
    let first = root.add_positional(Positional::<String>::new("FIRST")).unwrap();
    let rest = root.add_multi_positional(MultiPositional::<String>::new("REST")).unwrap();
    cli.run(["me", "-v", "--", "-v", "--", "x"]).unwrap();
    let results = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(results.get(v), Some(&true));
    assert_eq!(results.get(first).map(String::as_str), Some("-v"));
    assert_eq!(results.get(rest), ["--", "x"]);
}

#[test]
fn every_rejected_value_is_reported_in_category_order() {
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    root.add_multi_choice(MultiChoice::new("--feat").with_choice("a", 1)).unwrap();
    root.add_multi_positional(
        MultiPositional::<u8>::new("N").with_group_validator(|ns| ns.is_sorted(), "must be sorted"),
    )
    .unwrap();
    root.add_multi_flag(
        MultiFlag::<u32>::new("-x").with_value_validator(|&v| v < 10, "must be less than 10"),
    )
    .unwrap();
    root.add_flag(Flag::<f64>::new("-f")).unwrap();
    root.add_flag(Flag::<char>::new("-c")).unwrap();

    assert_errors(
        &mut cli,
        &[
            "me", "3", "1", "--feat", "b", "a", "c", "-x", "1", "20", "30", "-f", "1.5.0", "-c",
            "ab", "-c", "d",
        ],
        expect![[r#"
            error: invalid value '1.5.0' for '-f': not a valid f64
            error: invalid value 'ab' for '-c': not a valid char
            error: '-c' cannot be given more than once
            error: invalid value '20' for '-x': must be less than 10
            error: invalid value '30' for '-x': must be less than 10
            error: invalid values for 'N': must be sorted
            error: invalid value 'b' for '--feat': expected one of a
            error: invalid value 'c' for '--feat': expected one of a"#]],
    );
}

#[test]
fn invalid_default_is_fatal() {
    let mut cli = Cli::new("me");
    let xs = MultiFlag::<u8>::new("-x")
        .with_implicit([0])
        .with_value_validator(|&v| v > 0, "must be positive");
    cli.command(cli.root()).add_multi_flag(xs).unwrap();
    let err = cli.run(["me", "-x", "1"]).unwrap_err();
    assert_eq!(
        err,
        Error::Config(ConfigError::InvalidDefault {
            option: "-x".into(),
            kind: "implicit",
            message: "must be positive".into()
        })
    );
}

#[test]
fn custom_conversion() {
    #[derive(Debug, PartialEq)]
    struct Size(u64);

    let mut cli = Cli::new("me");
    let size = cli
        .command(cli.root())
        .add_flag(Flag::new_with_conversion_fn("--size", |s: &str| match s.strip_suffix('k') {
            Some(n) => n.parse::<u64>().map(|n| Size(n * 1024)).map_err(|e| e.to_string()),
            None => Err("expected a size like `4k`".to_owned()),
        }))
        .unwrap();
    cli.run(["me", "--size", "4k"]).unwrap();
    assert_eq!(cli.try_get_results(cli.root()).unwrap().get(size), Some(&Size(4096)));
    assert_errors(
        &mut cli,
        &["me", "--size", "4"],
        expect!["error: invalid value '4' for '--size': expected a size like `4k`"],
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_arguments() {
    use std::os::unix::ffi::OsStringExt;

    let raw = OsString::from_vec(b"\xFFfile".to_vec());
    let mut cli = Cli::new("me");
    let mut root = cli.command(cli.root());
    let path = root.add_positional(Positional::<PathBuf>::new("PATH")).unwrap();
    let name = root.add_flag(Flag::<String>::new("--name")).unwrap();

    cli.run([OsString::from("me"), raw.clone()]).unwrap();
    let results = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(results.get(path), Some(&PathBuf::from(raw.clone())));

    let err = cli.run([OsString::from("me"), "--name".into(), raw]).unwrap_err();
    assert_eq!(
        err.as_parse().unwrap().messages(),
        ["invalid value '\u{FFFD}file' for '--name': invalid UTF-8"]
    );
}

#[test]
fn from_arg_is_usable_directly() {
    assert_eq!(u16::from_arg("0xff".as_ref()), Ok(255));
}
