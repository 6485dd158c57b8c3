use argot::{Cli, CommandHandle, Flag, MultiPositional, Positional, Root, present};
use expect_test::expect;

enum Build {}
enum Test {}
enum Config {}

struct App {
    cli: Cli,
    build: CommandHandle<Build>,
    test: CommandHandle<Test>,
    config: CommandHandle<Config>,
}

fn app() -> App {
    let mut cli = Cli::new("me").with_description("My great app.");
    let build = cli.add_subcommand::<Build, _>(cli.root(), "build", "Build the project.").unwrap();
    let test = cli.add_subcommand::<Test, _>(cli.root(), "test", "Run some tests.").unwrap();
    let config = cli.add_subcommand::<Config, _>(build, "config", "Configure the build.").unwrap();
    App { cli, build, test, config }
}

#[test]
fn dispatch_along_the_path() {
    let App { mut cli, build, test, config } = app();
    let verbose =
        cli.command(cli.root()).add_flag(Flag::<bool>::new("-v").with_implicit(true)).unwrap();
    let release =
        cli.command(build).add_flag(Flag::<bool>::new("--release").with_implicit(true)).unwrap();
    let key = cli.command(config).add_positional(Positional::<String>::new("KEY")).unwrap();
    let filters =
        cli.command(test).add_multi_positional(MultiPositional::<String>::new("FILTER")).unwrap();

    cli.run(["me", "-v", "build", "--release", "config", "jobs"]).unwrap();
    let root = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(root.get(verbose), Some(&true));
    assert_eq!(cli.try_get_results(build).unwrap().get(release), Some(&true));
    assert_eq!(cli.try_get_results(config).unwrap().get(key).map(String::as_str), Some("jobs"));
    assert!(cli.try_get_results(test).is_none());

    // A subcommand name after `--` is a plain value.
    cli.run(["me", "test", "--", "build"]).unwrap();
    assert_eq!(cli.try_get_results(test).unwrap().get(filters), ["build"]);
    assert!(cli.try_get_results(build).is_none());
    assert_eq!(cli.try_get_results(cli.root()).unwrap().get(verbose), None);
}

#[test]
fn failures_name_their_command() {
    let App { mut cli, build, config, .. } = app();
    let jobs = cli.command(build).add_flag(Flag::<u16>::new("-j")).unwrap();
    cli.command(build).require(present(jobs), "-j is required");
    cli.command(config).add_flag(Flag::<u8>::new("-n")).unwrap();

    let err = cli.run(["me", "build", "config"]).unwrap_err();
    let err = err.as_parse().unwrap();
    assert_eq!(err.command(), "me build");
    assert_eq!(err.messages(), ["-j is required"]);
    assert!(cli.try_get_results(cli.root()).is_some());
    assert!(cli.try_get_results(build).is_none());

    let err = cli.run(["me", "build", "-j", "2", "config", "-n", "x", "-j"]).unwrap_err();
    expect![[r#"
        Parse(
            ParseError {
                command: "me build config",
                messages: [
                    "unknown flag '-j'",
                    "invalid value 'x' for '-n': not a valid u8",
                ],
            },
        )
    "#]]
    .assert_debug_eq(&err);
    assert!(cli.try_get_results(build).is_some());
}

#[test]
fn subcommand_names_stop_flag_values() {
    let App { mut cli, build, .. } = app();
    let level =
        cli.command(cli.root()).add_flag(Flag::<u8>::new("--level").with_implicit(3)).unwrap();
    cli.run(["me", "--level", "build"]).unwrap();
    assert_eq!(cli.try_get_results(cli.root()).unwrap().get(level), Some(&3));
    assert!(cli.try_get_results(build).is_some());
}

#[test]
fn scope_tags_tie_handles_to_their_command() {
    let App { mut cli, .. } = app();
    let root_flag = cli.command(cli.root()).add_flag(Flag::<u8>::new("-n")).unwrap();
    cli.run(["me", "-n", "1"]).unwrap();
    let results: &argot::Results<Root> = cli.try_get_results(cli.root()).unwrap();
    assert_eq!(results.get(root_flag), Some(&1));
}
