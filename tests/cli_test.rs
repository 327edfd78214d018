use inochi::cli::{Args, Commands};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("inochi")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_init_args() {
    let args = make_args(&["init", "--project", "My Project", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(!parsed.verbose);
    match parsed.command {
        Commands::Init(init) => {
            assert_eq!(init.project, "My Project");
            assert_eq!(init.output_dir, PathBuf::from("./output"));
            assert!(init.package.is_none());
            assert!(init.merger.is_none());
        }
        other => panic!("Expected init command, got {other:?}"),
    }
}

#[test]
fn test_init_all_flags() {
    let args = make_args(&[
        "--verbose",
        "init",
        "-p",
        "Foo",
        "--package",
        "foo-cli",
        "--merger",
        "meld",
        "--templates",
        "/tmp/templates",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    match parsed.command {
        Commands::Init(init) => {
            assert_eq!(init.package.as_deref(), Some("foo-cli"));
            assert_eq!(init.merger.as_deref(), Some("meld"));
            assert_eq!(init.templates, Some(PathBuf::from("/tmp/templates")));
            assert_eq!(init.output_dir, PathBuf::from("."));
        }
        other => panic!("Expected init command, got {other:?}"),
    }
}

#[test]
fn test_info_args() {
    let args = make_args(&["info", "-v", "some/project"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    match parsed.command {
        Commands::Info(info) => assert_eq!(info.project_dir, PathBuf::from("some/project")),
        other => panic!("Expected info command, got {other:?}"),
    }
}

#[test]
fn test_missing_subcommand() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["info", "./a", "./b"]);
    assert!(Args::try_parse_from(args).is_err());
}
