use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use tfrender::cli::Args;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("tfrender")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["--template", "providers.tf.j2"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template, "providers.tf.j2");
    assert_eq!(parsed.output, None);
    assert!(parsed.vars.is_empty());
    assert_eq!(parsed.config, None);
    assert_eq!(parsed.template_dir, PathBuf::from("."));
    assert!(!parsed.verbose);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--template",
        "backend.tf.j2",
        "--output",
        "backend.tf",
        "--var",
        "region=us-east-1",
        "--config",
        "config.yaml",
        "--template-dir",
        "terraform/templates",
        "--verbose",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template, "backend.tf.j2");
    assert_eq!(parsed.output, Some(PathBuf::from("backend.tf")));
    assert_eq!(parsed.vars, vec!["region=us-east-1"]);
    assert_eq!(parsed.config, Some(PathBuf::from("config.yaml")));
    assert_eq!(parsed.template_dir, PathBuf::from("terraform/templates"));
    assert!(parsed.verbose);
}

#[test]
fn test_short_flags() {
    let args = make_args(&[
        "-t",
        "providers.tf.j2",
        "-o",
        "providers.tf",
        "-v",
        "account_id=123456789012",
        "-c",
        "config.yaml",
        "-d",
        "templates",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template, "providers.tf.j2");
    assert_eq!(parsed.output, Some(PathBuf::from("providers.tf")));
    assert_eq!(parsed.vars, vec!["account_id=123456789012"]);
    assert_eq!(parsed.config, Some(PathBuf::from("config.yaml")));
    assert_eq!(parsed.template_dir, PathBuf::from("templates"));
}

#[test]
fn test_repeated_vars_keep_order() {
    let args = make_args(&[
        "-t",
        "providers.tf.j2",
        "--var",
        "region=us-east-1",
        "-v",
        "role_name=TerraformRole",
        "--var",
        "region=us-west-2",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(
        parsed.vars,
        vec!["region=us-east-1", "role_name=TerraformRole", "region=us-west-2"]
    );
}

#[test]
fn test_var_value_may_contain_equals() {
    let args = make_args(&["-t", "x.j2", "--var", "filter=a=b"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.vars, vec!["filter=a=b"]);
}

#[test]
fn test_missing_template() {
    let args = make_args(&["--output", "providers.tf"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_positional_args_rejected() {
    let args = make_args(&["-t", "providers.tf.j2", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
