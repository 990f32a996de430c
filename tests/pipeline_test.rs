use std::fs;
use tempfile::TempDir;
use tfrender::error::Error;
use tfrender::pipeline::Pipeline;

fn template_dir(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).unwrap();
    }
    temp_dir
}

#[test_log::test]
fn test_literal_overrides_config_file() {
    let dir = template_dir(&[
        ("region.j2", "Region: {{ region }}"),
        ("config.yaml", "region: us-east-1\n"),
    ]);
    let pipeline = Pipeline::new(dir.path());

    let variables = pipeline
        .load(Some(dir.path().join("config.yaml")), &["region=us-west-2"])
        .unwrap();
    let rendered = pipeline.render("region.j2", &variables).unwrap();

    assert_eq!(rendered, "Region: us-west-2");
}

#[test]
fn test_config_only() {
    let dir = template_dir(&[
        ("backend.tf.j2", "bucket = \"{{ state_bucket }}\"\nregion = \"{{ region }}\"\n"),
        ("config.yaml", "state_bucket: tf-state\nregion: eu-central-1\n"),
    ]);
    let pipeline = Pipeline::new(dir.path());

    let variables = pipeline
        .load(Some(dir.path().join("config.yaml")), &[] as &[&str])
        .unwrap();
    let rendered = pipeline.render("backend.tf.j2", &variables).unwrap();

    assert_eq!(rendered, "bucket = \"tf-state\"\nregion = \"eu-central-1\"");
}

#[test]
fn test_missing_variable_without_sources() {
    let dir = template_dir(&[("role.j2", "Role: {{ role_name }}")]);
    let pipeline = Pipeline::new(dir.path());

    let variables = pipeline.load(None::<&str>, &[] as &[&str]).unwrap();
    match pipeline.render("role.j2", &variables) {
        Err(Error::UndefinedVariableError { name, .. }) => assert_eq!(name, "role_name"),
        other => panic!("Expected UndefinedVariableError, got {other:?}"),
    }
}

#[test]
fn test_malformed_literal_fails_before_render() {
    let dir = template_dir(&[("role.j2", "Role: {{ role_name }}")]);
    let pipeline = Pipeline::new(dir.path());

    match pipeline.load(None::<&str>, &["role_name=Admin", "foo"]) {
        Err(Error::FormatError { literal }) => assert_eq!(literal, "foo"),
        other => panic!("Expected FormatError, got {other:?}"),
    }
}

#[test]
fn test_unknown_template() {
    let dir = template_dir(&[]);
    let pipeline = Pipeline::new(dir.path());

    let variables = pipeline.load(None::<&str>, &["a=b"]).unwrap();
    match pipeline.render("providers.tf.j2", &variables) {
        Err(Error::TemplateNotFoundError { name, .. }) => assert_eq!(name, "providers.tf.j2"),
        other => panic!("Expected TemplateNotFoundError, got {other:?}"),
    }
}

#[test]
fn test_identical_inputs_render_identically() {
    let dir = template_dir(&[
        (
            "providers.tf.j2",
            "{% for az in azs %}\n{{ region }}{{ az }}\n{% endfor %}\nrole = \"{{ role_name }}\"",
        ),
        ("config.yaml", "region: us-east-1\nazs: [a, b, c]\nrole_name: Default\n"),
    ]);
    let pipeline = Pipeline::new(dir.path());
    let config = dir.path().join("config.yaml");
    let literals = ["role_name=TerraformRole"];

    let first = pipeline
        .render("providers.tf.j2", &pipeline.load(Some(&config), &literals).unwrap())
        .unwrap();
    let second = pipeline
        .render("providers.tf.j2", &pipeline.load(Some(&config), &literals).unwrap())
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first, "us-east-1a\nus-east-1b\nus-east-1c\nrole = \"TerraformRole\"");
}

#[test]
fn test_unreadable_config_source_is_reported() {
    let dir = template_dir(&[("config.yaml", "- not\n- a mapping\n")]);
    let pipeline = Pipeline::new(dir.path());

    match pipeline.load(Some(dir.path().join("config.yaml")), &["region=us-east-1"]) {
        Err(Error::ConfigReadError { path, .. }) => assert_eq!(path, dir.path().join("config.yaml")),
        other => panic!("Expected ConfigReadError, got {other:?}"),
    }
}
