use weaver_core::{ConfigTree, Descriptor, Error, apply_environment, load};
use tempfile::TempDir;

fn write_descriptor(content: &str) -> (TempDir, std::path::PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("Weaverfile");
    std::fs::write(&path, content).unwrap();
    (tmp, path)
}

#[test]
fn load_without_environment_type() {
    let (_tmp, path) = write_descriptor("docroot: /www\nstaging:\n  docroot: /stage\n");
    let tree = load(&path, None).unwrap();

    assert_eq!(tree.get("docroot"), Some(&ConfigTree::from("/www")));
    assert!(tree.get("staging").is_some());
}

#[test]
fn environment_override_wins_and_is_removed() {
    let (_tmp, path) = write_descriptor("a: 1\nstaging:\n  a: 2\n");
    let tree = load(&path, Some("staging")).unwrap();

    assert_eq!(tree, ConfigTree::mapping([("a", ConfigTree::from(2))]));
}

#[test]
fn environment_override_merges_nested_sections() {
    let (_tmp, path) = write_descriptor(
        r#"
env:
  FOO: base
  KEEP: yes
public-dirs: [static]
staging:
  env:
    FOO: staged
  public-dirs: [media]
"#,
    );
    let tree = load(&path, Some("staging")).unwrap();

    let env = tree.get("env").unwrap();
    assert_eq!(env.get("FOO"), Some(&ConfigTree::from("staged")));
    assert_eq!(env.get("KEEP"), Some(&ConfigTree::from("yes")));
    assert_eq!(
        tree.get("public-dirs"),
        Some(&ConfigTree::sequence([
            ConfigTree::from("static"),
            ConfigTree::from("media"),
        ]))
    );
}

#[test]
fn unknown_environment_type_leaves_tree_untouched() {
    let tree = ConfigTree::from_yaml_str("a: 1\nstaging:\n  a: 2\n").unwrap();
    let result = apply_environment(tree.clone(), Some("production")).unwrap();
    assert_eq!(result, tree);
}

#[test]
fn empty_environment_type_is_ignored() {
    let tree = ConfigTree::from_yaml_str("a: 1\n\"\": {a: 2}\n").unwrap();
    let result = apply_environment(tree.clone(), Some("")).unwrap();
    assert_eq!(result, tree);
}

#[test]
fn null_override_section_is_ignored() {
    let tree = ConfigTree::from_yaml_str("a: 1\nstaging:\n").unwrap();
    let result = apply_environment(tree.clone(), Some("staging")).unwrap();
    assert_eq!(result, tree);
}

#[test]
fn incompatible_override_is_a_merge_error() {
    let (_tmp, path) = write_descriptor("env:\n  FOO: bar\nstaging:\n  env: oops\n");
    let err = load(&path, Some("staging")).unwrap_err();

    match err {
        Error::Override { env_type, source } => {
            assert_eq!(env_type, "staging");
            assert_eq!(source.key.as_deref(), Some("env"));
        }
        other => panic!("expected override error, got {other:?}"),
    }
}

#[test]
fn parse_failure_names_the_file() {
    let (_tmp, path) = write_descriptor("env: [unterminated\n");
    let err = load(&path, None).unwrap_err();

    assert!(matches!(err, Error::DescriptorParse { .. }));
    assert!(err.to_string().contains("Weaverfile"));
}

#[test]
fn missing_file_is_a_read_error() {
    let tmp = TempDir::new().unwrap();
    let err = load(&tmp.path().join("Weaverfile"), None).unwrap_err();
    assert!(matches!(err, Error::DescriptorRead { .. }));
}

#[test]
fn top_level_list_is_rejected() {
    let (_tmp, path) = write_descriptor("- a\n- b\n");
    let err = load(&path, None).unwrap_err();
    assert!(matches!(err, Error::DescriptorShape { found: "a list", .. }));
}

#[test]
fn empty_descriptor_is_an_empty_mapping() {
    let (_tmp, path) = write_descriptor("");
    let descriptor = Descriptor::load(&path, Some("staging")).unwrap();
    assert_eq!(descriptor.tree().as_mapping().map(|m| m.len()), Some(0));
}
