use std::fs;
use std::sync::Arc;
use tailwind_prefixer::{
    build_catalog, prefix, prefix_tree, run, ClassCatalog, FileOutcome, PrefixArgs,
    PrefixOptions, PrefixerError,
};
use tempfile::TempDir;

fn catalog() -> Arc<ClassCatalog> {
    Arc::new(build_catalog(".flex{display:flex} .p-4{padding:1rem}"))
}

#[tokio::test]
async fn test_missing_root_is_a_hard_failure() {
    let temp_dir = TempDir::new().unwrap();

    let result = run(temp_dir.path().join("does-not-exist"), catalog()).await;

    match result {
        Err(PrefixerError::InvalidRoot { path, .. }) => {
            assert!(path.contains("does-not-exist"), "Error should name the root: {}", path);
        }
        other => panic!("Expected InvalidRoot, got {:?}", other.map(|r| r.statistics)),
    }
}

#[tokio::test]
async fn test_root_that_is_a_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("App.jsx");
    fs::write(&file, r#"<div className="flex"/>"#).unwrap();

    let result = run(&file, catalog()).await;
    assert!(matches!(result, Err(PrefixerError::InvalidRoot { .. })));

    // The file itself must not have been rewritten
    assert_eq!(fs::read_to_string(&file).unwrap(), r#"<div className="flex"/>"#);
}

#[tokio::test]
async fn test_unreadable_file_does_not_abort_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tailwind.config.js"), "module.exports = { prefix: 'tw-' }").unwrap();

    // Invalid UTF-8 cannot be read as text
    fs::write(root.join("a-broken.jsx"), b"\xff\xfe\x00\x80").unwrap();
    fs::write(root.join("b-good.jsx"), r#"<div className="flex p-4"/>"#).unwrap();

    let report = run(root, catalog()).await.unwrap();

    assert_eq!(report.statistics.files_failed, 1);
    assert_eq!(report.statistics.files_changed, 1);
    match report.outcome_for(&root.join("a-broken.jsx")) {
        Some(FileOutcome::Failed { error }) => {
            assert!(error.contains("a-broken.jsx"), "Error should include the path: {}", error);
        }
        other => panic!("Expected a failed outcome, got {:?}", other),
    }
    assert_eq!(
        fs::read_to_string(root.join("b-good.jsx")).unwrap(),
        r#"<div className="tw-flex tw-p-4"/>"#
    );
}

#[test]
fn test_unparsable_config_falls_back_to_empty_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tailwind.config.js"), "}}} this is not a config {{{").unwrap();
    fs::write(root.join("page.html"), "<p class=\"flex\"></p>").unwrap();

    let report = prefix_tree(root, &catalog(), &PrefixOptions::default()).unwrap();

    assert_eq!(report.metadata.prefix, "");
    assert_eq!(report.statistics.files_failed, 0);
    assert_eq!(report.statistics.files_changed, 0);
    assert_eq!(fs::read_to_string(root.join("page.html")).unwrap(), "<p class=\"flex\"></p>");
}

#[test]
fn test_malformed_markup_is_left_alone() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tailwind.config.js"), "module.exports = { prefix: 'tw-' }").unwrap();
    let broken = "export const C = () => <div className=\"flex p-4\n  @apply\n";
    fs::write(root.join("broken.jsx"), broken).unwrap();

    let report = prefix_tree(root, &catalog(), &PrefixOptions::default()).unwrap();

    assert_eq!(report.statistics.files_failed, 0);
    assert_eq!(fs::read_to_string(root.join("broken.jsx")).unwrap(), broken);
}

#[tokio::test]
async fn test_error_message_for_missing_catalog() {
    let temp_dir = TempDir::new().unwrap();

    let args = PrefixArgs {
        root: temp_dir.path().to_path_buf(),
        catalog: temp_dir.path().join("classes.json"),
        jobs: None,
        verbose: false,
        dry_run: false,
        report: None,
    };

    let err = prefix(args).await.unwrap_err();
    let error_msg = format!("{}", err);
    assert!(
        error_msg.contains("classes.json") && error_msg.contains("catalog"),
        "Error should name the catalog file: {}",
        error_msg
    );
}

#[tokio::test]
async fn test_invalid_arguments_are_rejected_before_any_work() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("App.jsx"), r#"<div className="flex"/>"#).unwrap();

    let args = PrefixArgs {
        root: temp_dir.path().to_path_buf(),
        catalog: temp_dir.path().join("classes.json"),
        jobs: Some(0),
        verbose: false,
        dry_run: false,
        report: None,
    };

    let err = prefix(args).await.unwrap_err();
    assert!(matches!(err, PrefixerError::InvalidInput(_)));
}
