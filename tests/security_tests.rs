use std::fs;
use std::os::unix::fs::symlink;
use tailwind_prefixer::{build_catalog, prefix_tree, FileOutcome, PrefixOptions};
use tempfile::TempDir;

const CONFIG: &str = "module.exports = { prefix: 'tw-' }";

#[test]
fn test_file_size_limit() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tailwind.config.js"), CONFIG).unwrap();

    // Over the limit below
    let large = format!("<div className=\"flex\">{}</div>", "a".repeat(4096));
    fs::write(root.join("large_file.jsx"), &large).unwrap();
    fs::write(root.join("normal_file.jsx"), r#"<div className="flex">Test</div>"#).unwrap();

    let options = PrefixOptions {
        max_file_size: 1024,
        ..PrefixOptions::default()
    };
    let report = prefix_tree(root, &build_catalog(".flex{display:flex}"), &options).unwrap();

    assert_eq!(report.statistics.files_skipped, 1);
    assert!(matches!(
        report.outcome_for(&root.join("large_file.jsx")),
        Some(FileOutcome::Skipped { .. })
    ));
    assert_eq!(fs::read_to_string(root.join("large_file.jsx")).unwrap(), large);
    assert_eq!(
        fs::read_to_string(root.join("normal_file.jsx")).unwrap(),
        r#"<div className="tw-flex">Test</div>"#
    );
}

#[test]
fn test_symlinks_are_not_followed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tailwind.config.js"), CONFIG).unwrap();

    let real_file = root.join("real_file.jsx");
    fs::write(&real_file, r#"<div className="flex">Test</div>"#).unwrap();
    symlink(&real_file, root.join("symlink_file.jsx")).unwrap();

    // A symlink pointing outside the root must never lead to a write there
    let outside_dir = TempDir::new().unwrap();
    let outside_file = outside_dir.path().join("outside.jsx");
    fs::write(&outside_file, r#"<div className="flex">Bad</div>"#).unwrap();
    symlink(&outside_file, root.join("bad_symlink.jsx")).unwrap();
    symlink(outside_dir.path(), root.join("linked_dir")).unwrap();

    let report = prefix_tree(
        root,
        &build_catalog(".flex{display:flex}"),
        &PrefixOptions::default(),
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(&outside_file).unwrap(),
        r#"<div className="flex">Bad</div>"#
    );
    assert!(report.outcome_for(&root.join("bad_symlink.jsx")).is_none());
    assert!(report.outcome_for(&root.join("symlink_file.jsx")).is_none());

    // The real file is processed exactly once
    assert_eq!(report.statistics.files_changed, 1);
    assert_eq!(
        fs::read_to_string(&real_file).unwrap(),
        r#"<div className="tw-flex">Test</div>"#
    );
}

#[test]
fn test_written_files_keep_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tailwind.config.js"), CONFIG).unwrap();

    let script = root.join("bin.js");
    fs::write(&script, "el.className = 'x'; const c = <b className=\"flex\"/>;").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    prefix_tree(
        root,
        &build_catalog(".flex{display:flex}"),
        &PrefixOptions::default(),
    )
    .unwrap();

    let mode = fs::metadata(&script).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
    assert!(fs::read_to_string(&script).unwrap().contains("tw-flex"));

    // No temp files are left behind
    let leftovers: Vec<_> = fs::read_dir(root)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
