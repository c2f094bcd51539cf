//! Loading unit files from disk.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use unitscope::base::UnitName;
use unitscope::hir::ResolverConfig;
use unitscope::ide::AnalysisHost;
use unitscope::project::{LoadError, SearchPath, UnitLoader, collect_unit_paths};

fn write(dir: &Path, relative: &str, contents: &[u8]) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir");
    }
    fs::write(path, contents).expect("write file");
}

fn project_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "Main.pas", b"unit Main;\ninterface\nuses Helpers;\nimplementation\nend.\n");
    write(dir.path(), "core/Shapes.pas", b"unit Shapes;\ninterface\nimplementation\nend.\n");
    write(dir.path(), "App.dpr", b"program App;\nuses Main;\nbegin\nend.\n");
    write(dir.path(), "notes.txt", b"not a unit");
    write(dir.path(), "defs.inc", b"{$DEFINE DEBUG}");
    dir
}

#[test]
fn test_collect_only_unit_files() {
    let dir = project_dir();
    let paths = collect_unit_paths(dir.path()).expect("collect");
    let names: Vec<String> = paths
        .iter()
        .filter_map(|p| p.file_name()?.to_str().map(String::from))
        .collect();

    assert_eq!(names.len(), 3);
    assert!(names.contains(&"Main.pas".to_string()));
    assert!(names.contains(&"Shapes.pas".to_string()));
    assert!(names.contains(&"App.dpr".to_string()));
}

#[test]
fn test_load_directory_registers_units() {
    let dir = project_dir();
    let mut host = AnalysisHost::new();

    let files = UnitLoader::new()
        .load_directory(dir.path(), &mut host)
        .expect("load");

    assert_eq!(files.len(), 3);
    assert_eq!(host.file_count(), 3);
    let units: Vec<&UnitName> = files.iter().filter_map(|f| host.unit_name(*f)).collect();
    assert!(units.contains(&&UnitName::new("Shapes")));
    assert!(units.contains(&&UnitName::new("App")));

    let main = host.file_id(dir.path().join("Main.pas")).expect("main loaded");
    let clause = host.analysis().uses_clause(main);
    assert_eq!(clause.interface_uses, vec![UnitName::new("Helpers")]);
}

#[test]
fn test_bad_file_does_not_stop_the_rest() {
    let dir = project_dir();
    write(dir.path(), "Broken.pas", &[0xff, 0xfe, 0x00]);
    let mut host = AnalysisHost::new();

    let err = UnitLoader::new()
        .load_directory(dir.path(), &mut host)
        .expect_err("broken file reported");

    assert_eq!(err.count(), 1);
    assert!(matches!(&err, LoadError::Multiple(errors) if matches!(errors[0], LoadError::InvalidUtf8(_))));
    assert_eq!(host.file_count(), 3);
}

#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut host = AnalysisHost::new();

    let err = UnitLoader::new()
        .load_directory(dir.path().join("absent"), &mut host)
        .expect_err("missing");
    assert!(matches!(err, LoadError::DirectoryNotFound(_)));
    assert!(err.to_string().contains("absent"));
}

#[test]
fn test_load_single_file() {
    let dir = project_dir();
    let mut host = AnalysisHost::new();
    let loader = UnitLoader::new();

    let file = loader
        .load_file(dir.path().join("core/Shapes.pas"), &mut host)
        .expect("load");
    assert_eq!(host.unit_name(file), Some(&UnitName::new("Shapes")));

    let err = loader
        .load_file(dir.path().join("notes.txt"), &mut host)
        .expect_err("not a unit");
    assert!(matches!(err, LoadError::UnsupportedExtension(_)));
}

#[test]
fn test_search_path_units_follow_config() {
    let project = project_dir();
    let lib = tempfile::tempdir().expect("temp dir");
    write(lib.path(), "Helpers.pas", b"unit Helpers;\ninterface\nuses Shared;\nimplementation\nend.\n");
    write(lib.path(), "Shared.pas", b"unit Shared;\ninterface\nimplementation\nend.\n");

    let mut host = AnalysisHost::new();
    UnitLoader::new()
        .load_directory(project.path(), &mut host)
        .expect("project");
    let search_path = SearchPath::new().with_dir(lib.path());
    let loaded = search_path.load_into(&mut host).expect("library");
    assert_eq!(loaded.len(), 2);
    assert!(search_path.find_unit(&UnitName::new("helpers")).is_some());

    let main = host.file_id(project.path().join("Main.pas")).expect("main");
    let helpers = UnitName::new("Helpers");

    assert!(host.analysis().ctx().unit_file(&helpers).is_some());
    let deps = host.analysis().transitive_dependencies(main);
    assert!(deps.unit_graph.contains_key(&UnitName::new("Shared")));

    host.set_config(ResolverConfig::new().with_search_path(false));
    assert!(host.analysis().ctx().unit_file(&helpers).is_none());
    let deps = host.analysis().transitive_dependencies(main);
    assert!(deps.is_unit_available("Helpers"));
    assert!(!deps.is_unit_available("Shared"));
}

#[test]
fn test_earlier_search_directory_wins() {
    let first = tempfile::tempdir().expect("temp dir");
    let second = tempfile::tempdir().expect("temp dir");
    write(first.path(), "Common.pas", b"unit Common;\ninterface\nimplementation\nend.\n");
    write(second.path(), "Common.pas", b"unit Common;\ninterface\nimplementation\nend.\n");

    let mut host = AnalysisHost::new();
    let loaded = SearchPath::new()
        .with_dir(first.path())
        .with_dir(second.path())
        .load_into(&mut host)
        .expect("library");

    assert_eq!(loaded.len(), 1);
    assert_eq!(host.file_path(loaded[0]), Some(first.path().join("Common.pas")));
}
