//! Registry integration tests: unregistering, persistence and sub-bundle loading

mod common;

use bundlekit::BundleRegistry;
use common::TestWorkspace;

fn open(workspace: &TestWorkspace) -> BundleRegistry {
    BundleRegistry::new(workspace.home()).expect("Failed to open registry")
}

#[test]
fn test_unregister_existing_bundle_returns_true() {
    let workspace = TestWorkspace::new();
    let mut registry = open(&workspace);
    registry.register([("test-bundle", "git+https://github.com/example/test@main")]);

    assert!(registry.unregister("test-bundle"));
}

#[test]
fn test_unregister_unknown_bundle_returns_false() {
    let workspace = TestWorkspace::new();
    let mut registry = open(&workspace);

    assert!(!registry.unregister("nonexistent"));
}

#[test]
fn test_unregister_removes_from_list_registered() {
    let workspace = TestWorkspace::new();
    let mut registry = open(&workspace);
    registry.register([
        ("bundle-a", "git+https://github.com/example/a@main"),
        ("bundle-b", "git+https://github.com/example/b@main"),
        ("bundle-c", "git+https://github.com/example/c@main"),
    ]);
    assert_eq!(registry.list_registered(), ["bundle-a", "bundle-b", "bundle-c"]);

    registry.unregister("bundle-b");
    assert_eq!(registry.list_registered(), ["bundle-a", "bundle-c"]);
}

#[test]
fn test_unregister_is_not_saved_automatically() {
    let workspace = TestWorkspace::new();
    let mut registry = open(&workspace);
    registry.register([("test-bundle", "git+https://github.com/example/test@main")]);
    registry.save().expect("Failed to save registry");

    registry.unregister("test-bundle");

    let reopened = open(&workspace);
    assert!(reopened.list_registered().contains(&"test-bundle".to_string()));
}

#[test]
fn test_unregister_parent_clears_children_included_by() {
    let workspace = TestWorkspace::new();
    let mut registry = open(&workspace);
    registry.register([
        ("parent", "git+https://github.com/example/parent@main"),
        ("child-a", "git+https://github.com/example/child-a@main"),
        ("child-b", "git+https://github.com/example/child-b@main"),
    ]);
    registry.get_state_mut("parent").expect("parent").includes =
        vec!["child-a".into(), "child-b".into()];
    registry.get_state_mut("child-a").expect("child-a").included_by = vec!["parent".into()];
    registry.get_state_mut("child-b").expect("child-b").included_by = vec!["parent".into()];

    registry.unregister("parent");

    assert!(!registry.list_registered().contains(&"parent".to_string()));
    assert!(registry.get_state("child-a").expect("child-a").included_by.is_empty());
    assert!(registry.get_state("child-b").expect("child-b").included_by.is_empty());
}

#[test]
fn test_unregister_child_clears_parents_includes() {
    let workspace = TestWorkspace::new();
    let mut registry = open(&workspace);
    registry.register([
        ("parent-a", "git+https://github.com/example/parent-a@main"),
        ("parent-b", "git+https://github.com/example/parent-b@main"),
        ("child", "git+https://github.com/example/child@main"),
    ]);
    registry.get_state_mut("parent-a").expect("parent-a").includes = vec!["child".into()];
    registry.get_state_mut("parent-b").expect("parent-b").includes = vec!["child".into()];
    registry.get_state_mut("child").expect("child").included_by =
        vec!["parent-a".into(), "parent-b".into()];

    registry.unregister("child");

    assert!(registry.get_state("parent-a").expect("parent-a").includes.is_empty());
    assert!(registry.get_state("parent-b").expect("parent-b").includes.is_empty());
}

#[test]
fn test_unregister_with_one_sided_edge() {
    let workspace = TestWorkspace::new();
    let mut registry = open(&workspace);
    registry.register([
        ("bundle-a", "git+https://github.com/example/a@main"),
        ("bundle-b", "git+https://github.com/example/b@main"),
    ]);
    registry.get_state_mut("bundle-a").expect("bundle-a").includes = vec!["bundle-b".into()];

    assert!(registry.unregister("bundle-a"));
    assert_eq!(registry.list_registered(), ["bundle-b"]);
}

#[test]
fn test_saved_registry_round_trips_edges() {
    let workspace = TestWorkspace::new();
    let mut registry = open(&workspace);
    registry.register([("app", "./app"), ("base", "./base")]);
    registry.get_state_mut("app").expect("app").includes = vec!["base".into()];
    registry.get_state_mut("base").expect("base").included_by = vec!["app".into()];
    registry.save().expect("Failed to save registry");

    let reopened = open(&workspace);
    assert_eq!(reopened.find("app"), Some("./app"));
    assert_eq!(reopened.get_state("app").expect("app").includes, ["base"]);
    assert_eq!(reopened.get_state("base").expect("base").included_by, ["app"]);
}

#[test]
fn test_corrupt_registry_file_is_an_error() {
    let workspace = TestWorkspace::new();
    workspace.write_file("home/registry.json", "{ not json");

    assert!(BundleRegistry::new(workspace.home()).is_err());
}

#[tokio::test]
async fn test_subdirectory_bundle_gets_source_base_paths() {
    let workspace = TestWorkspace::new();
    workspace.write_file(
        "repo/bundle.md",
        "---\nbundle:\n  name: root-bundle\n  version: 1.0.0\n---\n# Root Bundle",
    );
    workspace.write_file("repo/context/shared.md", "# Shared Context");
    workspace.write_bundle("repo/behaviors/recipes", "recipes", "");

    let registry = open(&workspace);
    let repo = workspace.path.join("repo");
    let loaded = registry
        .load_single_detailed(&format!(
            "file://{}#subdirectory=behaviors/recipes",
            repo.display()
        ))
        .await
        .expect("Failed to load sub-bundle");

    assert_eq!(loaded.bundle.name, "recipes");
    assert_eq!(loaded.bundle.source_base_paths.get("recipes"), Some(&repo));
    assert_eq!(loaded.root_name.as_deref(), Some("root-bundle"));
    assert!(loaded.is_sub_bundle());

    // the root's context is reachable from the sub-bundle
    assert_eq!(
        loaded.bundle.resolve_context_path("context/shared"),
        Some(repo.join("context/shared.md"))
    );
}

#[tokio::test]
async fn test_root_bundle_has_no_own_source_base_path() {
    let workspace = TestWorkspace::new();
    workspace.write_file(
        "repo/bundle.md",
        "---\nbundle:\n  name: root-bundle\n  version: 1.0.0\n---\n# Root Bundle",
    );

    let registry = open(&workspace);
    let bundle = registry
        .load_single(&format!("file://{}", workspace.path.join("repo").display()))
        .await
        .expect("Failed to load root bundle");

    assert_eq!(bundle.name, "root-bundle");
    assert!(!bundle.source_base_paths.contains_key("root-bundle"));
    assert_eq!(bundle.instruction.as_deref(), Some("# Root Bundle"));
}

#[tokio::test]
async fn test_subdirectory_without_root_bundle_has_no_source_base_path() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("repo/components/auth", "auth", "");

    let registry = open(&workspace);
    let loaded = registry
        .load_single_detailed(&format!(
            "file://{}#subdirectory=components/auth",
            workspace.path.join("repo").display()
        ))
        .await
        .expect("Failed to load bundle");

    assert_eq!(loaded.bundle.name, "auth");
    assert!(!loaded.bundle.source_base_paths.contains_key("auth"));
    assert!(!loaded.is_sub_bundle());
    assert_eq!(loaded.root_name, None);
}

#[tokio::test]
async fn test_load_by_registered_name_records_state() {
    let workspace = TestWorkspace::new();
    let app = workspace.write_bundle("app", "app", "includes:\n  - base\n");
    let base = workspace.write_bundle("base", "base", "");

    let mut registry = open(&workspace);
    registry.register([
        ("app", common::source_of(&app)),
        ("base", common::source_of(&base)),
    ]);

    let bundle = registry.load("app").await.expect("Failed to load app");
    assert_eq!(bundle.name, "app");

    let app_state = registry.get_state("app").expect("app");
    assert_eq!(app_state.includes, ["base"]);
    assert_eq!(app_state.version.as_deref(), Some("1.0.0"));
    assert_eq!(app_state.local_path.as_deref(), Some(app.as_path()));
    assert!(app_state.is_root);
    assert_eq!(registry.get_state("base").expect("base").included_by, ["app"]);
}

#[tokio::test]
async fn test_load_is_not_saved_automatically() {
    let workspace = TestWorkspace::new();
    let app = workspace.write_bundle("app", "app", "");

    let mut registry = open(&workspace);
    registry
        .load(&common::source_of(&app))
        .await
        .expect("Failed to load app");
    assert!(registry.get_state("app").is_some());

    assert!(open(&workspace).list_registered().is_empty());
    registry.save().expect("Failed to save registry");
    assert_eq!(open(&workspace).list_registered(), ["app"]);
}

#[tokio::test]
async fn test_load_of_missing_include_leaves_registry_unchanged() {
    let workspace = TestWorkspace::new();
    let app = workspace.write_bundle("app", "app", "includes:\n  - ./nowhere\n");

    let mut registry = open(&workspace);
    registry.register([("app", common::source_of(&app))]);

    let err = registry.load("app").await.expect_err("include is missing");
    assert!(err.to_string().contains("nowhere"), "{err}");

    let state = registry.get_state("app").expect("app");
    assert!(state.includes.is_empty());
    assert_eq!(state.version, None);
    assert_eq!(registry.list_registered(), ["app"]);
}

#[tokio::test]
async fn test_load_of_other_bundle_with_registered_name_is_rejected() {
    let workspace = TestWorkspace::new();
    let a = workspace.write_bundle("a", "foo", "");
    let b = workspace.write_file(
        "b/bundle.yaml",
        "bundle:\n  name: foo\n  version: 9.9.9\nincludes:\n  - ../c\n",
    );
    workspace.write_bundle("c", "c", "");

    let mut registry = open(&workspace);
    registry.register([("foo", common::source_of(&a))]);

    let err = registry
        .load(&common::source_of(b.parent().expect("b dir")))
        .await
        .expect_err("name belongs to a");
    let message = err.to_string();
    assert!(message.contains("'foo'"), "{message}");
    assert!(message.contains(&common::source_of(&a)), "{message}");

    let state = registry.get_state("foo").expect("foo");
    assert_eq!(state.source, common::source_of(&a));
    assert_eq!(state.version, None);
    assert_eq!(state.local_path, None);
    assert!(state.includes.is_empty());
    assert_eq!(registry.list_registered(), ["foo"]);

    registry
        .load("foo")
        .await
        .expect("registered source still loads");
    let state = registry.get_state("foo").expect("foo");
    assert_eq!(state.local_path.as_deref(), Some(a.as_path()));
    assert_eq!(state.version.as_deref(), Some("1.0.0"));
}
