use std::io;
use std::path::Path;

use kitty_shell::{CommandRunner, EnvMap, MemoryAssetStore, ShellIntegration};
use tempfile::tempdir;

struct FakeRunner(String);

impl CommandRunner for FakeRunner {
    fn capture_stdout(&self, _exe: &Path, _args: &[&str], _env: &EnvMap) -> io::Result<String> {
        Ok(self.0.clone())
    }
}

fn bundled_store() -> MemoryAssetStore {
    let mut store = MemoryAssetStore::new();
    store.add_file(
        "shell-integration/zsh/.zshenv",
        b"builtin source \"$KITTY_ORIG_ZDOTDIR/.zshenv\"\n".to_vec(),
    );
    store.add_file("shell-integration/zsh/kitty-integration", b"# hooks\n".to_vec());
    store.add_dir("shell-integration/fish/vendor_conf.d");
    store.add_file(
        "shell-integration/fish/vendor_conf.d/kitty-shell-integration.fish",
        b"status is-interactive; and source kitty.fish\n".to_vec(),
    );
    store
}

#[test]
fn fish_setup_extracts_and_rewires_the_environment() {
    let cache = tempdir().expect("create temp dir");
    let store = bundled_store();
    let integration = ShellIntegration::new(&store, cache.path());

    let argv = vec!["fish".to_string()];
    let (out_argv, out_env) = integration
        .setup("fish", "enabled", &argv, &EnvMap::new())
        .expect("fish setup");

    let ksi_root = cache.path().join("extracted-ksi/shell-integration");
    assert!(
        ksi_root
            .join("fish/vendor_conf.d/kitty-shell-integration.fish")
            .is_file()
    );
    assert_eq!(out_argv, argv);
    assert_eq!(
        out_env.get("KITTY_FISH_XDG_DATA_DIR"),
        Some(&cache.path().join("extracted-ksi").to_string_lossy().into_owned())
    );
    assert_eq!(
        out_env.get("XDG_DATA_DIRS"),
        Some(&cache.path().join("extracted-ksi").to_string_lossy().into_owned())
    );
    assert_eq!(
        out_env.get("KITTY_SHELL_INTEGRATION").map(String::as_str),
        Some("enabled")
    );
}

#[test]
fn zsh_setup_redirects_zdotdir_and_stashes_the_original() {
    let cache = tempdir().expect("create temp dir");
    let home = tempdir().expect("create temp dir");
    std::fs::write(home.path().join(".zshrc"), "# user rc\n").expect("write rc");

    let store = bundled_store();
    let integration = ShellIntegration::new(&store, cache.path())
        .with_runner(Box::new(FakeRunner(String::new())));

    let mut env = EnvMap::new();
    env.insert("HOME".to_string(), home.path().to_string_lossy().into_owned());
    env.insert(
        "ZDOTDIR".to_string(),
        home.path().to_string_lossy().into_owned(),
    );

    let (_, out_env) = integration
        .setup("zsh", "enabled no-title", &["zsh".to_string()], &env)
        .expect("zsh setup");

    let ksi_root = cache.path().join("extracted-ksi/shell-integration");
    assert!(ksi_root.join("zsh/.zshenv").is_file());
    assert_eq!(
        out_env.get("KITTY_ORIG_ZDOTDIR"),
        Some(&home.path().to_string_lossy().into_owned())
    );
    assert_eq!(
        out_env.get("ZDOTDIR"),
        Some(&ksi_root.to_string_lossy().into_owned())
    );
    assert_eq!(
        out_env.get("KITTY_SHELL_INTEGRATION").map(String::as_str),
        Some("enabled no-title")
    );
    // Caller's map is untouched.
    assert!(!env.contains_key("KITTY_SHELL_INTEGRATION"));
}

#[test]
fn repeated_setup_reuses_the_extracted_cache() {
    let cache = tempdir().expect("create temp dir");
    let store = bundled_store();
    let integration = ShellIntegration::new(&store, cache.path());

    integration
        .setup("fish", "enabled", &["fish".to_string()], &EnvMap::new())
        .expect("first setup");

    let fish_file = cache
        .path()
        .join("extracted-ksi/shell-integration/fish/vendor_conf.d/kitty-shell-integration.fish");
    let before = std::fs::metadata(&fish_file)
        .and_then(|m| m.modified())
        .expect("mtime");

    std::thread::sleep(std::time::Duration::from_millis(20));
    integration
        .setup("fish", "enabled", &["fish".to_string()], &EnvMap::new())
        .expect("second setup");

    let after = std::fs::metadata(&fish_file)
        .and_then(|m| m.modified())
        .expect("mtime");
    assert_eq!(before, after);
}
