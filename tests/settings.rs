use std::io::Write;

use pushkind_wallet::settings::ClientSettings;
use pushkind_wallet::store::LocalStore;

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let settings = ClientSettings::load(Some(&dir.path().join("absent.yaml"))).unwrap();

    assert_eq!(settings.fallback_icon, ClientSettings::default().fallback_icon);
    assert!(settings.stale_edit_fallback);
}

#[test]
fn yaml_file_overrides_defaults() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "fallback_color: \"#123456\"").unwrap();
    writeln!(file, "stale_edit_fallback: false").unwrap();

    let settings = ClientSettings::load(Some(file.path())).unwrap();

    assert_eq!(settings.fallback_color, "#123456");
    assert_eq!(settings.fallback_icon, "category");
    assert!(!settings.stale_edit_fallback);

    let store = LocalStore::new(settings);
    assert!(!store.settings().stale_edit_fallback);
}
