use std::io::Write;
use wixforge::core::settings::{keys, ToolsetSettings, EXTENSIONS};
use wixforge::core::types::ErrorCategory;

#[test]
fn empty_store_serves_defaults() {
    let settings = ToolsetSettings::new();
    assert_eq!(settings.get_str(keys::INST_PATH, ""), "");
    assert_eq!(settings.get_str(keys::MSI_PKG, "setup.msi"), "setup.msi");
    assert!(!settings.get_bool(keys::COMPILE_ONLY, false));
    assert_eq!(settings.get_f64(keys::TIMEOUT_SECONDS, 0.0), 0.0);
}

#[test]
fn set_then_get_round_trips() {
    let mut settings = ToolsetSettings::new();
    settings.set(keys::INST_PATH, "/opt/wix");
    settings.set(keys::MARK_UNSTABLE, true);
    settings.set(keys::TIMEOUT_SECONDS, 90);
    assert_eq!(settings.get_str(keys::INST_PATH, ""), "/opt/wix");
    assert!(settings.get_bool(keys::MARK_UNSTABLE, false));
    assert_eq!(settings.get_f64(keys::TIMEOUT_SECONDS, 0.0), 90.0);
}

#[test]
fn malformed_values_coerce_to_defaults() {
    let mut settings = ToolsetSettings::new();
    settings.set(keys::MARK_UNSTABLE, "yes-please");
    settings.set(keys::TIMEOUT_SECONDS, "soon");
    assert!(!settings.get_bool(keys::MARK_UNSTABLE, false));
    assert_eq!(settings.get_f64(keys::TIMEOUT_SECONDS, 5.0), 5.0);
}

#[test]
fn toml_nested_tables_become_dotted_keys() {
    let settings = ToolsetSettings::from_toml_str(
        r#"
        debug = true

        [installation]
        path = "C:\\Program Files (x86)\\WiX Toolset v3.14\\bin"

        [compile]
        only = true

        [msi]
        package = "product-$BUILD_NUMBER.msi"
        "#,
    )
    .unwrap();
    assert!(settings.get_bool(keys::DEBUG_ENBL, false));
    assert!(settings.get_bool(keys::COMPILE_ONLY, false));
    assert_eq!(
        settings.get_str(keys::INST_PATH, ""),
        "C:\\Program Files (x86)\\WiX Toolset v3.14\\bin"
    );
    assert_eq!(
        settings.get_str(keys::MSI_PKG, ""),
        "product-$BUILD_NUMBER.msi"
    );
}

#[test]
fn toml_arrays_join_with_commas() {
    let settings = ToolsetSettings::from_toml_str(
        r#"
        [sys]
        env = ["TEMP", "TMP", "USERPROFILE"]
        "#,
    )
    .unwrap();
    assert_eq!(
        settings.get_str(keys::LOV_REJECTED, ""),
        "TEMP,TMP,USERPROFILE"
    );
}

#[test]
fn extension_names_work_as_boolean_keys() {
    let settings = ToolsetSettings::from_toml_str("WixUIExtension = true").unwrap();
    assert!(settings.get_bool("WixUIExtension", false));
    assert!(!settings.get_bool("WixUtilExtension", false));
    assert!(EXTENSIONS.contains(&"WixUIExtension"));
}

#[test]
fn invalid_toml_reports_configuration_error() {
    let err = ToolsetSettings::from_toml_str("= broken =").unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigurationError);
}

#[test]
fn load_missing_file_yields_empty_store() {
    let settings = ToolsetSettings::load(Some(std::path::Path::new(
        "/nonexistent/wixforge.toml",
    )))
    .unwrap();
    assert_eq!(settings.get_str(keys::INST_PATH, "fallback"), "fallback");
}

#[test]
fn load_reads_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "debug = true").unwrap();
    let settings = ToolsetSettings::load(Some(file.path())).unwrap();
    assert!(settings.get_bool(keys::DEBUG_ENBL, false));
}
