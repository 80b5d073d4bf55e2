use std::path::{Path, PathBuf};
use wixforge::utils::{expand_env_vars, replace_extension};

#[test]
fn derives_object_name_from_source_name() {
    assert_eq!(
        replace_extension(Path::new("test.wxs"), ".wxs", ".wixobj"),
        PathBuf::from("test.wixobj")
    );
}

#[test]
fn derives_package_name_from_object_name() {
    assert_eq!(
        replace_extension(Path::new("build/test.wixobj"), ".wixobj", ".msi"),
        PathBuf::from("build/test.msi")
    );
}

#[test]
fn replace_extension_round_trips() {
    let original = Path::new("nested/dir/product.wxs");
    let there = replace_extension(original, ".wxs", ".wixobj");
    let back = replace_extension(&there, ".wixobj", ".wxs");
    assert_eq!(back, PathBuf::from(original));
}

#[test]
fn expansion_substitutes_known_variables() {
    let vars = vec![
        ("BUILD_NUMBER".to_string(), "123".to_string()),
        ("JOB_NAME".to_string(), "installer".to_string()),
    ];
    assert_eq!(
        expand_env_vars("$JOB_NAME-${BUILD_NUMBER}.msi", &vars),
        "installer-123.msi"
    );
}

#[test]
fn expansion_leaves_unknown_variables_untouched() {
    assert_eq!(
        expand_env_vars("setup-${NOT_SET}.msi", &[]),
        "setup-${NOT_SET}.msi"
    );
}

#[test]
fn expansion_ignores_text_without_references() {
    assert_eq!(expand_env_vars("setup.msi", &[]), "setup.msi");
}
