use wixforge::core::env::{escape_parameter_value, filter_environment};
use wixforge::core::{ParameterMap, RejectionList};
use wixforge::logging::BuildLog;

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn disabled_switch_rejects_everything() {
    let log = BuildLog::new(false);
    let env = vars(&[("BUILD_NUMBER", "7"), ("JOB_NAME", "installer")]);
    let filtered = filter_environment(&env, &RejectionList::default(), false, &log);
    assert!(filtered.is_empty());
}

#[test]
fn accepted_variables_keep_source_order() {
    let log = BuildLog::new(false);
    let env = vars(&[("ZETA", "1"), ("ALPHA", "2"), ("MID", "3")]);
    let filtered = filter_environment(&env, &RejectionList::default(), true, &log);
    let names: Vec<_> = filtered.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(names, vec!["ZETA", "ALPHA", "MID"]);
}

#[test]
fn name_containing_equals_is_always_rejected() {
    let log = BuildLog::new(false);
    let env = vars(&[("BAD=NAME", "value"), ("GOOD", "value")]);
    let filtered = filter_environment(&env, &RejectionList::default(), true, &log);
    let names: Vec<_> = filtered.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(names, vec!["GOOD"]);
}

#[test]
fn rejection_list_is_case_insensitive() {
    let log = BuildLog::new(false);
    let list = RejectionList::new("Secret_Token");
    let env = vars(&[("SECRET_TOKEN", "hunter2"), ("KEEP_ME", "yes")]);
    let filtered = filter_environment(&env, &list, true, &log);
    let names: Vec<_> = filtered.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(names, vec!["KEEP_ME"]);
}

#[test]
fn bundled_defaults_reject_path_and_common_program_files() {
    let log = BuildLog::new(false);
    let env = vars(&[
        ("Path", "C:\\Windows"),
        ("CommonProgramFiles", "C:\\Program Files\\Common Files"),
        ("RELEASE", "stable"),
    ]);
    let filtered = filter_environment(&env, &RejectionList::default(), true, &log);
    let names: Vec<_> = filtered.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(names, vec!["RELEASE"]);
}

#[test]
fn windows_path_values_are_rejected() {
    let log = BuildLog::new(false);
    let env = vars(&[
        ("TOOL_HOME", "C:\\Program Files (x86)\\Some Tool"),
        ("SHARE", "\\server\\share\\"),
        ("VERSION", "1.0.0"),
    ]);
    let filtered = filter_environment(&env, &RejectionList::default(), true, &log);
    let names: Vec<_> = filtered.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(names, vec!["VERSION"]);
}

#[test]
fn empty_environment_yields_empty_map() {
    let log = BuildLog::new(false);
    let filtered = filter_environment(&[], &RejectionList::default(), true, &log);
    assert!(filtered.is_empty());
}

#[test]
fn escape_backslash_rules() {
    assert_eq!(escape_parameter_value("ends\\"), "ends\\\\");
    assert_eq!(escape_parameter_value("ends\\\\"), "ends\\\\");
    assert_eq!(escape_parameter_value("mid\\dle"), "mid\\dle");
}

#[test]
fn escape_quote_rules() {
    assert_eq!(escape_parameter_value("a \"b\" c"), "a \\\"b\\\" c");
    assert_eq!(escape_parameter_value("plain"), "plain");
}

#[test]
fn user_parameters_take_precedence_over_environment() {
    let log = BuildLog::new(false);
    let mut params = ParameterMap::new();
    params.insert("BUILD_NUMBER", "explicit");
    let env = vars(&[("BUILD_NUMBER", "from-env"), ("EXTRA", "kept")]);
    params.merge(filter_environment(&env, &RejectionList::default(), true, &log));
    let collected: Vec<_> = params.iter().collect();
    assert_eq!(
        collected,
        vec![("BUILD_NUMBER", "explicit"), ("EXTRA", "kept")]
    );
}
