use super::*;

#[test]
fn test_display_version() {
    assert_eq!(display_version(None), "-");
    assert_eq!(display_version(Some(Version::new(1, 2, 0))), "1.2.0");
}

#[test]
fn test_join_versions() {
    assert_eq!(join_versions(&[]), "");
    assert_eq!(
        join_versions(&[Version::new(1, 0, 0), Version::new(1, 10, 3)]),
        "1.0.0, 1.10.3"
    );
}

#[test]
fn test_exit_code_is_silent() {
    assert_eq!(ExitCode(2).to_string(), "");
}
