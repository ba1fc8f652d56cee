use super::*;

#[test]
fn exit_codes_are_distinct() {
    assert_ne!(EXIT_SUCCESS, EXIT_LINT_FAILED);
    assert_ne!(EXIT_SUCCESS, EXIT_CONFIG_ERROR);
    assert_ne!(EXIT_LINT_FAILED, EXIT_CONFIG_ERROR);
}

#[test]
fn exit_code_values() {
    assert_eq!(EXIT_SUCCESS, 0);
    assert_eq!(EXIT_LINT_FAILED, 1);
    assert_eq!(EXIT_CONFIG_ERROR, 2);
}
