use ci_tagger::resolver::ReleaseInputs;
use serial_test::serial;
use std::env;

fn clear() {
    env::remove_var(ReleaseInputs::VERSION_OVERRIDE_VAR);
    env::remove_var(ReleaseInputs::BUMP_TYPE_VAR);
}

#[test]
#[serial]
fn test_release_inputs_unset() {
    clear();
    assert_eq!(ReleaseInputs::from_env(), ReleaseInputs::default());
}

#[test]
#[serial]
fn test_release_inputs_read_from_env() {
    clear();
    env::set_var("RELEASE_VERSION_OVERRIDE", " 3.1.0 ");
    env::set_var("RELEASE_BUMP_TYPE", "minor");

    let inputs = ReleaseInputs::from_env();
    assert_eq!(inputs.version_override.as_deref(), Some("3.1.0"));
    assert_eq!(inputs.bump.as_deref(), Some("minor"));
    clear();
}

#[test]
#[serial]
fn test_blank_release_inputs_are_unset() {
    clear();
    env::set_var("RELEASE_VERSION_OVERRIDE", "");
    env::set_var("RELEASE_BUMP_TYPE", "   ");

    assert_eq!(ReleaseInputs::from_env(), ReleaseInputs::default());
    clear();
}
