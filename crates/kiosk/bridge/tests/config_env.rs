//! Environment overrides. Kept in its own test binary since it mutates the
//! process environment.

use kiosk_bridge::KioskConfig;
use kiosk_types::UserRestriction;

#[test]
fn environment_overrides_defaults() {
    std::env::set_var("KIOSK_ADMIN__PACKAGE", "org.example.terminal");
    std::env::set_var("KIOSK_DISABLE_KEYGUARD", "false");
    std::env::set_var("KIOSK_RESTRICTIONS", "no_safe_boot,no_add_user");
    std::env::set_var("KIOSK_LOGGING__LEVEL", "debug");

    let config = KioskConfig::load(None).unwrap();

    assert_eq!(config.admin.package, "org.example.terminal");
    assert_eq!(config.admin.receiver, ".KioskAdminReceiver");
    assert!(!config.disable_keyguard);
    assert_eq!(
        config.restrictions,
        vec![UserRestriction::SafeBoot, UserRestriction::AddUser]
    );
    assert_eq!(config.logging.level, "debug");

    let profile = config.profile();
    assert_eq!(profile.admin.package(), "org.example.terminal");
    assert!(!profile.disable_keyguard);
}
