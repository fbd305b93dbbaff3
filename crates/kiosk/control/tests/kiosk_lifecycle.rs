//! End-to-end kiosk lifecycle against a simulated device

use kiosk_control::{KioskController, KioskProfile};
use kiosk_platform::sim::{CallKind, PlatformCall, SimulatedDevice};
use kiosk_platform::InlineUiThread;
use kiosk_types::{
    AdminComponent, ComponentName, IntentFilter, KioskState, LockTaskMode, SystemUiFlags,
    UserRestriction, WindowFlags,
};
use std::sync::Arc;

const PACKAGE: &str = "com.example.kiosk";

fn controller() -> KioskController {
    KioskController::new(
        KioskProfile::new(
            AdminComponent::new(PACKAGE, ".KioskAdminReceiver"),
            ComponentName::new(PACKAGE, ".MainActivity"),
        ),
        Arc::new(InlineUiThread),
    )
}

const OWNER_ONLY_CALLS: [CallKind; 4] = [
    CallKind::SetLockTaskPackages,
    CallKind::SetKeyguardDisabled,
    CallKind::AddPersistentPreferredActivity,
    CallKind::AddUserRestriction,
];

#[test]
fn query_active_is_false_without_activity() {
    let controller = controller();
    assert!(!controller.query_active(None));
    assert!(!controller.query_device_owner(None));
    assert!(!controller.enter(None));
    assert!(!controller.query_active(None));
}

#[test]
fn device_owner_enter_applies_full_policy_set() {
    let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
    let controller = controller();

    assert!(controller.enter(Some(&device)));

    let snapshot = device.snapshot();
    assert_eq!(snapshot.ui_flags, SystemUiFlags::KIOSK);
    assert_eq!(snapshot.window_flags, WindowFlags::KIOSK);
    assert_eq!(snapshot.lock_task_packages, vec![PACKAGE.to_string()]);
    assert!(snapshot.keyguard_disabled);
    assert_eq!(
        snapshot.preferred_home,
        Some(ComponentName::new(PACKAGE, ".MainActivity"))
    );
    assert_eq!(snapshot.restrictions, vec![UserRestriction::AdjustVolume]);
    assert_eq!(snapshot.lock_task_mode, LockTaskMode::Locked);
    assert!(controller.query_active(Some(&device)));
    assert_eq!(controller.state(Some(&device)), KioskState::Active);
}

#[test]
fn device_owner_enter_calls_platform_in_order() {
    let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
    let controller = controller();

    assert!(controller.enter(Some(&device)));

    assert_eq!(
        device.calls(),
        vec![
            PlatformCall::SetSystemUiVisibility {
                flags: SystemUiFlags::KIOSK
            },
            PlatformCall::AddWindowFlags {
                flags: WindowFlags::KIOSK
            },
            PlatformCall::ResolvePolicyService,
            PlatformCall::IsDeviceOwnerApp {
                package: PACKAGE.to_string()
            },
            PlatformCall::SetLockTaskPackages {
                packages: vec![PACKAGE.to_string()]
            },
            PlatformCall::SetKeyguardDisabled { disabled: true },
            PlatformCall::AddPersistentPreferredActivity {
                filter: IntentFilter::home(),
                activity: ComponentName::new(PACKAGE, ".MainActivity"),
            },
            PlatformCall::AddUserRestriction {
                restriction: UserRestriction::AdjustVolume
            },
            PlatformCall::StartLockTask,
        ]
    );
}

#[test]
fn enter_twice_stays_active() {
    let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
    let controller = controller();

    assert!(controller.enter(Some(&device)));
    assert!(controller.enter(Some(&device)));
    assert!(controller.query_active(Some(&device)));
    assert_eq!(device.snapshot().restrictions, vec![UserRestriction::AdjustVolume]);
}

#[test]
fn exit_without_enter_is_inactive() {
    let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
    let controller = controller();

    assert!(controller.exit(Some(&device)));
    assert!(!controller.query_active(Some(&device)));
    assert_eq!(controller.state(Some(&device)), KioskState::Inactive);
}

#[test]
fn enter_then_exit_round_trip() {
    let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
    let controller = controller();

    assert!(controller.enter(Some(&device)));
    assert!(controller.query_active(Some(&device)));

    assert!(controller.exit(Some(&device)));
    assert!(!controller.query_active(Some(&device)));

    let snapshot = device.snapshot();
    assert_eq!(snapshot.ui_flags, SystemUiFlags::RELAXED);
    assert_eq!(snapshot.window_flags, WindowFlags::empty());
    assert!(snapshot.restrictions.is_empty());
}

#[test]
fn non_owner_enter_never_calls_owner_policies() {
    let device = SimulatedDevice::builder(PACKAGE).build();
    let controller = controller();

    assert!(!controller.query_device_owner(Some(&device)));
    assert!(controller.enter(Some(&device)));

    for kind in OWNER_ONLY_CALLS {
        assert_eq!(device.call_count(kind), 0, "{} was called", kind);
    }
    assert_eq!(device.call_count(CallKind::StartLockTask), 1);
    assert_eq!(device.snapshot().lock_task_mode, LockTaskMode::Pinned);
    assert!(controller.query_active(Some(&device)));
}

#[test]
fn non_owner_exit_never_clears_restrictions() {
    let device = SimulatedDevice::builder(PACKAGE).build();
    let controller = controller();

    assert!(controller.enter(Some(&device)));
    assert!(controller.exit(Some(&device)));
    assert_eq!(device.call_count(CallKind::ClearUserRestriction), 0);
    assert_eq!(device.call_count(CallKind::StopLockTask), 1);
}

#[test]
fn release_device_owner_failure_returns_false() {
    let device = SimulatedDevice::builder(PACKAGE)
        .device_owner(true)
        .fail_on(CallKind::ClearDeviceOwnerApp)
        .build();
    let controller = controller();

    assert!(!controller.release_device_owner(Some(&device)));
    assert!(controller.query_device_owner(Some(&device)));
}

#[test]
fn release_device_owner_without_service_returns_false() {
    let device = SimulatedDevice::builder(PACKAGE)
        .device_owner(true)
        .policy_service_available(false)
        .build();
    let controller = controller();

    assert!(!controller.release_device_owner(Some(&device)));
}

#[test]
fn lock_task_failure_collapses_to_false() {
    let device = SimulatedDevice::builder(PACKAGE)
        .device_owner(true)
        .fail_on(CallKind::StartLockTask)
        .build();
    let controller = controller();

    assert!(!controller.enter(Some(&device)));
    assert!(!controller.query_active(Some(&device)));

    // The UI side was still applied
    assert_eq!(device.snapshot().ui_flags, SystemUiFlags::KIOSK);
}

#[test]
fn query_failure_reads_as_inactive() {
    let device = SimulatedDevice::builder(PACKAGE).build();
    let controller = controller();
    assert!(controller.enter(Some(&device)));

    device.fail_on(CallKind::LockTaskMode);
    assert!(!controller.query_active(Some(&device)));
    assert!(controller.try_query_active(Some(&device)).is_err());
}
