//! Property tests over arbitrary enter / exit sequences

use kiosk_control::{KioskController, KioskProfile};
use kiosk_platform::sim::SimulatedDevice;
use kiosk_platform::InlineUiThread;
use kiosk_types::{AdminComponent, ComponentName, UserRestriction};
use proptest::prelude::*;
use std::sync::Arc;

const PACKAGE: &str = "com.example.kiosk";

#[derive(Debug, Clone, Copy)]
enum Op {
    Enter,
    Exit,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Enter), Just(Op::Exit)]
}

fn controller() -> KioskController {
    KioskController::new(
        KioskProfile::new(
            AdminComponent::new(PACKAGE, ".KioskAdminReceiver"),
            ComponentName::new(PACKAGE, ".MainActivity"),
        )
        .with_restrictions([UserRestriction::AdjustVolume, UserRestriction::FactoryReset]),
        Arc::new(InlineUiThread),
    )
}

proptest! {
    #[test]
    fn state_follows_last_successful_operation(
        owner in any::<bool>(),
        ops in prop::collection::vec(op(), 1..20),
    ) {
        let device = SimulatedDevice::builder(PACKAGE).device_owner(owner).build();
        let controller = controller();

        for op in ops {
            match op {
                Op::Enter => {
                    prop_assert!(controller.enter(Some(&device)));
                    prop_assert!(controller.query_active(Some(&device)));
                }
                Op::Exit => {
                    prop_assert!(controller.exit(Some(&device)));
                    prop_assert!(!controller.query_active(Some(&device)));
                    // No restriction outlives an exit
                    prop_assert!(device.snapshot().restrictions.is_empty());
                }
            }
        }
    }
}
