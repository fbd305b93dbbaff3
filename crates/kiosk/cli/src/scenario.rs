//! Scenarios run against a simulated device

use crate::error::{CliError, CliResult};
use clap::{Args, Subcommand, ValueEnum};
use kiosk_bridge::{ForegroundActivity, KioskBridge, KioskBridgeBuilder, KioskConfig, Promise};
use kiosk_platform::sim::{CallKind, DeviceSnapshot, PlatformCall, SimulatedDevice};
use kiosk_platform::{ChannelUiThread, InlineUiThread, UiLoop, UiThread};
use kiosk_relay::{MemorySink, RelayStats};
use kiosk_types::KioskState;
use serde::Serialize;
use std::sync::Arc;

/// Scenario subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Scenario {
    /// Start lock task
    Enter,

    /// Stop lock task
    Exit,

    /// Start then stop lock task
    Cycle,

    /// Give up device-owner status
    Release,

    /// Report state without changing anything
    Status,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Enter => "enter",
            Scenario::Exit => "exit",
            Scenario::Cycle => "cycle",
            Scenario::Release => "release",
            Scenario::Status => "status",
        }
    }
}

/// How UI mutations reach the simulated window
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum UiMode {
    /// Run on the calling thread
    #[default]
    Inline,
    /// Queue and drain after each step
    Queued,
}

/// Simulated device setup
#[derive(Debug, Clone, Args)]
pub struct DeviceArgs {
    /// Start as device owner
    #[arg(long)]
    pub device_owner: bool,

    /// Platform API level
    #[arg(long, default_value_t = 33)]
    pub sdk: u32,

    /// Make the device-policy service unavailable
    #[arg(long)]
    pub no_policy_service: bool,

    /// Run without an attached window
    #[arg(long)]
    pub no_window: bool,

    /// Fail every platform call of this kind (repeatable)
    #[arg(long = "fail", value_name = "CALL", value_parser = parse_call_kind)]
    pub faults: Vec<CallKind>,

    /// UI dispatch mode
    #[arg(long, value_enum, default_value_t = UiMode::Inline)]
    pub ui: UiMode,
}

fn parse_call_kind(name: &str) -> Result<CallKind, String> {
    CallKind::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = kiosk_platform::sim::ALL_CALL_KINDS
            .iter()
            .map(|kind| kind.name())
            .collect();
        format!("unknown call '{}', expected one of: {}", name, known.join(", "))
    })
}

/// Outcome of one bridge operation
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub operation: &'static str,
    /// Returned value, for operations that return one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,
    /// Lock task state right after the operation
    pub active: bool,
}

/// Everything a scenario run observed
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub scenario: &'static str,
    pub state: KioskState,
    pub device_owner: bool,
    pub steps: Vec<Step>,
    pub device: DeviceSnapshot,
    pub calls: Vec<PlatformCall>,
    pub events: Vec<&'static str>,
    pub relay: RelayStats,
}

/// A bridge wired to a fresh simulated device
pub struct Harness {
    bridge: KioskBridge,
    device: SimulatedDevice,
    sink: Arc<MemorySink>,
    ui_loop: Option<UiLoop>,
}

impl Harness {
    pub fn new(config: &KioskConfig, args: &DeviceArgs) -> CliResult<Self> {
        let mut builder = SimulatedDevice::builder(config.admin.package.clone())
            .sdk_level(args.sdk)
            .device_owner(args.device_owner)
            .policy_service_available(!args.no_policy_service)
            .window(!args.no_window);
        for kind in &args.faults {
            builder = builder.fail_on(*kind);
        }
        let device = builder.build();

        let (ui, ui_loop): (Arc<dyn UiThread>, Option<UiLoop>) = match args.ui {
            UiMode::Inline => (Arc::new(InlineUiThread), None),
            UiMode::Queued => {
                let (ui, ui_loop) = ChannelUiThread::new();
                (Arc::new(ui), Some(ui_loop))
            }
        };

        let sink = Arc::new(MemorySink::new());
        let bridge = KioskBridgeBuilder::from_config(config)
            .with_ui_thread(ui)
            .with_activity_provider(Arc::new(ForegroundActivity::with(Arc::new(device.clone()))))
            .with_sink(sink.clone())
            .build()?;
        device.register_admin_receiver(bridge.relay.clone());

        tracing::debug!(device = ?device, "Simulated device ready");

        Ok(Self {
            bridge,
            device,
            sink,
            ui_loop,
        })
    }

    pub async fn run(mut self, scenario: Scenario) -> CliResult<Report> {
        let mut steps = Vec::new();
        match scenario {
            Scenario::Enter => steps.push(self.start().await?),
            Scenario::Exit => steps.push(self.stop().await?),
            Scenario::Cycle => {
                steps.push(self.start().await?);
                steps.push(self.stop().await?);
            }
            Scenario::Release => {
                let released = self.bridge.module.clear_device_owner();
                steps.push(self.step("clear_device_owner", Some(released)).await?);
            }
            Scenario::Status => {}
        }

        let device_owner = self.is_device_owner().await?;
        let active = self.is_active().await?;
        tracing::info!(scenario = scenario.name(), active, device_owner, "Scenario finished");

        Ok(Report {
            scenario: scenario.name(),
            state: KioskState::from(active),
            device_owner,
            steps,
            device: self.device.snapshot(),
            calls: self.device.calls(),
            events: self.sink.events().iter().map(|event| event.name()).collect(),
            relay: self.bridge.relay.stats(),
        })
    }

    async fn start(&mut self) -> CliResult<Step> {
        self.bridge.module.start_lock_task();
        self.step("start_lock_task", None).await
    }

    async fn stop(&mut self) -> CliResult<Step> {
        self.bridge.module.stop_lock_task();
        self.step("stop_lock_task", None).await
    }

    async fn step(&mut self, operation: &'static str, result: Option<bool>) -> CliResult<Step> {
        if let Some(ui_loop) = &mut self.ui_loop {
            let ran = ui_loop.run_pending();
            tracing::debug!(operation, ran, "Drained UI tasks");
        }
        let active = self.is_active().await?;
        Ok(Step {
            operation,
            result,
            active,
        })
    }

    async fn is_active(&self) -> CliResult<bool> {
        let (promise, pending) = Promise::channel();
        self.bridge.module.is_lock_task_active(promise);
        pending
            .await
            .map_err(|_| CliError::Unanswered("is_lock_task_active"))
    }

    async fn is_device_owner(&self) -> CliResult<bool> {
        let (promise, pending) = Promise::channel();
        self.bridge.module.is_device_owner(promise);
        pending
            .await
            .map_err(|_| CliError::Unanswered("is_device_owner"))
    }
}
