use typed_builder::TypedBuilder;

use crate::interrupts::InterruptState;

/// Register file the CPU starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartState {
    /// Everything zeroed with PC at 0x0000, so the boot program runs.
    #[default]
    Boot,
    /// The state the boot program leaves behind, with PC at 0x0100.
    PostBoot,
}

/// Construction options for [`Cpu`](crate::Cpu).
#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct CpuConfig {
    #[builder(default)]
    pub start: StartState,
    #[builder(default = InterruptState::Blocked)]
    pub interrupts: InterruptState,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
