/// Address of the interrupt request register (IF).
pub const IF_ADDR: u16 = 0xFF0F;

/// Address of the interrupt enable register (IE).
pub const IE_ADDR: u16 = 0xFFFF;

/// Global interrupt-enable state.
///
/// `PendingEnable` models the one-instruction latency of `EI`: the enable
/// only takes effect once the instruction after `EI` has completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterruptState {
    Interruptible,
    #[default]
    Blocked,
    PendingEnable,
}

impl InterruptState {
    /// `DI`: block interrupts immediately.
    #[inline]
    pub fn disable(&mut self) {
        *self = InterruptState::Blocked;
    }

    /// `EI`: enable interrupts once the next instruction completes.
    #[inline]
    pub fn enable_after_next(&mut self) {
        *self = InterruptState::PendingEnable;
    }

    /// `RETI`: enable interrupts with no delay.
    #[inline]
    pub fn enable_now(&mut self) {
        *self = InterruptState::Interruptible;
    }

    /// Advance a pending enable; called once an instruction has completed.
    #[inline]
    pub fn instruction_completed(&mut self) {
        if *self == InterruptState::PendingEnable {
            *self = InterruptState::Interruptible;
        }
    }

    #[inline]
    pub fn is_interruptible(self) -> bool {
        self == InterruptState::Interruptible
    }
}

/// Interrupt sources in priority order, highest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Bit position in IF and IE.
    #[inline]
    pub fn bit(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn mask(self) -> u8 {
        1 << self.bit()
    }

    /// Handler address the CPU jumps to when servicing this interrupt.
    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + 8 * self.bit() as u16
    }

    /// Highest-priority source that is both requested and enabled.
    pub fn highest_pending(if_reg: u8, ie_reg: u8) -> Option<Interrupt> {
        let pending = if_reg & ie_reg & 0x1F;
        Interrupt::ALL
            .into_iter()
            .find(|interrupt| pending & interrupt.mask() != 0)
    }
}
