//! Graceful shutdown, §4.7/§5: on module unload, send `ServerDisconnect`
//! reliably, wait for its ack, then wait for the transport's disconnected
//! callback. `PreUnload` blocks the main loop's shutdown sequence on this,
//! polling with a short timeout rather than indefinitely.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPhase {
    NotStarted,
    DisconnectSent,
    DisconnectAcked,
    Disconnected,
}

pub struct ShutdownHandshake {
    phase: ShutdownPhase,
}

impl ShutdownHandshake {
    pub fn new() -> Self {
        ShutdownHandshake { phase: ShutdownPhase::NotStarted }
    }

    pub fn phase(&self) -> ShutdownPhase {
        self.phase
    }

    pub fn begin(&mut self) {
        if self.phase == ShutdownPhase::NotStarted {
            self.phase = ShutdownPhase::DisconnectSent;
        }
    }

    pub fn ack_received(&mut self) {
        if self.phase == ShutdownPhase::DisconnectSent {
            self.phase = ShutdownPhase::DisconnectAcked;
        }
    }

    pub fn disconnected_callback_fired(&mut self) {
        if self.phase == ShutdownPhase::DisconnectAcked {
            self.phase = ShutdownPhase::Disconnected;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == ShutdownPhase::Disconnected
    }
}

impl Default for ShutdownHandshake {
    fn default() -> Self {
        Self::new()
    }
}
