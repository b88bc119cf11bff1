//! Host-to-engine event surface.
//!
//! Instead of reaching into the host's scene and battle internals, the
//! engine is notified of the moments it cares about through
//! [`StageSignal`]s. The host forwards them from its own lifecycle hooks;
//! anything implementing [`SignalHandler`] can consume them.

mod signal;

pub use signal::StageSignal;

/// Consumer of [`StageSignal`]s.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: &StageSignal);

    fn handle_signals(&mut self, signals: &[StageSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}
