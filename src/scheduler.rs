//! Execution stream
//!
//! One worker thread per running processor. Each turn executes a single
//! instruction, parks while a debug pause is requested, then waits out the
//! rest of the instruction budget so the host CPU is not spun at native speed.
//! Both waits sit on the same condition variable as cancellation, so `dispose`
//! and `reset` can always interrupt them.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::cpu::InstructionCore;
use crate::memory::{self, SharedMemory};

/// Lifecycle flags shared between the caller and the execution stream.
#[derive(Debug, Default)]
pub(crate) struct Control {
    /// Caller wants the stream parked at the next instruction boundary.
    pub debug_requested: bool,
    /// Stream is parked. Only the stream sets or clears this.
    pub paused: bool,
    /// Stream must exit at its next check.
    pub cancelled: bool,
    /// A stream is live.
    pub running: bool,
    /// Realized instructions per millisecond over the last unpaused turn.
    pub instructions_per_ms: f64,
    /// Instructions executed since the stream was started.
    pub executed: u64,
}

pub(crate) struct Shared<C> {
    core: Mutex<C>,
    control: Mutex<Control>,
    signal: Condvar,
}

impl<C: InstructionCore> Shared<C> {
    pub fn new(core: C) -> Self {
        Self {
            core: Mutex::new(core),
            control: Mutex::new(Control::default()),
            signal: Condvar::new(),
        }
    }

    pub fn core(&self) -> MutexGuard<'_, C> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notify(&self) {
        self.signal.notify_all();
    }

    /// Block while `condition` holds.
    pub fn wait_while<'a>(
        &self,
        guard: MutexGuard<'a, Control>,
        condition: impl FnMut(&mut Control) -> bool,
    ) -> MutexGuard<'a, Control> {
        self.signal
            .wait_while(guard, condition)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Block while `condition` holds, for at most `timeout`.
    pub fn wait_timeout_while<'a>(
        &self,
        guard: MutexGuard<'a, Control>,
        timeout: Duration,
        condition: impl FnMut(&mut Control) -> bool,
    ) -> MutexGuard<'a, Control> {
        match self.signal.wait_timeout_while(guard, timeout, condition) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        }
    }
}

/// Body of the execution thread.
pub(crate) fn run<C: InstructionCore>(
    shared: Arc<Shared<C>>,
    memory: SharedMemory,
    budget: Duration,
) {
    debug!("Execution stream started ({:?} per instruction)", budget);

    loop {
        if shared.control().cancelled {
            break;
        }

        let started = Instant::now();
        {
            // Memory before core, the order board-side code nests them in.
            let mut memory = memory::lock(&memory);
            let mut core = shared.core();
            core.execute(&mut *memory);
        }
        let executed = started.elapsed();

        let mut control = shared.control();
        control.executed += 1;
        shared.notify();

        if control.debug_requested {
            control.paused = true;
            shared.notify();
            debug!(
                "Paused after {} instructions ({:.1} instructions/ms)",
                control.executed, control.instructions_per_ms
            );

            control = shared.wait_while(control, |c| c.debug_requested && !c.cancelled);

            control.paused = false;
            if control.cancelled {
                control.debug_requested = false;
                break;
            }
            shared.notify();
            debug!("Resumed");
            continue;
        }

        if executed < budget {
            control = shared.wait_timeout_while(control, budget - executed, |c| !c.cancelled);
            if control.cancelled {
                break;
            }
        }

        let turn = started.elapsed().as_secs_f64() * 1000.0;
        if turn > 0.0 {
            control.instructions_per_ms = 1.0 / turn;
        }
        trace!("Turn took {:.6} ms", turn);
    }

    let mut control = shared.control();
    control.running = false;
    control.paused = false;
    shared.notify();
    debug!("Execution stream stopped after {} instructions", control.executed);
}
