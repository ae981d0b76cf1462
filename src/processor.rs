use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::ProcessorConfig;
use crate::cpu::{CpuState, InstructionCore, Mos6502};
use crate::error::ProcessorError;
use crate::instructions::InstructionDetail;
use crate::memory::{self, SharedMemory};
use crate::registers::Registers;
use crate::scheduler::{self, Shared};
use crate::status::Status;

/// A processor core plus the execution stream that drives it.
///
/// Lifecycle: `Stopped -> Running <-> Paused -> Stopped`, terminal once
/// disposed. The core is only mutated by the execution stream while one is
/// live; callers observe it between instructions.
pub struct Processor<C: InstructionCore> {
    config: ProcessorConfig,
    memory: Option<SharedMemory>,
    shared: Arc<Shared<C>>,
    worker: Option<JoinHandle<()>>,
    disposed: bool,
}

impl<C: InstructionCore> Processor<C> {
    /// Wrap `core` around the board-owned `memory`.
    pub fn new(
        mut core: C,
        memory: SharedMemory,
        config: ProcessorConfig,
    ) -> Result<Self, ProcessorError> {
        config.validate()?;
        let size = memory::lock(&memory).limit();
        if size != config.memory_limit {
            return Err(ProcessorError::MemoryMismatch {
                memory: size,
                configured: config.memory_limit,
            });
        }

        core.reset();
        Ok(Self {
            config,
            memory: Some(memory),
            shared: Arc::new(Shared::new(core)),
            worker: None,
            disposed: false,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn memory_limit(&self) -> usize {
        self.config.memory_limit
    }

    /// Stop any running stream, restore power-on state and install `image`.
    ///
    /// The image is validated before anything is touched, so a rejected
    /// image leaves memory as it was.
    pub fn reset(&mut self, image: &[u8]) -> Result<(), ProcessorError> {
        let memory = self.memory.clone().ok_or(ProcessorError::Disposed)?;
        memory::image_offset(image.len(), self.config.memory_limit)?;

        self.stop_worker();
        memory::lock(&memory).load_image(image)?;
        self.shared.core().reset();
        *self.shared.control() = Default::default();

        info!("Processor reset with {} byte image", image.len());
        Ok(())
    }

    /// Launch the execution stream. Returns once the thread is running.
    ///
    /// A second `start` while a stream is live is rejected; `reset` first.
    pub fn start(&mut self) -> Result<(), ProcessorError> {
        let memory = self.memory.clone().ok_or(ProcessorError::Disposed)?;
        if self.is_running() {
            return Err(ProcessorError::AlreadyRunning);
        }
        // A stream that exited on its own still needs joining.
        self.stop_worker();

        {
            let mut control = self.shared.control();
            control.running = true;
            control.cancelled = false;
            control.executed = 0;
        }

        let shared = Arc::clone(&self.shared);
        let budget = self.config.instruction_budget();
        let spawned = thread::Builder::new()
            .name("mos6502-exec".to_string())
            .spawn(move || scheduler::run(shared, memory, budget));

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                info!(
                    "Processor started at {} MHz ({:?} per instruction)",
                    self.config.frequency_mhz, budget
                );
                Ok(())
            }
            Err(e) => {
                self.shared.control().running = false;
                Err(ProcessorError::WorkerSpawn(e))
            }
        }
    }

    /// Flip the pause request.
    ///
    /// With a live stream this blocks until the stream has parked (or
    /// resumed) accordingly. Returns whether the processor is now paused.
    pub fn debug_toggle(&self) -> Result<bool, ProcessorError> {
        if self.disposed {
            return Err(ProcessorError::Disposed);
        }

        let mut control = self.shared.control();
        control.debug_requested = !control.debug_requested;
        let target = control.debug_requested;
        debug!("Debug toggled: pause {}", if target { "requested" } else { "released" });
        self.shared.notify();

        if control.running {
            control = self.shared.wait_while(control, |c| {
                c.running && !c.cancelled && c.debug_requested == target && c.paused != target
            });
        }
        Ok(control.paused)
    }

    /// Wait up to `timeout` for the stream to park. Returns whether it did.
    pub fn wait_until_paused(&self, timeout: Duration) -> bool {
        let control = self.shared.control();
        let control = self
            .shared
            .wait_timeout_while(control, timeout, |c| c.running && !c.paused);
        control.paused
    }

    /// Cancel the stream, wait for it to exit and release memory.
    /// Safe to call any number of times.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop_worker();
        self.memory = None;
        self.disposed = true;
        info!("Processor disposed");
    }

    pub fn is_running(&self) -> bool {
        self.shared.control().running
    }

    pub fn is_paused(&self) -> bool {
        self.shared.control().paused
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Realized instructions per millisecond.
    pub fn throughput(&self) -> f64 {
        self.shared.control().instructions_per_ms
    }

    /// Instructions executed by the current (or last) stream.
    pub fn instructions_executed(&self) -> u64 {
        self.shared.control().executed
    }

    pub fn cycles(&self) -> u8 {
        self.shared.core().cycles()
    }

    pub fn snapshot(&self) -> C::Snapshot {
        self.shared.core().snapshot()
    }

    pub fn instruction_set(&self) -> &'static [InstructionDetail] {
        self.shared.core().instruction_set()
    }

    /// Read the core under its lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.shared.core())
    }

    /// Mutate the core, e.g. to seed registers before `start`.
    ///
    /// Only allowed while no stream is executing: stopped, or parked.
    pub fn modify<R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R, ProcessorError> {
        if self.disposed {
            return Err(ProcessorError::Disposed);
        }
        let control = self.shared.control();
        if control.running && !control.paused {
            return Err(ProcessorError::Running);
        }
        let mut core = self.shared.core();
        Ok(f(&mut core))
    }

    fn stop_worker(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };

        self.shared.control().cancelled = true;
        self.shared.notify();

        if handle.join().is_err() {
            warn!("Execution stream panicked");
            self.shared.control().running = false;
        }
        let mut control = self.shared.control();
        control.cancelled = false;
        control.paused = false;
    }
}

/// Register and flag accessors for the 6502 core.
impl Processor<Mos6502> {
    pub fn state(&self) -> CpuState {
        self.snapshot()
    }

    pub fn registers(&self) -> Registers {
        self.shared.core().regs
    }

    pub fn status(&self) -> Status {
        self.shared.core().status
    }

    pub fn pc(&self) -> u16 {
        self.shared.core().regs.pc
    }

    pub fn sp(&self) -> u16 {
        self.shared.core().regs.sp
    }

    pub fn a(&self) -> u8 {
        self.shared.core().regs.a
    }

    pub fn x(&self) -> u8 {
        self.shared.core().regs.x
    }

    pub fn y(&self) -> u8 {
        self.shared.core().regs.y
    }
}

impl<C: InstructionCore> Drop for Processor<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}
