use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Invalid memory limit: {limit} bytes (must be 257..=65536)")]
    InvalidMemoryLimit { limit: usize },
    #[error("Board memory is {memory} bytes but the processor is configured for {configured}")]
    MemoryMismatch { memory: usize, configured: usize },
    #[error("Memory image of {len} bytes does not fit the {limit} byte limit")]
    ImageTooLarge { len: usize, limit: usize },
    #[error("Invalid clock frequency: {0} MHz")]
    InvalidFrequency(f32),
    #[error("Processor is already running")]
    AlreadyRunning,
    #[error("Registers cannot be modified while the processor is running")]
    Running,
    #[error("Processor has been disposed")]
    Disposed,
    #[error("Failed to spawn execution thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

#[cfg(feature = "config-file")]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ProcessorError),
}
