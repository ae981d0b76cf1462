use clap::Parser;
use mos6502::{Commodore64Board, Mainboard, ProcessorConfig};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mos6502")]
#[command(about = "Run a raw memory image on a throttled 6502 core")]
struct Args {
    /// Path to the raw memory image (loaded at 0x0000, or 0x0100 if short)
    image_path: PathBuf,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Clock frequency in MHz
    #[arg(short, long)]
    frequency: Option<f32>,

    /// Addressable memory in bytes
    #[arg(short, long)]
    memory_limit: Option<usize>,

    /// How long to run before pausing, in milliseconds
    #[arg(long, default_value_t = 100)]
    run_for: u64,

    /// Pause after the first instruction instead of running freely
    #[arg(long)]
    pause_first: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable per-instruction tracing
    #[arg(long)]
    trace: bool,
}

/// A writer that writes to both stderr and a file
struct DualWriter {
    file: File,
}

impl DualWriter {
    fn new(file: File) -> Self {
        Self { file }
    }
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn init_logging(args: &Args) {
    let log_level = if args.trace {
        log::LevelFilter::Trace
    } else if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log_level);

    if let Some(path) = &args.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(DualWriter::new(file))));
            }
            Err(e) => eprintln!("Warning: Could not create log file: {}", e),
        }
    }

    builder.init();
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    let mut config = ProcessorConfig::load_or_default(args.config.as_deref());
    if let Some(frequency) = args.frequency {
        config.frequency_mhz = frequency;
    }
    if let Some(limit) = args.memory_limit {
        config.memory_limit = limit;
    }

    if args.save_config {
        let path = args.config.clone().unwrap_or_else(ProcessorConfig::config_path);
        match config.save(&path) {
            Ok(()) => println!("Saved configuration to {}", path.display()),
            Err(e) => eprintln!("Error saving configuration: {}", e),
        }
        return;
    }

    let image = match std::fs::read(&args.image_path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error reading image {}: {}", args.image_path.display(), e);
            return;
        }
    };

    let mut board = match Commodore64Board::new(config) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error initializing board: {}", e);
            return;
        }
    };

    if let Err(e) = board.reset(&image) {
        eprintln!("Error loading image: {}", e);
        return;
    }

    if let Err(e) = run(&mut board, &args) {
        eprintln!("Error: {}", e);
    }

    board.processor_mut().dispose();
}

fn run(board: &mut Commodore64Board, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let processor = board.processor_mut();

    if args.pause_first {
        processor.debug_toggle()?;
        processor.start()?;
        if !processor.wait_until_paused(Duration::from_secs(5)) {
            return Err("processor did not pause".into());
        }
    } else {
        processor.start()?;
        std::thread::sleep(Duration::from_millis(args.run_for));
        processor.debug_toggle()?;
    }

    let state = processor.state();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", state);
        let s = state.status;
        println!(
            "C:{} Z:{} I:{} D:{} B:{} V:{} N:{}",
            s.carry as u8,
            s.zero as u8,
            s.interrupt as u8,
            s.decimal_mode as u8,
            s.r#break as u8,
            s.overflow as u8,
            s.negative as u8
        );
        println!(
            "Instructions: {} | Throughput: {:.2} instructions/ms",
            processor.instructions_executed(),
            processor.throughput()
        );
    }
    Ok(())
}
