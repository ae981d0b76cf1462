//! Start / pause / reset / dispose behaviour of the execution stream.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use mos6502::instructions::{INS_LDA_I, INS_LDX_I, INS_LDY_I};
use mos6502::memory;
use mos6502::{
    Commodore64Board, CpuState, InstructionCore, Mainboard, Memory, Mos6502, ProcessorConfig,
    ProcessorError,
};

const WAIT: Duration = Duration::from_secs(5);

fn board() -> Commodore64Board {
    Commodore64Board::new(ProcessorConfig::default()).unwrap()
}

#[test]
fn reset_is_idempotent() {
    let image = [INS_LDA_I, 0x10, INS_LDX_I, 0x20];
    let mut board = board();

    board.reset(&image).unwrap();
    let first = board.processor().state();
    let first_memory = memory::lock(board.memory()).as_slice().to_vec();

    board.reset(&image).unwrap();
    assert_eq!(board.processor().state(), first);
    assert_eq!(memory::lock(board.memory()).as_slice(), &first_memory[..]);
}

#[test]
fn reset_after_execution_restores_defaults() {
    let image = [INS_LDA_I, 0x80];
    let mut board = board();
    board.reset(&image).unwrap();
    let fresh = board.processor().state();

    let processor = board.processor_mut();
    processor.debug_toggle().unwrap();
    processor.start().unwrap();
    assert!(processor.wait_until_paused(WAIT));
    assert_ne!(processor.state(), fresh);

    board.reset(&image).unwrap();
    let processor = board.processor();
    assert_eq!(processor.state(), fresh);
    assert!(!processor.is_running());
    assert!(!processor.is_paused());
}

#[test]
fn padding_law() {
    let limit = 0x2000;
    let mut board = Commodore64Board::new(ProcessorConfig {
        memory_limit: limit,
        ..ProcessorConfig::default()
    })
    .unwrap();

    let image: Vec<u8> = (1..=200).collect();
    board.reset(&image).unwrap();

    let memory = memory::lock(board.memory());
    assert_eq!(memory.limit(), limit);
    for (addr, &byte) in memory.iter().enumerate() {
        let expected = if (0x100..0x100 + image.len()).contains(&addr) {
            image[addr - 0x100]
        } else {
            0
        };
        assert_eq!(byte, expected, "byte at {:#06X}", addr);
    }
}

#[test]
fn oversized_image_is_a_configuration_error() {
    let mut board = Commodore64Board::new(ProcessorConfig {
        memory_limit: 0x400,
        ..ProcessorConfig::default()
    })
    .unwrap();
    let err = board.reset(&[0u8; 0x401]).unwrap_err();
    assert!(matches!(
        err,
        ProcessorError::ImageTooLarge {
            len: 0x401,
            limit: 0x400
        }
    ));
}

/// State a standalone core reaches after `steps` instructions over `image`.
fn stepped(image: &[u8], steps: u64) -> CpuState {
    let mut memory = Memory::new(ProcessorConfig::default().memory_limit).unwrap();
    memory.load_image(image).unwrap();
    let mut cpu = Mos6502::new();
    for _ in 0..steps {
        cpu.execute(&mut memory);
    }
    cpu.snapshot()
}

#[test]
fn pause_resume_round_trip() {
    // Every instruction leaves a distinct trace, so a replayed or skipped
    // instruction shows up as a state mismatch.
    let image = [INS_LDX_I, 0x20, INS_LDA_I, 0x10, INS_LDX_I, 0x30, INS_LDY_I, 0x40];
    let mut board = board();
    board.reset(&image).unwrap();

    let processor = board.processor_mut();
    processor.debug_toggle().unwrap();
    processor.start().unwrap();
    assert!(processor.wait_until_paused(WAIT));

    // Parked after exactly one instruction, and it stays parked.
    assert_eq!(processor.instructions_executed(), 1);
    assert_eq!(processor.state(), stepped(&image, 1));
    thread::sleep(Duration::from_millis(20));
    assert_eq!(processor.instructions_executed(), 1);
    assert_eq!(processor.pc(), 0x0102);

    // Resume, then pause again somewhere further on.
    assert!(!processor.debug_toggle().unwrap());
    assert!(processor.debug_toggle().unwrap());
    assert!(processor.is_paused());
    let executed = processor.instructions_executed();
    assert!(executed >= 2);
    assert_eq!(processor.state(), stepped(&image, executed));

    processor.dispose();
}

#[test]
fn registers_readable_while_board_holds_memory() {
    let mut board = Commodore64Board::new(ProcessorConfig {
        frequency_mhz: 1000.0,
        ..ProcessorConfig::default()
    })
    .unwrap();
    board.reset(&[INS_LDA_I, 0x01]).unwrap();
    board.processor_mut().start().unwrap();

    let (done, finished) = mpsc::channel();
    let reader = thread::spawn(move || {
        for _ in 0..20 {
            let memory = memory::lock(board.memory());
            thread::sleep(Duration::from_millis(2));
            let _ = board.processor().pc();
            let _ = board.processor().state();
            drop(memory);
        }
        board.processor_mut().dispose();
        let _ = done.send(());
    });

    assert!(
        finished.recv_timeout(Duration::from_secs(10)).is_ok(),
        "register read blocked while memory was held"
    );
    reader.join().unwrap();
}

#[test]
fn dispose_never_started_does_not_block() {
    let mut board = board();
    let started = Instant::now();
    board.processor_mut().dispose();
    board.processor_mut().dispose();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(board.processor().is_disposed());
}

#[test]
fn dispose_while_paused_terminates() {
    let mut board = board();
    board.reset(&[INS_LDA_I, 0x01]).unwrap();
    let processor = board.processor_mut();
    processor.debug_toggle().unwrap();
    processor.start().unwrap();
    assert!(processor.wait_until_paused(WAIT));

    processor.dispose();
    assert!(!processor.is_running());
    assert!(!processor.is_paused());
    assert!(matches!(processor.start(), Err(ProcessorError::Disposed)));
}

#[test]
fn dispose_while_running_terminates() {
    let mut board = Commodore64Board::new(ProcessorConfig {
        // one instruction per millisecond
        frequency_mhz: 0.001,
        ..ProcessorConfig::default()
    })
    .unwrap();
    board.reset(&[]).unwrap();

    let processor = board.processor_mut();
    processor.start().unwrap();
    thread::sleep(Duration::from_millis(10));
    processor.dispose();
    assert!(!processor.is_running());
}

#[test]
fn reset_while_running_stops_the_stream_first() {
    let mut board = board();
    board.reset(&[]).unwrap();
    board.processor_mut().start().unwrap();
    thread::sleep(Duration::from_millis(5));

    board.reset(&[INS_LDA_I, 0x42]).unwrap();
    let processor = board.processor_mut();
    assert!(!processor.is_running());
    assert_eq!(processor.pc(), 0x0100);
    assert_eq!(processor.instructions_executed(), 0);

    // The processor can be started again after the reset.
    processor.debug_toggle().unwrap();
    processor.start().unwrap();
    assert!(processor.wait_until_paused(WAIT));
    assert_eq!(processor.a(), 0x42);
}

#[test]
fn second_start_is_rejected() {
    let mut board = board();
    board.reset(&[]).unwrap();
    let processor = board.processor_mut();
    processor.start().unwrap();
    assert!(matches!(processor.start(), Err(ProcessorError::AlreadyRunning)));
    assert!(processor.is_running());
}

#[test]
fn throttled_stream_reports_throughput() {
    let mut board = Commodore64Board::new(ProcessorConfig {
        frequency_mhz: 0.01,
        ..ProcessorConfig::default()
    })
    .unwrap();
    board.reset(&[]).unwrap();
    let processor = board.processor_mut();
    processor.start().unwrap();
    thread::sleep(Duration::from_millis(50));
    processor.debug_toggle().unwrap();

    // 100 us per instruction caps the rate at ten per millisecond.
    let rate = processor.throughput();
    assert!(rate > 0.0);
    assert!(rate <= 10.5, "throughput {} exceeds the clock", rate);
    assert!(processor.instructions_executed() <= 600);
}
