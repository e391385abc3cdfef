//! NanoCore console UART
//!
//! Two 32-bit registers: a read port that returns the empty sentinel
//! `0x8000_0000` when no character is pending (low byte otherwise), and a
//! write port that accepts one character per store. No baud/line setup is
//! required; the hardware is ready at reset.

use core::fmt;
use lazy_static::lazy_static;
use spin::Mutex;
use volatile::Volatile;

/// NanoCore UART base address
const UART_BASE: usize = 0x1001_0000;

/// Read port value meaning "no character pending"
const UART_RD_EMPTY: u32 = 0x8000_0000;

lazy_static! {
    pub static ref WRITER: Mutex<UartWriter> = Mutex::new(UartWriter::new());
}

/// NanoCore UART register layout
#[repr(C)]
struct UartRegisters {
    rd: Volatile<u32>, // 0x00 - read port (empty sentinel or character)
    wr: Volatile<u32>, // 0x04 - write port
}

/// UART writer for serial console output
pub struct UartWriter {
    registers: &'static mut UartRegisters,
    initialized: bool,
}

impl UartWriter {
    /// Create a new UART writer instance
    pub const fn new() -> Self {
        UartWriter {
            registers: unsafe { &mut *(UART_BASE as *mut UartRegisters) },
            initialized: false,
        }
    }

    /// Mark the UART ready. The hardware needs no configuration; this exists
    /// so bring-up order reads the same as for configurable consoles.
    pub fn init(&mut self) {
        self.initialized = true;
    }

    /// Write a single byte to the UART
    pub fn write_byte(&mut self, byte: u8) {
        if !self.initialized {
            self.init();
        }
        self.registers.wr.write(byte as u32);
    }

    /// Read one pending byte, if any. Non-blocking.
    pub fn read_byte(&mut self) -> Option<u8> {
        let word = self.registers.rd.read();
        if word == UART_RD_EMPTY {
            None
        } else {
            Some((word & 0xFF) as u8)
        }
    }

    /// Write a string to the UART
    pub fn write_string(&mut self, s: &str) {
        for byte in s.bytes() {
            // Convert newline to carriage return + newline
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
    }
}

impl fmt::Write for UartWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s);
        Ok(())
    }
}
