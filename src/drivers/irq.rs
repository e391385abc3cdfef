//! Interrupt enable and dispatch
//!
//! The core runs single-threaded with one global interrupt-enable mask set at
//! boot. Handlers here can preempt the foreground loop at any instruction
//! boundary; everything they share with it follows a single-writer-per-value
//! discipline (the DMA handler only ever writes 1 to the completion counter,
//! the foreground path only zeroes it before arming).

use super::net::dma::{DMA_BASE, DmaEngine};
use super::net::regfile::Mmio;
use core::sync::atomic::{AtomicU32, Ordering};

/// Timer interrupt tick count.
///
/// Written only from the timer handler, read anywhere. The Cv32e40p has no A
/// extension, so this stays load/store only - safe under the single-writer
/// rule.
pub static TIMER_TICKS: AtomicU32 = AtomicU32::new(0);

/// Enable all machine interrupts: full `mie` mask, then `mstatus.MIE`.
pub fn irq_init() {
    #[cfg(target_arch = "riscv32")]
    // SAFETY: writes machine CSRs during single-threaded bring-up.
    unsafe {
        core::arch::asm!("csrw mie, {0}", in(reg) 0xFFFF_FFFFu32);
        core::arch::asm!("csrsi mstatus, 8");
    }
}

/// DMA interrupt handler: drain the event queue, crediting receive
/// completions to the completion counter the foreground wait polls.
///
/// Uses its own register file over the NIC block; it touches only the
/// interrupt queue (which the foreground never reads) and the completion
/// counter (which it only sets).
pub fn dma_irq_handler() {
    let mut dma = DmaEngine::new(Mmio::new(DMA_BASE));
    dma.drain_irq_events();
}

/// UART interrupt handler: echo pending input characters.
///
/// The preempted foreground may already hold the writer inside a print;
/// taking the lock here would spin on a guard the handler's own core holds
/// and can never release. Back off instead; the pending characters stay in
/// the hardware and the next interrupt echoes them.
pub fn uart_irq_handler() {
    let Some(mut uart) = super::uart::WRITER.try_lock() else {
        return;
    };
    while let Some(byte) = uart.read_byte() {
        uart.write_byte(byte);
    }
}

/// Timer interrupt handler: advance the tick counter.
pub fn timer_irq_handler() {
    let ticks = TIMER_TICKS.load(Ordering::Relaxed);
    TIMER_TICKS.store(ticks.wrapping_add(1), Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    // A UART interrupt landing while the foreground holds the console writer
    // (mid-print) must return without blocking; spinning on the held lock
    // would hang the single core forever.
    #[test]
    fn uart_handler_backs_off_when_writer_is_held() {
        let _foreground_print = crate::drivers::uart::WRITER.lock();
        uart_irq_handler();
    }

    #[test]
    fn timer_handler_advances_tick_counter() {
        let before = TIMER_TICKS.load(Ordering::Relaxed);
        timer_irq_handler();
        assert_eq!(TIMER_TICKS.load(Ordering::Relaxed), before.wrapping_add(1));
    }
}
