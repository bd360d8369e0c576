//! Implementação x86_64 das operações de CPU (HAL).
//!
//! Apenas as primitivas que o resto do kernel realmente chama: halt,
//! cli/sti e leitura de RFLAGS.IF. CPU bring-up (GDT, IDT, APIC, SMP) é
//! responsabilidade de um colaborador externo e não mora aqui.

use crate::arch::traits::cpu::CpuOps;
use core::arch::asm;

pub struct X64Cpu;

impl CpuOps for X64Cpu {
    #[inline]
    fn halt() {
        unsafe {
            asm!("hlt", options(nomem, nostack, preserves_flags));
        }
    }

    /// # Safety
    /// Requer privilégio de kernel.
    #[inline]
    unsafe fn disable_interrupts() {
        asm!("cli", options(nomem, nostack, preserves_flags));
    }

    /// # Safety
    /// Requer privilégio de kernel; pode causar preempção imediata.
    #[inline]
    unsafe fn enable_interrupts() {
        asm!("sti", options(nomem, nostack, preserves_flags));
    }

    #[inline]
    fn interrupts_enabled() -> bool {
        let rflags: u64;
        unsafe {
            asm!("pushfq; pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        (rflags & (1 << 9)) != 0
    }
}
