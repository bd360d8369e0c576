//! # x86_64 Hardware Abstraction Implementation
//!
//! Implementação concreta mínima da HAL para esta arquitetura. GDT/IDT/APIC
//! e o restante do bring-up de CPU ficam fora de escopo aqui: quem chama
//! `core::entry::kernel_main` assume que o bootloader já deixou a CPU em
//! modo longo com paginação básica ativa.
//!
//! | Módulo    | Responsabilidade |
//! |-----------|-------------------|
//! | `cpu`     | `CpuOps`: halt, cli/sti, leitura de RFLAGS.IF. |
//! | `ports`   | Acesso a IO ports (`inb`/`outb`), usado por serial e pelo disco. |
//! | `memory`  | `invlpg` e reload de CR3 para invalidação de TLB. |

pub mod cpu;
pub mod memory;
pub mod ports;

pub use cpu::X64Cpu as Cpu;
