// (FASE2) src/lib.rs
//! Kernel de memória física e paginação sob demanda.
//!
//! Ponto central de exportação dos módulos do Kernel. Scheduler
//! preemptivo, IPC, filesystem, syscalls e segurança de capabilities
//! são superfície de colaboradores externos e não moram neste
//! repositório; `sched` aqui é apenas a fachada mínima (registro de
//! ambientes, lista de execução, primitivas de yield) que o gerenciador
//! de memória chama.

#![no_std]
#![feature(abi_x86_interrupt)]
#![feature(alloc_error_handler)]
#![feature(const_mut_refs)]
#![feature(naked_functions)]
#![feature(panic_info_message)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Módulos de Baixo Nível (Hardware) ---
pub mod arch; // HAL (CPU)
pub mod drivers; // Drivers Específicos (Serial, Disco)

// --- Módulos Centrais (Lógica do Kernel) ---
pub mod core; // Inicialização, Panic, Handoff
pub mod klib; // Utilitários Internos (Bitmaps, Listas, Self-test)
pub mod mm; // Gerenciamento de Memória (PMM, VMM, rmap, swap)
pub mod sched; // Fachada de ambientes/execução (sem algoritmo de escalonamento)
pub mod sync; // Primitivas de Sincronização (Spinlock IRQ-safe)

// Re-exportar BootInfo para acesso fácil no binário
pub use crate::core::handoff::BootInfo;
