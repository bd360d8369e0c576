//! # Core — Núcleo do Kernel
//!
//! Infraestrutura central agnóstica de hardware.
//!
//! ## Subsistemas
//!
//! | Módulo     | Responsabilidade                                |
//! |------------|--------------------------------------------------|
//! | `entry`    | `kernel_main`, orquestra o boot                  |
//! | `handoff`  | ABI de handoff bootloader -> kernel              |
//! | `logging`  | Macros `k*!` sobre a serial                      |
//! | `panic`    | Panic handler                                    |
//! | `test`     | Agregador dos self-tests (`feature = "self_test"`)|

pub mod entry;
pub mod handoff;
pub mod logging;
pub mod panic;
pub mod test;

pub use entry::kernel_main;
pub use handoff::BootInfo;
