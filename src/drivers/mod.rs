//! # Kernel Driver Layer
//!
//! O módulo `drivers` é a camada que implementa a lógica específica de
//! dispositivos, traduzindo comandos de alto nível do kernel para I/O ports.
//!
//! ## 🏗️ Catálogo de Drivers
//!
//! | Driver    | Responsabilidade |
//! |-----------|-------------------|
//! | `serial`  | Porta Serial (COM1/UART 16550). Saída de logs. |
//! | `block`   | Disco ATA/IDE PIO, colaborador de bloco do engine de swap. |
//!
//! Console gráfico, PIC, PIT e teclado são superfície de um colaborador
//! externo (boot/bring-up) e não moram neste repositório.

pub mod block;
pub mod serial;
