//! # Dispositivo de Bloco
//!
//! O engine de swap (`crate::mm::swap`) fala com exatamente um drive
//! ATA/IDE primary master via PIO. Não há camada de abstração
//! `BlockDevice`/registro de múltiplos drivers: o contrato exposto é o
//! mesmo conjunto estreito de quatro funções livres que `mm::swap`
//! consome diretamente.

pub mod ata;

pub use ata::{ide_is_ready, ide_read_sector, ide_start_readwrite, ide_write_sector, SECTOR_SIZE};
