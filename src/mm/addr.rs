//! Endereços físicos e virtuais, tipados para não misturar os dois por
//! engano na borda entre `pmm`/`vmm` e o restante do kernel.
//!
//! O binário roda em x86_64 (boot/HAL do teacher), mas o espaço de
//! endereçamento que `mm` modela é o de dois níveis do layout em
//! [`crate::mm::config`] (diretório + tabela de 1024 entradas, frames de
//! 4 KiB/4 MiB) — por isso os dois newtypes carregam `usize` em vez de
//! `u64`, e só viram `u64` na borda que fala com `arch::x86_64::memory`
//! (`invlpg`, `write_cr3`).

use core::fmt;
use core::ops::{Add, Sub};

use crate::mm::config::PGSIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PhysAddr(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtAddr(pub usize);

macro_rules! impl_addr {
    ($ty:ident) => {
        impl $ty {
            pub const fn new(addr: usize) -> Self {
                Self(addr)
            }

            pub const fn as_usize(self) -> usize {
                self.0
            }

            pub const fn as_u64(self) -> u64 {
                self.0 as u64
            }

            pub const fn is_page_aligned(self) -> bool {
                crate::mm::config::is_page_aligned(self.0)
            }

            pub const fn page_align_down(self) -> Self {
                Self(crate::mm::config::page_align_down(self.0))
            }

            pub const fn page_align_up(self) -> Self {
                Self(crate::mm::config::page_align_up(self.0))
            }

            /// Número sequencial do frame de 4 KiB que contém este endereço.
            pub const fn frame_number(self) -> usize {
                self.0 / PGSIZE
            }
        }

        impl fmt::LowerHex for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::LowerHex::fmt(&self.0, f)
            }
        }

        impl Add<usize> for $ty {
            type Output = Self;
            fn add(self, rhs: usize) -> Self {
                Self(self.0 + rhs)
            }
        }

        impl Sub<usize> for $ty {
            type Output = Self;
            fn sub(self, rhs: usize) -> Self {
                Self(self.0 - rhs)
            }
        }

        impl Sub for $ty {
            type Output = usize;
            fn sub(self, rhs: Self) -> usize {
                self.0 - rhs.0
            }
        }
    };
}

impl_addr!(PhysAddr);
impl_addr!(VirtAddr);

impl PhysAddr {
    /// Número de frame a partir do início do espaço físico gerenciado,
    /// usado para indexar a tabela de descritores em `pmm`.
    pub const fn pgnum(self) -> usize {
        crate::mm::config::pgnum(self.0)
    }

    pub const fn from_pgnum(n: usize) -> Self {
        Self(n * PGSIZE)
    }
}
