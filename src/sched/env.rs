//! Campos por-ambiente consumidos por `mm`.

use crate::mm::addr::PhysAddr;
use crate::sync::Spinlock;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identificador de ambiente (kernel ou usuário).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvType {
    Kernel,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStatus {
    Runnable,
    Running,
    Dying,
    NotRunnable,
}

/// Região de memória virtual anônima instalada via `region_alloc`.
#[derive(Debug, Clone, Copy)]
pub struct Vma {
    pub va_start: usize,
    pub len: usize,
    pub perm: u32,
}

/// Um ambiente: espaço de endereçamento mais estado de escalonamento.
///
/// O diretório de páginas (`pgdir`) é o que `mm::vmm::walk` percorre; a
/// lista de VMAs registra o que `region_alloc`/`region_dealloc`
/// instalaram; `mem_lock` é o lock #4 da hierarquia (protege o estado de
/// memória deste ambiente especificamente, abaixo do lock de metadados
/// de swap e acima do lock do alocador de frames).
pub struct Env {
    pub id: EnvId,
    pub env_type: EnvType,
    pub status: EnvStatus,
    pub pgdir: PhysAddr,
    pub vmas: Spinlock<Vec<Vma>>,
    pub mem_lock: Spinlock<()>,
    page_fault_bytes: AtomicU64,
}

impl Env {
    pub fn new(id: EnvId, env_type: EnvType, pgdir: PhysAddr) -> Self {
        Self {
            id,
            env_type,
            status: EnvStatus::NotRunnable,
            pgdir,
            vmas: Spinlock::new(Vec::new()),
            mem_lock: Spinlock::new(()),
            page_fault_bytes: AtomicU64::new(0),
        }
    }

    /// Soma `n` bytes ao contador de page faults deste ambiente.
    pub fn record_page_fault(&self, n: u64) {
        self.page_fault_bytes.fetch_add(n, Ordering::Relaxed);
    }

    /// Subtrai `n` bytes do contador de page faults deste ambiente, saturando
    /// em zero. Chamado por página evictada por swap-out (§4.5), espelhando
    /// `mm_pf_count -= PGSIZE` em `__page_swap_out` no original.
    pub fn record_page_fault_release(&self, n: u64) {
        self.page_fault_bytes.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| Some(cur.saturating_sub(n))).ok();
    }

    pub fn page_fault_bytes(&self) -> u64 {
        self.page_fault_bytes.load(Ordering::Relaxed)
    }
}
