//! # Gerenciador de Memória Física e Paginação sob Demanda
//!
//! | Módulo     | Responsabilidade                                          |
//! |------------|------------------------------------------------------------|
//! | `config`   | Layout de memória e bits de PTE                             |
//! | `error`    | `MmError`/`MmResult` (§7)                                   |
//! | `addr`     | `PhysAddr`/`VirtAddr` tipados                               |
//! | `pmm`      | Alocador de frames (4 KiB/4 MiB), free-list, envelhecimento |
//! | `vmm`      | Mapeador de dois níveis, VMAs, checagem de acesso           |
//! | `rmap`     | Mapa reverso frame -> (ambiente, va)                        |
//! | `swap`     | Tabela de slots de disco e fila de jobs                     |
//! | `reclaim`  | Política de relógio e reclaim direto/síncrono               |
//! | `kswapd`   | Worker de swap cooperativo                                  |
//! | `heap`     | Heap do kernel (`linked_list_allocator`)                    |
//! | `ops`      | `memcpy`/`memset`/... para o runtime `no_std`                |
//! | `oom`      | `#[alloc_error_handler]`                                    |
//! | `test`     | Self-tests (`feature = "self_test"`)                        |

pub mod config;
pub mod error;

pub mod addr;
pub mod pmm;
pub mod rmap;
pub mod vmm;

pub mod kswapd;
pub mod reclaim;
pub mod swap;

pub mod heap;
pub mod ops;
pub mod oom;
pub mod test;

pub use addr::{PhysAddr, VirtAddr};
pub use error::{MmError, MmResult};

use crate::core::handoff::{BootInfo, MemoryType};
use crate::mm::config::PGSIZE;
use crate::mm::pmm::{AllocFlags, FrameId};
use crate::sync::Spinlock;

static KERNEL_PGDIR: Spinlock<Option<PhysAddr>> = Spinlock::new(None);

/// Diretório de páginas do kernel, instalado por [`init`]. Ambientes de
/// usuário recebem o seu próprio ao serem criados (fora de escopo aqui);
/// este é só o que mapeia as regiões estáticas acima de `UTOP`.
pub fn kernel_pgdir() -> PhysAddr {
    KERNEL_PGDIR.lock().expect("mm::init ainda não rodou")
}

fn reserve_range(base: PhysAddr, bytes: u64) {
    let start = config::page_align_down(base.as_usize());
    let end = config::page_align_up(base.as_usize() + bytes as usize);
    let mut pa = start;
    while pa < end {
        reserve_phys(PhysAddr::new(pa));
        pa += PGSIZE;
    }
}

fn reserve_phys(pa: PhysAddr) {
    if pa.pgnum() < pmm::frame_count() {
        pmm::reserve(FrameId(pa.pgnum() as u32));
    }
}

/// Inicializa toda a pilha de memória: lê o mapa de memória do handoff,
/// monta a tabela de descritores de frame, reserva o que já está em uso
/// (frame 0, a imagem do próprio kernel, regiões não utilizáveis),
/// instala as mapeações estáticas do diretório de páginas do kernel e
/// sobe o heap. Chamado uma única vez por `core::entry::kernel_main`.
pub fn init(boot_info: &BootInfo) {
    let entries = unsafe {
        core::slice::from_raw_parts(
            boot_info.memory_map_addr as *const crate::core::handoff::MemoryMapEntry,
            boot_info.memory_map_len as usize,
        )
    };

    let highest = entries
        .iter()
        .filter(|e| e.typ == MemoryType::Usable)
        .map(|e| e.base + e.len)
        .max()
        .unwrap_or(0);
    let frame_count = (highest as usize).div_ceil(PGSIZE).max(1);

    // Todo o espaço físico conhecido é tratado como "premapeado": o
    // mapa direto KERNBASE+pa já cobre qualquer frame que pmm entregue,
    // porque o HAL real (x86_64, `arch::x86_64`) cuida da tradução de
    // endereço de verdade; a noção de "ainda não plenamente mapeado" do
    // original (antes do `lcr3` final) não se aplica aqui.
    pmm::init(PhysAddr::new(0), frame_count, PhysAddr::new(highest as usize));

    // Frame 0 preserva estruturas de modo real/BIOS.
    reserve_phys(PhysAddr::new(0));

    for e in entries.iter().filter(|e| e.typ != MemoryType::Usable) {
        reserve_range(PhysAddr::new(e.base as usize), e.len);
    }
    reserve_range(PhysAddr::new(boot_info.kernel_phys_addr as usize), boot_info.kernel_size);

    let pgdir = pmm::alloc(AllocFlags::PREMAPPED | AllocFlags::ZERO).expect("sem memória para o diretório de páginas do kernel");
    let pgdir_pa = pgdir.to_phys(pmm::frame_base());
    *KERNEL_PGDIR.lock() = Some(pgdir_pa);

    // Identity-map de toda a memória física conhecida acima de KERNBASE,
    // RW, só kernel — espelha o mapeamento final de `mem_init`.
    vmm::boot_map_region(
        pgdir_pa,
        addr::VirtAddr::new(config::KERNBASE),
        frame_count * PGSIZE,
        PhysAddr::new(0),
        config::pte::W,
    );

    heap::init().expect("sem memória para o heap inicial do kernel");

    crate::kinfo!(
        "mm: {} frames ({} MiB) geridos, pgdir em {:#x}",
        frame_count,
        frame_count * PGSIZE / (1024 * 1024),
        pgdir_pa.as_usize()
    );
}
