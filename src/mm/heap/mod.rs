//! Heap do kernel.
//!
//! O alocador global é o `LockedHeap` de `linked_list_allocator`: uma
//! free-list de primeiro-ajuste de uso geral, adequada para um heap de
//! kernel que não precisa do desempenho de um buddy/slab dedicado — o
//! trabalho pesado de gerência de memória física já é feito por
//! `mm::pmm`, este heap só serve `alloc::{Box, Vec, ...}` para
//! estruturas do próprio kernel (tabela de descritores, VMAs, etc.).

use linked_list_allocator::LockedHeap;

use crate::mm::config::PGSIZE;
use crate::mm::error::{MmError, MmResult};
use crate::mm::pmm::{self, AllocFlags};
use crate::mm::vmm;

#[global_allocator]
static ALLOCATOR: LockedHeap = LockedHeap::empty();

/// Quantos frames de 4 KiB reservar para o heap inicial do kernel.
const INITIAL_HEAP_FRAMES: usize = 256; // 1 MiB

/// Reserva frames físicos via `pmm` e os entrega ao alocador de heap.
/// Chamado uma única vez por `mm::init`, depois que `pmm`/`vmm` já estão
/// de pé.
pub fn init() -> MmResult<()> {
    let first = pmm::alloc(AllocFlags::PREMAPPED | AllocFlags::ZERO)?;
    let first_pa = first.to_phys(pmm::frame_base());
    for i in 1..INITIAL_HEAP_FRAMES {
        let frame = pmm::alloc(AllocFlags::PREMAPPED | AllocFlags::ZERO)?;
        let pa = frame.to_phys(pmm::frame_base());
        if pa.as_usize() != first_pa.as_usize() + i * PGSIZE {
            return Err(MmError::Oom);
        }
    }

    let base_ptr = unsafe { vmm::kernel_ptr_for_phys(first_pa) };
    let size = INITIAL_HEAP_FRAMES * PGSIZE;
    unsafe {
        ALLOCATOR.lock().init(base_ptr, size);
    }
    crate::kinfo!(
        "mm::heap: {} KiB a partir de {:#x}",
        size / 1024,
        first_pa.as_usize()
    );
    Ok(())
}

