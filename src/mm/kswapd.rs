//! Worker de swap: uma thread de kernel cooperativa que drena a fila de
//! jobs de [`crate::mm::swap`], cedendo a CPU apenas dentro das esperas
//! de E/S de disco (nunca enquanto segura um lock de nível mais baixo
//! que o da fila, por §5).
//!
//! `swap_out_blocking` também é chamado diretamente pelo reclaim síncrono
//! (`crate::mm::reclaim::direct_reclaim`) quando a alocação não pode
//! esperar o worker — a única diferença é que o reclaim direto nunca
//! cede a CPU no meio da escrita, porque quem chamou precisa do frame
//! de volta antes de prosseguir.

use crate::drivers::block::{self, SECTOR_SIZE};
use crate::mm::addr::VirtAddr;
use crate::mm::config::{pte, PGSIZE};
use crate::mm::error::MmResult;
use crate::mm::pmm::{self, AllocFlags, FrameId};
use crate::mm::swap::{self, SwapJob, SwapSlot};
use crate::mm::vmm;
use crate::sched;

fn disk_write_page(sector: u32, buf: &[u8]) {
    block::ide_start_readwrite(sector, (PGSIZE / SECTOR_SIZE) as u8, true);
    for chunk in buf.chunks(SECTOR_SIZE) {
        while !block::ide_is_ready() {
            sched::kernel_thread_desched();
        }
        let mut sector_buf = [0u8; SECTOR_SIZE];
        sector_buf.copy_from_slice(chunk);
        block::ide_write_sector(&sector_buf);
    }
}

fn disk_read_page(sector: u32, buf: &mut [u8]) {
    block::ide_start_readwrite(sector, (PGSIZE / SECTOR_SIZE) as u8, false);
    for chunk in buf.chunks_mut(SECTOR_SIZE) {
        while !block::ide_is_ready() {
            sched::kernel_thread_desched();
        }
        let mut sector_buf = [0u8; SECTOR_SIZE];
        block::ide_read_sector(&mut sector_buf);
        chunk.copy_from_slice(&sector_buf);
    }
}

/// Escreve `frame` no disco de forma síncrona: reserva um slot, reescreve
/// a PTE de toda mapeação conhecida para codificar o slot e decai a
/// referência do frame por cada uma, grava o conteúdo e libera o frame.
/// Sem slot livre (`NoSlot`), não faz nada — a página continua residente.
pub fn swap_out_blocking(frame: FrameId) {
    let Ok(slot) = swap::reserve_slot() else {
        crate::kwarn!("mm::kswapd: tabela de slots cheia, swap-out virou no-op");
        return;
    };

    let refs = pmm::with_back_refs(frame, |head| head.take());
    let mut n_refs = 0u32;
    refs.for_each(|env_id, va| {
        n_refs += 1;
        sched::with_env(env_id, |env| {
            if let Ok(Some(ptep)) = vmm::walk(env.pgdir, VirtAddr::new(va), vmm::CreateMode::None) {
                unsafe {
                    let flags = *ptep & pte::FLAGS_MASK;
                    *ptep = swap::encode_pte(slot) | (flags & !pte::P);
                }
                env.record_page_fault_release(PGSIZE as u64);
            }
        });
    });
    for _ in 1..n_refs {
        swap::addref_slot(slot);
    }
    swap::stash_backrefs(slot, refs);

    let pa = frame.to_phys(pmm::frame_base());
    let src = unsafe { core::slice::from_raw_parts(vmm::kernel_ptr_for_phys(pa), PGSIZE) };
    disk_write_page(swap::slot_sector(slot), src);

    pmm::decref(frame);
}

/// Lê `slot` de volta para um frame novo e reinstala a PTE em todo
/// (env, va) que apontava para ele, liberando o slot ao final.
fn swap_in_blocking(slot: SwapSlot) -> MmResult<FrameId> {
    let frame = pmm::alloc(AllocFlags::ZERO)?;
    let pa = frame.to_phys(pmm::frame_base());
    let dst = unsafe { core::slice::from_raw_parts_mut(vmm::kernel_ptr_for_phys(pa), PGSIZE) };
    disk_read_page(swap::slot_sector(slot), dst);

    let refs = swap::take_backrefs(slot);
    refs.for_each(|env_id, va| {
        sched::with_env(env_id, |env| {
            let perm = env
                .vmas
                .lock()
                .iter()
                .find(|v| va >= v.va_start && va < v.va_start + v.len)
                .map(|v| v.perm)
                .unwrap_or(pte::U | pte::W);
            let _ = vmm::page_insert(env.pgdir, frame, VirtAddr::new(va), perm, env_id, None);
        });
        swap::release_slot(slot);
        sched::reenqueue_runnable(env_id);
    });
    Ok(frame)
}

/// Chamado pelo handler de page fault quando a PTE faltante codifica um
/// slot de swap: desagenda o ambiente e enfileira o trabalho de trazer a
/// página de volta para o worker.
pub fn request_swap_in(env: crate::sched::EnvId, va: VirtAddr, slot: SwapSlot) -> MmResult<()> {
    sched::with_env(env, |e| e.status = crate::sched::EnvStatus::NotRunnable);
    swap::enqueue_swap_in(env, va, slot);
    Ok(())
}

/// Drena um job da fila, se houver. Devolve `false` quando a fila estava
/// vazia — o chamador (o laço ocioso de `core::entry::kernel_main`, que faz
/// o papel da thread cooperativa `kswapd` neste kernel sem escalonador
/// preemptivo real) deve então dormir até o próximo ciclo.
pub fn run_once() -> bool {
    let Some(job) = swap::dequeue_job() else {
        return false;
    };
    match job {
        SwapJob::SwapOut { frame } => swap_out_blocking(frame),
        SwapJob::SwapIn { env, va: _, slot } => {
            let _ = swap_in_blocking(slot);
            let _ = env;
        }
    }
    true
}

