//! Engine de swap: tabela fixa de slots de disco e a fila de jobs que o
//! worker cooperativo (`kswapd`) drena.
//!
//! Espelha `swap_slots`/`pg_swap_entry`/`swap_queue_entry` do original:
//! o slot 0 é sentinela (nunca alocado, permite usar `0` como "sem slot"
//! dentro de uma PTE não-presente), a tabela é varrida linearmente, e os
//! jobs ficam numa fila FIFO simples em vez de dois pools (`sqe`/`pse`)
//! porque aqui a fila já carrega os dados da entrada de swap inline.
//!
//! Lock #2 (fila de jobs) e lock #3 (metadados de slot) da hierarquia
//! (§5) são dois `Spinlock`s distintos mesmo sendo pequenos, porque a
//! ordem entre eles importa: quem segura a fila pode precisar inspecionar
//! um slot, nunca o contrário.

use crate::drivers::block::SECTOR_SIZE;
use crate::klib::list::LinkedList;
use crate::mm::addr::{PhysAddr, VirtAddr};
use crate::mm::config::PGSIZE;
use crate::mm::error::{MmError, MmResult};
use crate::mm::pmm::FrameId;
use crate::mm::rmap::BackRefHead;
use crate::sched::EnvId;
use crate::sync::Spinlock;

/// Quantos slots de swap o disco reserva. O slot 0 é sentinela.
pub const N_SLOTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapSlot(pub u32);

/// Um job pendente para o worker de swap.
#[derive(Debug, Clone, Copy)]
pub enum SwapJob {
    /// Escreve o frame no disco e libera suas PTEs.
    SwapOut { frame: FrameId },
    /// Lê o slot de volta para um frame novo e reinstala a PTE do fault.
    SwapIn { env: EnvId, va: VirtAddr, slot: SwapSlot },
}

struct SlotTable {
    /// `refs[i]` conta quantas PTEs ainda não-presentes apontam para o
    /// slot `i` (um frame compartilhado por múltiplas mapeações só libera
    /// o slot quando a última delas é trazida de volta).
    refs: [u32; N_SLOTS],
}

impl SlotTable {
    const fn new() -> Self {
        Self { refs: [0; N_SLOTS] }
    }

    fn alloc(&mut self) -> Option<SwapSlot> {
        for i in 1..N_SLOTS {
            if self.refs[i] == 0 {
                self.refs[i] = 1;
                return Some(SwapSlot(i as u32));
            }
        }
        None
    }

    fn addref(&mut self, slot: SwapSlot) {
        self.refs[slot.0 as usize] += 1;
    }

    fn release(&mut self, slot: SwapSlot) -> bool {
        let r = &mut self.refs[slot.0 as usize];
        *r = r.saturating_sub(1);
        *r == 0
    }
}

static SLOTS: Spinlock<SlotTable> = Spinlock::new(SlotTable::new());
static JOBS: Spinlock<LinkedList<SwapJob>> = Spinlock::new(LinkedList::new());

/// Por slot, a lista de (env, va) que devem reinstalar a PTE quando a
/// página volta do disco — equivalente a `swap_env_map` no original.
static SLOT_BACKREFS: Spinlock<[BackRefHead; N_SLOTS]> = Spinlock::new([BackRefHead::EMPTY; N_SLOTS]);

/// Associa a `slot` a lista de back-refs que estava no frame saindo para
/// o disco, para serem restauradas no swap-in.
pub fn stash_backrefs(slot: SwapSlot, refs: BackRefHead) {
    SLOT_BACKREFS.lock()[slot.0 as usize] = refs;
}

/// Retira (e esvazia) a lista de back-refs associada a `slot`.
pub fn take_backrefs(slot: SwapSlot) -> BackRefHead {
    let mut table = SLOT_BACKREFS.lock();
    let refs = table[slot.0 as usize];
    table[slot.0 as usize] = BackRefHead::EMPTY;
    refs
}

/// Converte um slot de swap no setor de disco onde ele começa.
pub fn slot_sector(slot: SwapSlot) -> u32 {
    slot.0 * (PGSIZE / SECTOR_SIZE) as u32
}

/// Codifica um slot de swap numa PTE não-presente: os 20 bits altos
/// carregam o número do slot, os 12 baixos continuam livres para flags.
pub fn encode_pte(slot: SwapSlot) -> u32 {
    slot.0 << 12
}

/// Decodifica o slot de swap de uma PTE não-presente com bits altos
/// diferentes de zero. Uma PTE zerada (página nunca tocada) não
/// codifica slot nenhum.
pub fn decode_pte(raw: u32) -> Option<SwapSlot> {
    let slot = raw >> 12;
    if slot == 0 {
        None
    } else {
        Some(SwapSlot(slot))
    }
}

/// Enfileira o swap-out de `frame`. A reserva do slot em si só acontece
/// quando o worker drena o job (ver `kswapd::run_once`); se a tabela
/// estiver cheia nesse momento, o job vira no-op (`NoSlot`) e a página
/// permanece residente até o próximo passe de relógio escolher outra
/// vítima.
pub fn enqueue_swap_out(frame: FrameId) {
    JOBS.lock().push_back(SwapJob::SwapOut { frame });
}

pub fn enqueue_swap_in(env: EnvId, va: VirtAddr, slot: SwapSlot) {
    JOBS.lock().push_back(SwapJob::SwapIn { env, va, slot });
}

pub fn dequeue_job() -> Option<SwapJob> {
    JOBS.lock().pop_front()
}

pub fn has_pending_jobs() -> bool {
    !JOBS.lock().is_empty()
}

/// Reserva um slot novo para um swap-out em andamento.
pub fn reserve_slot() -> MmResult<SwapSlot> {
    SLOTS.lock().alloc().ok_or(MmError::NoSlot)
}

pub fn addref_slot(slot: SwapSlot) {
    SLOTS.lock().addref(slot);
}

/// Libera a última referência ao slot após um swap-in bem-sucedido.
pub fn release_slot(slot: SwapSlot) {
    SLOTS.lock().release(slot);
}

/// Se a PTE de `va` em `pgdir` estiver não-presente e codificar um slot
/// de swap, devolve esse slot; usado pelo handler de page fault para
/// distinguir "nunca mapeado" de "está no disco".
pub fn pending_slot(pgdir: PhysAddr, va: VirtAddr) -> Option<SwapSlot> {
    let pte = crate::mm::vmm::walk(pgdir, va, crate::mm::vmm::CreateMode::None)
        .ok()
        .flatten()?;
    unsafe {
        if *pte & crate::mm::config::pte::P != 0 {
            return None;
        }
        decode_pte(*pte)
    }
}
