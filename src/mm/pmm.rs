//! Alocador de frames físicos.
//!
//! Espelha `page_alloc`/`page_free`/`page_decref` de um kernel de ensino
//! JOS-like: uma tabela de descritores indexada por número de frame, uma
//! free-list intrusiva (`free_link` em vez de ponteiro, já que os
//! descritores moram num array estático e não podem se auto-referenciar),
//! e frames grandes de 4 MiB tratados como `PGNUM(HUGE_PGSIZE)` frames
//! pequenos consecutivos e alinhados que entram e saem da free-list juntos.
//!
//! A tabela é um array de tamanho fixo, não um `Vec`: este alocador é
//! quem fornece os frames que o heap do kernel (`mm::heap`) usa para se
//! inicializar, então não pode por sua vez depender do heap existir.
//!
//! Este é o lock #5 da hierarquia (§5): abaixo do lock de memória por
//! ambiente, acima do lock de disco.

use crate::mm::addr::PhysAddr;
use crate::mm::config::{self, HUGE_PGSIZE, PGSIZE};
use crate::mm::error::{MmError, MmResult};
use crate::mm::rmap::BackRefHead;
use crate::sync::Spinlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u32);

impl FrameId {
    pub const fn to_phys(self, base: PhysAddr) -> PhysAddr {
        PhysAddr::new(base.as_usize() + (self.0 as usize) * PGSIZE)
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AllocFlags: u32 {
        /// Frame grande de 4 MiB (`PGNUM(HUGE_PGSIZE)` frames pequenos).
        const HUGE = 1 << 0;
        /// Zera o conteúdo do frame antes de devolvê-lo.
        const ZERO = 1 << 1;
        /// Só aceita frames dentro da região premapeada (usada para
        /// estruturas do próprio kernel antes do `lcr3` final).
        const PREMAPPED = 1 << 2;
    }
}

/// Quantos frames de 4 KiB a tabela de descritores pode indexar. Um
/// `Vec` não serve aqui: `pmm::init` roda antes do heap existir (o
/// próprio heap pega seus frames de `pmm::alloc`), então a tabela
/// precisa de armazenamento estático de tamanho fixo. 65536 frames
/// cobrem 256 MiB, generoso para um kernel de ensino.
const MAX_FRAMES: usize = 65536;

#[derive(Clone, Copy)]
struct FrameDescriptor {
    ref_count: u32,
    /// `free_link` só é significativo quando `is_free` é verdadeiro; um
    /// frame livre na cauda da lista também tem `free_link == None`, por
    /// isso a filiação à free-list não pode ser inferida só do link.
    is_free: bool,
    free_link: Option<FrameId>,
    flags: AllocFlags,
    /// Contador de envelhecimento usado pelo relógio de reclaim (§4.5/§4.7).
    aging: u8,
    back_refs: BackRefHead,
}

impl FrameDescriptor {
    const fn new() -> Self {
        Self {
            ref_count: 0,
            is_free: false,
            free_link: None,
            flags: AllocFlags::empty(),
            aging: 0,
            back_refs: BackRefHead::EMPTY,
        }
    }
}

struct PmmState {
    table: [FrameDescriptor; MAX_FRAMES],
    /// Quantos dos `MAX_FRAMES` slots de `table` estão em uso (o
    /// restante é armazenamento não inicializado que ninguém referencia).
    count: usize,
    free_list: Option<FrameId>,
    base: PhysAddr,
    /// Frames com endereço físico abaixo disso ficam sempre mapeados
    /// identity-map pelo kernel (servem para `ALLOC_PREMAPPED`).
    premapped_limit: PhysAddr,
}

impl PmmState {
    const fn new() -> Self {
        Self {
            table: [FrameDescriptor::new(); MAX_FRAMES],
            count: 0,
            free_list: None,
            base: PhysAddr::new(0),
            premapped_limit: PhysAddr::new(0),
        }
    }

    fn push_free(&mut self, id: FrameId) {
        let slot = &mut self.table[id.0 as usize];
        slot.ref_count = 0;
        slot.is_free = true;
        slot.free_link = self.free_list;
        self.free_list = Some(id);
    }

    fn pop_free(&mut self) -> Option<FrameId> {
        let id = self.free_list?;
        self.free_list = self.table[id.0 as usize].free_link;
        self.table[id.0 as usize].free_link = None;
        self.table[id.0 as usize].is_free = false;
        Some(id)
    }

    fn huge_frames_per_block() -> usize {
        HUGE_PGSIZE / PGSIZE
    }

    fn is_huge_aligned(&self, id: FrameId) -> bool {
        let pa = id.to_phys(self.base);
        config::is_huge_aligned(pa.as_usize())
    }

    /// Varre a free-list em busca de um bloco de `NPTENTRIES` frames
    /// contíguos, alinhados a `HUGE_PGSIZE`, todos livres.
    fn try_alloc_huge(&mut self) -> Option<FrameId> {
        let n = self.count as u32;
        let block = Self::huge_frames_per_block() as u32;
        let mut start = 0u32;
        while start + block <= n {
            let head = FrameId(start);
            if self.is_huge_aligned(head)
                && (start..start + block).all(|i| self.table[i as usize].is_free)
            {
                for i in start..start + block {
                    self.unlink_free(FrameId(i));
                }
                return Some(head);
            }
            start += block;
        }
        None
    }

    /// Remove `id` da free-list, onde quer que esteja (não precisa ser a
    /// cabeça); usado pela alocação de frames grandes.
    fn unlink_free(&mut self, id: FrameId) {
        if !self.table[id.0 as usize].is_free {
            return;
        }
        if self.free_list == Some(id) {
            self.free_list = self.table[id.0 as usize].free_link;
        } else {
            let mut cur = self.free_list;
            while let Some(c) = cur {
                let next = self.table[c.0 as usize].free_link;
                if next == Some(id) {
                    self.table[c.0 as usize].free_link = self.table[id.0 as usize].free_link;
                    break;
                }
                cur = next;
            }
        }
        self.table[id.0 as usize].free_link = None;
        self.table[id.0 as usize].is_free = false;
    }

    fn try_alloc_premapped(&mut self) -> Option<FrameId> {
        let mut cur = self.free_list;
        while let Some(id) = cur {
            let pa = id.to_phys(self.base);
            if pa.as_usize() < self.premapped_limit.as_usize() {
                self.unlink_free(id);
                return Some(id);
            }
            cur = self.table[id.0 as usize].free_link;
        }
        None
    }
}

static STATE: Spinlock<PmmState> = Spinlock::new(PmmState::new());

/// Inicializa a tabela de descritores para `frame_count` frames a partir
/// de `base`, marcando todos como livres. O chamador (`mm::init`) já
/// filtrou o frame 0, o buraco de E/S e a região ocupada pelo próprio
/// kernel antes de chamar isto — aqui não há um `page_init` separado que
/// reclassifique regiões, só o assentamento da tabela em si.
pub fn init(base: PhysAddr, frame_count: usize, premapped_limit: PhysAddr) {
    let frame_count = frame_count.min(MAX_FRAMES);
    let mut st = STATE.lock();
    st.base = base;
    st.premapped_limit = premapped_limit;
    st.count = frame_count;
    for i in 0..frame_count {
        st.table[i] = FrameDescriptor::new();
    }
    st.free_list = None;
    for i in (0..frame_count as u32).rev() {
        st.push_free(FrameId(i));
    }
}

/// Marca `id` como já em uso externamente (reservas de boot, buraco de
/// E/S, etc.) antes que qualquer coisa chame [`alloc`].
pub fn reserve(id: FrameId) {
    let mut st = STATE.lock();
    st.unlink_free(id);
    st.table[id.0 as usize].ref_count = 0;
}

pub fn frame_base() -> PhysAddr {
    STATE.lock().base
}

fn zero_frame(base: PhysAddr, id: FrameId, huge: bool) {
    let pa = id.to_phys(base);
    let len = if huge { HUGE_PGSIZE } else { PGSIZE };
    unsafe {
        let ptr = crate::mm::vmm::kernel_ptr_for_phys(pa);
        core::ptr::write_bytes(ptr, 0, len);
    }
}

/// Aloca um frame segundo `flags`. Em falta de memória, tenta um reclaim
/// direto e síncrono uma vez (§4.1/§4.7) antes de devolver [`MmError::Oom`].
pub fn alloc(flags: AllocFlags) -> MmResult<FrameId> {
    for attempt in 0..2 {
        let result = {
            let mut st = STATE.lock();
            let got = if flags.contains(AllocFlags::PREMAPPED) {
                st.try_alloc_premapped()
            } else if flags.contains(AllocFlags::HUGE) {
                st.try_alloc_huge()
            } else {
                st.pop_free()
            };
            if let Some(id) = got {
                st.table[id.0 as usize].ref_count = 0;
                st.table[id.0 as usize].flags = flags;
                st.table[id.0 as usize].aging = 0;
            }
            (got, st.base)
        };
        if let (Some(id), base) = result {
            if flags.contains(AllocFlags::ZERO) {
                zero_frame(base, id, flags.contains(AllocFlags::HUGE));
            }
            return Ok(id);
        }
        if attempt == 0 {
            crate::mm::reclaim::direct_reclaim();
        }
    }
    Err(MmError::Oom)
}

/// Devolve `id` à free-list. Só deve ser chamado quando `ref_count`
/// chega a zero; chamar sobre um frame já livre é um bug do kernel.
fn free(id: FrameId) {
    let mut st = STATE.lock();
    if st.table[id.0 as usize].is_free {
        panic!("mm::pmm: double free do frame {}", id.0);
    }
    if st.table[id.0 as usize].flags.contains(AllocFlags::HUGE) {
        let n = PmmState::huge_frames_per_block() as u32;
        for i in id.0..id.0 + n {
            st.push_free(FrameId(i));
        }
    } else {
        st.push_free(id);
    }
}

/// Decrementa a referência e libera o frame se ela chegar a zero.
pub fn decref(id: FrameId) {
    let should_free = {
        let mut st = STATE.lock();
        let rc = &mut st.table[id.0 as usize].ref_count;
        *rc = rc.saturating_sub(1);
        *rc == 0
    };
    if should_free {
        free(id);
    }
}

pub fn incref(id: FrameId) {
    STATE.lock().table[id.0 as usize].ref_count += 1;
}

pub fn ref_count(id: FrameId) -> u32 {
    STATE.lock().table[id.0 as usize].ref_count
}

pub fn is_huge(id: FrameId) -> bool {
    STATE.lock().table[id.0 as usize].flags.contains(AllocFlags::HUGE)
}

/// Atualiza o contador de envelhecimento de `id` pelo passe de relógio:
/// `aging = (accessed ? bit_alto : 0) | (aging >> 1)`.
///
/// Bitwise OR, não `||` lógico — um bug clássico do kernel original que
/// fazia todo frame não-acessado recentemente colapsar para 0 ou 1 em vez
/// de decair gradualmente.
pub fn age(id: FrameId, accessed: bool) {
    let mut st = STATE.lock();
    let a = &mut st.table[id.0 as usize].aging;
    let high_bit = if accessed { 0x80 } else { 0x00 };
    *a = high_bit | (*a >> 1);
}

pub fn aging(id: FrameId) -> u8 {
    STATE.lock().table[id.0 as usize].aging
}

/// Frame mais "frio" entre os visitados no passe de relógio atual, usado
/// por [`crate::mm::reclaim`] para escolher a vítima.
pub fn coldest<I: Iterator<Item = FrameId>>(frames: I) -> Option<FrameId> {
    let st = STATE.lock();
    frames.min_by_key(|id| st.table[id.0 as usize].aging)
}

pub fn with_back_refs<R>(id: FrameId, f: impl FnOnce(&mut BackRefHead) -> R) -> R {
    let mut st = STATE.lock();
    f(&mut st.table[id.0 as usize].back_refs)
}

pub fn frame_count() -> usize {
    STATE.lock().count
}
