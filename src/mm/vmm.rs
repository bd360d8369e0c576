//! Mapeador de dois níveis: `pgdir_walk`, `page_insert`/`page_remove`/
//! `page_lookup`, regiões de boot e MMIO, e as checagens de acesso de
//! usuário que o resto do kernel (syscalls) usa para validar ponteiros.
//!
//! O binário roda sobre x86_64, mas o "hardware" que este módulo modela
//! é o layout de dois níveis de [`crate::mm::config`]: a memória física
//! abaixo de `premapped_rbound` é acessada pelo kernel via um mapa direto
//! `KERNBASE + pa`, exatamente como `page2kva`/`KADDR` no original. Só a
//! fronteira com o `arch::x86_64` real (`invlpg`, troca de CR3) já fala a
//! língua nativa de 64 bits.

use crate::arch::platform::memory as hal;
use crate::mm::addr::{PhysAddr, VirtAddr};
use crate::mm::config::{self, pte, HUGE_PGSIZE, KERNBASE, PGSIZE};
use crate::mm::error::{MmError, MmResult};
use crate::mm::pmm::{self, AllocFlags, FrameId};
use crate::sched::{Env, EnvId, EnvStatus, Vma};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    None,
    Normal,
    Huge,
}

/// Ponteiro para a memória física via o mapa direto do kernel.
///
/// # Safety
/// `pa` deve estar abaixo do limite premapeado (frames alocados via
/// `ALLOC_PREMAPPED`/diretório/tabelas de páginas estão sempre nessa
/// faixa; é a mesma garantia que `page2kva` dá no original).
pub unsafe fn kernel_ptr_for_phys(pa: PhysAddr) -> *mut u8 {
    (KERNBASE + pa.as_usize()) as *mut u8
}

unsafe fn pde_slot(pgdir: PhysAddr, va: VirtAddr) -> *mut u32 {
    let base = kernel_ptr_for_phys(pgdir) as *mut u32;
    base.add(config::pdx(va.as_usize()))
}

/// Percorre o diretório/tabela de páginas para achar (ou criar) a PTE de
/// `va`. Quando a própria entrada de diretório já é um frame grande
/// (`PTE_PS`), o ponteiro retornado é o da PDE, não de uma PTE de tabela.
pub fn walk(pgdir: PhysAddr, va: VirtAddr, create: CreateMode) -> MmResult<Option<*mut u32>> {
    unsafe {
        let pde = pde_slot(pgdir, va);
        if *pde & pte::P == 0 {
            match create {
                CreateMode::None => return Ok(None),
                CreateMode::Huge => {
                    *pde = pte::PS;
                }
                CreateMode::Normal => {
                    let table = pmm::alloc(AllocFlags::PREMAPPED | AllocFlags::ZERO)?;
                    pmm::incref(table);
                    let table_pa = table.to_phys(pmm::frame_base());
                    *pde = (table_pa.as_usize() as u32) | pte::P | pte::W;
                }
            }
        }
        if *pde & pte::PS != 0 {
            return Ok(Some(pde));
        }
        let table_base = PhysAddr::new((*pde & pte::ADDR_MASK) as usize);
        let table = kernel_ptr_for_phys(table_base) as *mut u32;
        Ok(Some(table.add(config::ptx(va.as_usize()))))
    }
}

fn invalidate(pgdir: PhysAddr, va: VirtAddr, current: Option<PhysAddr>) {
    if current == Some(pgdir) {
        unsafe {
            hal::invlpg(va.as_u64());
        }
    }
}

/// Mapeia `[va, va+size)` para `[pa, pa+size)` com `perm`. Usado só para
/// as regiões estáticas acima de `UTOP`; não toca `ref_count` dos frames
/// mapeados (eles não pertencem à tabela de descritores do `pmm`).
pub fn boot_map_region(pgdir: PhysAddr, va: VirtAddr, size: usize, pa: PhysAddr, perm: u32) {
    let mut off = 0usize;
    while off < size {
        let pte = walk(pgdir, va + off, CreateMode::Normal)
            .ok()
            .flatten()
            .expect("boot_map_region: sem memória para tabela de páginas");
        unsafe {
            *pte = ((pa.as_usize() + off) as u32) | pte::P | perm;
        }
        off += PGSIZE;
    }
}

/// Reserva `size` bytes na região de MMIO e os mapeia a partir de `pa`.
/// Retorna o endereço virtual base da reserva.
pub fn mmio_map_region(pgdir: PhysAddr, pa: PhysAddr, size: usize) -> VirtAddr {
    let base = VirtAddr::new(config::MMIOBASE);
    let aligned = config::page_align_up(size.max(1));
    boot_map_region(pgdir, base, aligned, pa, pte::W | pte::PCD | pte::PWT);
    base
}

/// Mapeia `frame` em `va` com `perm`. Se já houver algo mapeado em `va`,
/// é removido primeiro; reinserir o mesmo frame no mesmo `va` é seguro
/// (o `ref_count` sobe e desce de forma consistente porque o caminho é
/// único, sem tratar o caso "mesma página" separadamente).
pub fn page_insert(
    pgdir: PhysAddr,
    frame: FrameId,
    va: VirtAddr,
    perm: u32,
    owner: EnvId,
    current_pgdir: Option<PhysAddr>,
) -> MmResult<()> {
    let is_huge_perm = perm & pte::PS != 0;
    if is_huge_perm != pmm::is_huge(frame) {
        return Err(MmError::Inval);
    }

    pmm::incref(frame);

    if let Some(pte) = walk(pgdir, va, CreateMode::None)? {
        let present = unsafe { *pte & pte::P != 0 };
        if present {
            page_remove(pgdir, va, owner, current_pgdir);
        }
    }

    let create = if is_huge_perm { CreateMode::Huge } else { CreateMode::Normal };
    let pte = match walk(pgdir, va, create)? {
        Some(p) => p,
        None => {
            pmm::decref(frame);
            return Err(MmError::Oom);
        }
    };

    let frame_pa = frame.to_phys(pmm::frame_base());
    unsafe {
        *pte = (frame_pa.as_usize() as u32) | pte::P | perm;
    }
    pmm::with_back_refs(frame, |refs| refs.insert(owner, va.as_usize()));
    Ok(())
}

/// Retorna o frame mapeado em `va`, se houver.
pub fn page_lookup(pgdir: PhysAddr, va: VirtAddr) -> Option<(FrameId, *mut u32)> {
    let pte = walk(pgdir, va, CreateMode::None).ok().flatten()?;
    unsafe {
        if *pte & pte::P == 0 {
            return None;
        }
        let pa = PhysAddr::new((*pte & pte::ADDR_MASK) as usize);
        let frame = FrameId(((pa.as_usize() - pmm::frame_base().as_usize()) / PGSIZE) as u32);
        Some((frame, pte))
    }
}

/// Desfaz o mapeamento em `va`, se existir. Silencioso se não houver nada
/// mapeado (idempotente, como o original).
pub fn page_remove(pgdir: PhysAddr, va: VirtAddr, owner: EnvId, current_pgdir: Option<PhysAddr>) {
    let Some((frame, pte)) = page_lookup(pgdir, va) else {
        return;
    };
    pmm::with_back_refs(frame, |refs| refs.remove(owner, va.as_usize()));
    pmm::decref(frame);
    unsafe {
        *pte = 0;
    }
    invalidate(pgdir, va, current_pgdir);
}

/// Registra uma VMA anônima `[va, va+len)` no ambiente. A própria alocação
/// de frames acontece sob demanda, no primeiro fault dentro da região
/// (ver [`handle_page_fault`]) — `region_alloc` só reserva o intervalo.
pub fn region_alloc(env: &Env, va: VirtAddr, len: usize, perm: u32) -> MmResult<()> {
    if va.as_usize() >= config::UTOP || va.as_usize() + len > config::UTOP {
        return Err(MmError::Fault);
    }
    let start = va.page_align_down().as_usize();
    let end = config::page_align_up(va.as_usize() + len);
    env.vmas.lock().push(Vma {
        va_start: start,
        len: end - start,
        perm,
    });
    Ok(())
}

fn vma_covering(env: &Env, va: usize) -> Option<Vma> {
    env.vmas
        .lock()
        .iter()
        .copied()
        .find(|v| va >= v.va_start && va < v.va_start + v.len)
}

/// Resolve um page fault de usuário: exige que `va` caia dentro de uma
/// VMA registrada, aloca (ou traz de volta do swap) um frame e o instala.
/// É aqui que `Env::record_page_fault` é alimentado.
pub fn handle_page_fault(env: &Env, va: VirtAddr) -> MmResult<()> {
    let vma = vma_covering(env, va.as_usize()).ok_or(MmError::Fault)?;

    if let Some(slot) = crate::mm::swap::pending_slot(env.pgdir, va) {
        return crate::mm::kswapd::request_swap_in(env.id, va, slot);
    }

    let frame = pmm::alloc(AllocFlags::ZERO)?;
    page_insert(env.pgdir, frame, va.page_align_down(), vma.perm, env.id, None)?;
    env.record_page_fault(PGSIZE as u64);
    Ok(())
}

/// Confirma que `[va, va+len)` está inteiramente coberto por PTEs presentes
/// que contêm ao menos os bits de `perm | P`, sem tocar a memória. Espelha
/// `user_mem_check` do original: consulta a PTE de verdade via `page_lookup`
/// em vez da VMA registrada, então uma página dentro de uma VMA válida mas
/// ainda trocada para o disco (PTE não-presente) falha aqui em vez de
/// passar — quem chamou precisa primeiro provocar o fault.
pub fn user_mem_check(env: &Env, va: VirtAddr, len: usize, perm: u32) -> MmResult<()> {
    if va.as_usize() >= config::UTOP || va.as_usize() + len > config::UTOP {
        return Err(MmError::Fault);
    }
    let needed = perm | pte::P;
    let end = config::page_align_up(va.as_usize() + len);
    let mut cursor = va.page_align_down().as_usize();
    while cursor < end {
        let Some((_, ptep)) = page_lookup(env.pgdir, VirtAddr::new(cursor)) else {
            return Err(MmError::Fault);
        };
        let flags = unsafe { *ptep & pte::FLAGS_MASK };
        if flags & needed != needed {
            return Err(MmError::Fault);
        }
        cursor += config::PGSIZE;
    }
    Ok(())
}

/// Como [`user_mem_check`], mas mata o ambiente (status `Dying`) em caso
/// de falha em vez de devolver o erro — é a forma que as syscalls usam
/// para validar ponteiros de usuário sem checar o resultado manualmente.
pub fn user_mem_assert(env: &mut Env, va: VirtAddr, len: usize, perm: u32) -> MmResult<()> {
    match user_mem_check(env, va, len, perm) {
        Ok(()) => Ok(()),
        Err(e) => {
            env.status = EnvStatus::Dying;
            Err(e)
        }
    }
}

/// Tamanho em bytes de uma entrada presente em `va` (4 KiB ou 4 MiB,
/// dependendo de `PTE_PS`). Usado pelo varrimento de relógio do reclaim.
pub fn mapping_size(pgdir: PhysAddr, va: VirtAddr) -> Option<usize> {
    let pte = walk(pgdir, va, CreateMode::None).ok().flatten()?;
    unsafe {
        if *pte & pte::P == 0 {
            return None;
        }
        Some(if *pte & pte::PS != 0 { HUGE_PGSIZE } else { PGSIZE })
    }
}
