//! Invariantes do mapeador de dois níveis (§8): inserir e depois buscar
//! devolve o mesmo frame, remover desfaz o mapeamento e decrementa a
//! referência, `region_alloc` rejeita VMAs que cruzam `UTOP`, e um page
//! fault dentro de uma VMA registrada resolve para um frame zerado.

use crate::klib::test_framework::{run_test_suite, TestCase, TestResult};
use crate::mm::addr::VirtAddr;
use crate::mm::config::{self, pte};
use crate::mm::pmm::{self, AllocFlags};
use crate::mm::vmm;
use crate::sched::{Env, EnvId, EnvType};
use crate::{kassert, kassert_eq};

fn fresh_pgdir() -> crate::mm::addr::PhysAddr {
    let frame = pmm::alloc(AllocFlags::PREMAPPED | AllocFlags::ZERO).expect("sem memória para pgdir de teste");
    pmm::incref(frame);
    frame.to_phys(pmm::frame_base())
}

crate::ktest!(insert_then_lookup_finds_same_frame, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0001), EnvType::User, pgdir);
    let va = VirtAddr::new(config::UTEXT);
    let frame = match pmm::alloc(AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    vmm::page_insert(pgdir, frame, va, pte::U | pte::W, env.id, None).expect("page_insert falhou");
    let (found, _) = vmm::page_lookup(pgdir, va).expect("page_lookup não achou nada");
    kassert_eq!(found, frame);
    kassert_eq!(pmm::ref_count(frame), 1);
});

crate::ktest!(remove_clears_mapping_and_decrefs, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0002), EnvType::User, pgdir);
    let va = VirtAddr::new(config::UTEXT + config::PGSIZE);
    let frame = match pmm::alloc(AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    vmm::page_insert(pgdir, frame, va, pte::U | pte::W, env.id, None).expect("page_insert falhou");
    vmm::page_remove(pgdir, va, env.id, None);
    kassert!(vmm::page_lookup(pgdir, va).is_none());
});

crate::ktest!(reinserting_same_va_replaces_previous_frame, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0003), EnvType::User, pgdir);
    let va = VirtAddr::new(config::UTEXT + 2 * config::PGSIZE);
    let (a, b) = match (pmm::alloc(AllocFlags::ZERO), pmm::alloc(AllocFlags::ZERO)) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return TestResult::Skip,
    };
    vmm::page_insert(pgdir, a, va, pte::U | pte::W, env.id, None).expect("primeira inserção falhou");
    vmm::page_insert(pgdir, b, va, pte::U | pte::W, env.id, None).expect("segunda inserção falhou");
    let (found, _) = vmm::page_lookup(pgdir, va).expect("page_lookup não achou nada");
    kassert_eq!(found, b);
    kassert_eq!(pmm::ref_count(a), 0);
});

crate::ktest!(region_alloc_rejects_range_crossing_utop, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0004), EnvType::User, pgdir);
    let va = VirtAddr::new(config::UTOP - config::PGSIZE);
    let result = vmm::region_alloc(&env, va, 2 * config::PGSIZE, pte::U | pte::W);
    kassert!(result.is_err());
});

crate::ktest!(page_fault_inside_vma_installs_zeroed_frame, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0005), EnvType::User, pgdir);
    let va = VirtAddr::new(config::UTEXT + 4 * config::PGSIZE);
    vmm::region_alloc(&env, va, config::PGSIZE, pte::U | pte::W).expect("region_alloc falhou");
    match vmm::handle_page_fault(&env, va) {
        Ok(()) => {}
        Err(_) => return TestResult::Skip,
    }
    kassert!(vmm::page_lookup(pgdir, va).is_some());
    kassert_eq!(env.page_fault_bytes(), config::PGSIZE as u64);
});

crate::ktest!(user_mem_check_rejects_address_with_no_vma, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0006), EnvType::User, pgdir);
    let va = VirtAddr::new(config::UTEXT + 8 * config::PGSIZE);
    let result = vmm::user_mem_check(&env, va, config::PGSIZE, pte::U | pte::W);
    kassert!(result.is_err());
});

crate::ktest!(user_mem_check_rejects_vma_whose_page_is_not_present, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0007), EnvType::User, pgdir);
    let va = VirtAddr::new(config::UTEXT + 9 * config::PGSIZE);
    // Uma VMA registrada sem fault nenhum ainda não instalou PTE alguma:
    // user_mem_check deve falhar porque olha a PTE de verdade, não a VMA.
    vmm::region_alloc(&env, va, config::PGSIZE, pte::U | pte::W).expect("region_alloc falhou");
    let result = vmm::user_mem_check(&env, va, config::PGSIZE, pte::U | pte::W);
    kassert!(result.is_err());
});

crate::ktest!(reinserting_the_same_frame_leaves_ref_count_unchanged, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0008), EnvType::User, pgdir);
    let va = VirtAddr::new(config::UTEXT + 10 * config::PGSIZE);
    let frame = match pmm::alloc(AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    vmm::page_insert(pgdir, frame, va, pte::U | pte::W, env.id, None).expect("primeira inserção falhou");
    kassert_eq!(pmm::ref_count(frame), 1);
    vmm::page_insert(pgdir, frame, va, pte::U | pte::W, env.id, None).expect("segunda inserção falhou");
    kassert_eq!(pmm::ref_count(frame), 1);
});

crate::ktest!(huge_frame_installs_a_page_size_extension_mapping, {
    let pgdir = fresh_pgdir();
    let env = Env::new(EnvId(0xFFFF_0009), EnvType::User, pgdir);
    let frame = match pmm::alloc(AllocFlags::HUGE | AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    kassert!(pmm::is_huge(frame));
    let va = VirtAddr::new(config::huge_align_down(config::UTEXT));
    vmm::page_insert(pgdir, frame, va, pte::U | pte::W | pte::PS, env.id, None).expect("page_insert (huge) falhou");
    let (found, _) = vmm::page_lookup(pgdir, va).expect("page_lookup não achou o frame grande");
    kassert_eq!(found, frame);
    kassert_eq!(vmm::mapping_size(pgdir, va), Some(config::HUGE_PGSIZE));
});

crate::ktest!(mmio_map_region_maps_requested_physical_range, {
    let pgdir = fresh_pgdir();
    let pa = crate::mm::addr::PhysAddr::new(0x1000_0000);
    let base = vmm::mmio_map_region(pgdir, pa, config::PGSIZE);
    kassert_eq!(base.as_usize(), config::MMIOBASE);
    let ptep = vmm::walk(pgdir, base, vmm::CreateMode::None)
        .ok()
        .flatten()
        .expect("mmio_map_region deveria ter instalado a PTE");
    let raw = unsafe { *ptep };
    kassert!(raw & pte::P != 0);
    kassert!(raw & pte::PCD != 0);
    kassert_eq!(raw & pte::ADDR_MASK, pa.as_usize() as u32);
});

pub fn run() {
    run_test_suite(
        "mm::vmm",
        &[
            TestCase::new("insert_then_lookup_finds_same_frame", insert_then_lookup_finds_same_frame),
            TestCase::new("remove_clears_mapping_and_decrefs", remove_clears_mapping_and_decrefs),
            TestCase::new(
                "reinserting_same_va_replaces_previous_frame",
                reinserting_same_va_replaces_previous_frame,
            ),
            TestCase::new("region_alloc_rejects_range_crossing_utop", region_alloc_rejects_range_crossing_utop),
            TestCase::new(
                "page_fault_inside_vma_installs_zeroed_frame",
                page_fault_inside_vma_installs_zeroed_frame,
            ),
            TestCase::new("user_mem_check_rejects_address_with_no_vma", user_mem_check_rejects_address_with_no_vma),
            TestCase::new(
                "user_mem_check_rejects_vma_whose_page_is_not_present",
                user_mem_check_rejects_vma_whose_page_is_not_present,
            ),
            TestCase::new(
                "reinserting_the_same_frame_leaves_ref_count_unchanged",
                reinserting_the_same_frame_leaves_ref_count_unchanged,
            ),
            TestCase::new(
                "huge_frame_installs_a_page_size_extension_mapping",
                huge_frame_installs_a_page_size_extension_mapping,
            ),
            TestCase::new("mmio_map_region_maps_requested_physical_range", mmio_map_region_maps_requested_physical_range),
        ],
    );
}
