//! Cenário de reclaim direto e síncrono (§8): a política de relógio evicta
//! a única página presente de um ambiente executável quando chamada
//! diretamente, sem passar pela fila do worker cooperativo.

use crate::klib::test_framework::{run_test_suite, TestCase, TestResult};
use crate::mm::addr::VirtAddr;
use crate::mm::config::{self, pte};
use crate::mm::pmm::{self, AllocFlags};
use crate::mm::reclaim;
use crate::mm::swap;
use crate::mm::vmm;
use crate::sched::{self, Env, EnvId, EnvStatus, EnvType};
use crate::kassert;

crate::ktest!(direct_reclaim_evicts_the_only_present_user_page, {
    let pgdir_frame = match pmm::alloc(AllocFlags::PREMAPPED | AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    pmm::incref(pgdir_frame);
    let pgdir = pgdir_frame.to_phys(pmm::frame_base());

    let id = EnvId(0xEEEE_0001);
    let mut env = Env::new(id, EnvType::User, pgdir);
    env.status = EnvStatus::Runnable;
    let va = VirtAddr::new(config::UTEXT + 20 * config::PGSIZE);
    vmm::region_alloc(&env, va, config::PGSIZE, pte::U | pte::W).expect("region_alloc falhou");

    let frame = match pmm::alloc(AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    vmm::page_insert(pgdir, frame, va, pte::U | pte::W, id, None).expect("page_insert falhou");
    sched::register(env);

    reclaim::direct_reclaim();

    kassert!(vmm::page_lookup(pgdir, va).is_none());
    kassert!(swap::pending_slot(pgdir, va).is_some());
});

pub fn run() {
    run_test_suite(
        "mm::reclaim",
        &[TestCase::new(
            "direct_reclaim_evicts_the_only_present_user_page",
            direct_reclaim_evicts_the_only_present_user_page,
        )],
    );
}
