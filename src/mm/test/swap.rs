//! Invariantes da tabela de slots e da fila de jobs (§8): o slot 0 nunca
//! é entregue, `addref`/`release` contam referências, e a codificação de
//! slot numa PTE não-presente é reversível.

use crate::klib::test_framework::{run_test_suite, TestCase, TestResult};
use crate::mm::addr::VirtAddr;
use crate::mm::config::{self, pte};
use crate::mm::kswapd;
use crate::mm::pmm::{self, AllocFlags};
use crate::mm::swap::{self, SwapJob, SwapSlot};
use crate::mm::vmm;
use crate::sched::{self, Env, EnvId, EnvStatus, EnvType};
use crate::{kassert, kassert_eq};

crate::ktest!(reserved_slot_is_never_the_sentinel, {
    let slot = swap::reserve_slot().expect("tabela de slots vazia não deveria estar cheia");
    kassert!(slot.0 != 0);
    swap::release_slot(slot);
});

crate::ktest!(encode_decode_pte_round_trips, {
    let slot = SwapSlot(42);
    let raw = swap::encode_pte(slot);
    let decoded = swap::decode_pte(raw).expect("slot codificado deveria decodificar");
    kassert_eq!(decoded, slot);
});

crate::ktest!(zeroed_pte_decodes_to_no_slot, {
    kassert!(swap::decode_pte(0).is_none());
});

crate::ktest!(addref_keeps_slot_alive_until_last_release, {
    let slot = swap::reserve_slot().expect("tabela de slots vazia não deveria estar cheia");
    swap::addref_slot(slot);
    swap::release_slot(slot);
    // ainda resta uma referência do addref; o slot não deveria poder ser
    // reaproveitado por um reserve_slot até a segunda release.
    let second = swap::reserve_slot();
    swap::release_slot(slot);
    if let Ok(other) = second {
        kassert!(other != slot);
        swap::release_slot(other);
    }
});

crate::ktest!(stash_and_take_backrefs_round_trip, {
    let slot = swap::reserve_slot().expect("tabela de slots vazia não deveria estar cheia");
    let mut head = crate::mm::rmap::BackRefHead::EMPTY;
    head.insert(EnvId(9), 0x5000);
    swap::stash_backrefs(slot, head);
    let taken = swap::take_backrefs(slot);
    kassert!(!taken.is_empty());
    let taken_again = swap::take_backrefs(slot);
    kassert!(taken_again.is_empty());
    swap::release_slot(slot);
});

crate::ktest!(job_queue_is_fifo, {
    let frame_a = match pmm::alloc(AllocFlags::empty()) {
        Ok(f) => f,
        Err(_) => return crate::klib::test_framework::TestResult::Skip,
    };
    pmm::incref(frame_a);
    swap::enqueue_swap_out(frame_a);
    swap::enqueue_swap_in(EnvId(1), VirtAddr::new(0x6000), SwapSlot(1));
    kassert!(swap::has_pending_jobs());
    match swap::dequeue_job() {
        Some(SwapJob::SwapOut { frame }) => kassert_eq!(frame, frame_a),
        _ => return crate::klib::test_framework::TestResult::Fail,
    }
    match swap::dequeue_job() {
        Some(SwapJob::SwapIn { env, slot, .. }) => {
            kassert_eq!(env, EnvId(1));
            kassert_eq!(slot, SwapSlot(1));
        }
        _ => return crate::klib::test_framework::TestResult::Fail,
    }
    kassert!(!swap::has_pending_jobs());
    pmm::decref(frame_a);
});

crate::ktest!(swap_out_then_swap_in_round_trips_page_contents, {
    let pgdir_frame = match pmm::alloc(AllocFlags::PREMAPPED | AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    pmm::incref(pgdir_frame);
    let pgdir = pgdir_frame.to_phys(pmm::frame_base());

    let id = EnvId(0xEEEE_0002);
    let mut env = Env::new(id, EnvType::User, pgdir);
    env.status = EnvStatus::Runnable;
    let va = VirtAddr::new(config::UTEXT + 21 * config::PGSIZE);

    let frame = match pmm::alloc(AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    vmm::page_insert(pgdir, frame, va, pte::U | pte::W, id, None).expect("page_insert falhou");

    // Grava um padrão conhecido no frame antes de mandá-lo para o disco.
    let pa = frame.to_phys(pmm::frame_base());
    unsafe {
        core::ptr::write_bytes(vmm::kernel_ptr_for_phys(pa), 0xAB, 64);
    }

    sched::register(env);

    kswapd::swap_out_blocking(frame);
    kassert!(vmm::page_lookup(pgdir, va).is_none());
    let slot = swap::pending_slot(pgdir, va).expect("PTE deveria codificar um slot após o swap-out");

    kswapd::request_swap_in(id, va, slot).expect("request_swap_in falhou");
    kassert!(kswapd::run_once());

    let (new_frame, _) = vmm::page_lookup(pgdir, va).expect("page_lookup não achou nada após o swap-in");
    let new_pa = new_frame.to_phys(pmm::frame_base());
    let content = unsafe { core::slice::from_raw_parts(vmm::kernel_ptr_for_phys(new_pa), 64) };
    kassert!(content.iter().all(|&b| b == 0xAB));
});

pub fn run() {
    run_test_suite(
        "mm::swap",
        &[
            TestCase::new("reserved_slot_is_never_the_sentinel", reserved_slot_is_never_the_sentinel),
            TestCase::new("encode_decode_pte_round_trips", encode_decode_pte_round_trips),
            TestCase::new("zeroed_pte_decodes_to_no_slot", zeroed_pte_decodes_to_no_slot),
            TestCase::new(
                "addref_keeps_slot_alive_until_last_release",
                addref_keeps_slot_alive_until_last_release,
            ),
            TestCase::new("stash_and_take_backrefs_round_trip", stash_and_take_backrefs_round_trip),
            TestCase::new("job_queue_is_fifo", job_queue_is_fifo),
            TestCase::new(
                "swap_out_then_swap_in_round_trips_page_contents",
                swap_out_then_swap_in_round_trips_page_contents,
            ),
        ],
    );
}
