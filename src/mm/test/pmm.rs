//! Invariantes do alocador de frames (§8: frame nunca sai livre duas
//! vezes, `ref_count` governa a devolução à free-list, relógio de
//! envelhecimento decai por deslocamento bit a bit).

use crate::klib::test_framework::{run_test_suite, TestCase, TestResult};
use crate::mm::pmm::{self, AllocFlags};
use crate::{kassert, kassert_eq};

crate::ktest!(alloc_decref_returns_frame, {
    let before = pmm::frame_count();
    let frame = match pmm::alloc(AllocFlags::empty()) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    kassert_eq!(pmm::ref_count(frame), 0);
    pmm::incref(frame);
    kassert_eq!(pmm::ref_count(frame), 1);
    pmm::decref(frame);
    kassert_eq!(pmm::frame_count(), before);
});

crate::ktest!(two_allocs_are_distinct_frames, {
    let a = match pmm::alloc(AllocFlags::empty()) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    let b = match pmm::alloc(AllocFlags::empty()) {
        Ok(f) => f,
        Err(_) => {
            pmm::incref(a);
            pmm::decref(a);
            return TestResult::Skip;
        }
    };
    kassert!(a != b);
    pmm::incref(a);
    pmm::incref(b);
    pmm::decref(a);
    pmm::decref(b);
});

crate::ktest!(zero_flag_clears_frame_contents, {
    let frame = match pmm::alloc(AllocFlags::ZERO) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    pmm::incref(frame);
    let pa = frame.to_phys(pmm::frame_base());
    let ptr = unsafe { crate::mm::vmm::kernel_ptr_for_phys(pa) };
    let slice = unsafe { core::slice::from_raw_parts(ptr, crate::mm::config::PGSIZE) };
    kassert!(slice.iter().all(|&b| b == 0));
    pmm::decref(frame);
});

crate::ktest!(aging_decays_by_shift_not_logical_or, {
    let frame = match pmm::alloc(AllocFlags::empty()) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    pmm::incref(frame);
    pmm::age(frame, true);
    kassert_eq!(pmm::aging(frame), 0x80);
    pmm::age(frame, false);
    kassert_eq!(pmm::aging(frame), 0x40);
    pmm::age(frame, true);
    kassert_eq!(pmm::aging(frame), 0x80 | 0x20);
    pmm::decref(frame);
});

crate::ktest!(coldest_picks_lowest_aging, {
    let a = match pmm::alloc(AllocFlags::empty()) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    let b = match pmm::alloc(AllocFlags::empty()) {
        Ok(f) => f,
        Err(_) => {
            pmm::incref(a);
            pmm::decref(a);
            return TestResult::Skip;
        }
    };
    pmm::incref(a);
    pmm::incref(b);
    pmm::age(a, true);
    pmm::age(b, false);
    let cold = pmm::coldest([a, b].into_iter());
    kassert_eq!(cold, Some(b));
    pmm::decref(a);
    pmm::decref(b);
});

crate::ktest!(back_refs_survive_independently_of_alloc_flags, {
    let frame = match pmm::alloc(AllocFlags::empty()) {
        Ok(f) => f,
        Err(_) => return TestResult::Skip,
    };
    pmm::incref(frame);
    let was_empty = pmm::with_back_refs(frame, |refs| refs.is_empty());
    kassert!(was_empty);
    pmm::decref(frame);
});

pub fn run() {
    run_test_suite(
        "mm::pmm",
        &[
            TestCase::new("alloc_decref_returns_frame", alloc_decref_returns_frame),
            TestCase::new("two_allocs_are_distinct_frames", two_allocs_are_distinct_frames),
            TestCase::new("zero_flag_clears_frame_contents", zero_flag_clears_frame_contents),
            TestCase::new("aging_decays_by_shift_not_logical_or", aging_decays_by_shift_not_logical_or),
            TestCase::new("coldest_picks_lowest_aging", coldest_picks_lowest_aging),
            TestCase::new(
                "back_refs_survive_independently_of_alloc_flags",
                back_refs_survive_independently_of_alloc_flags,
            ),
        ],
    );
}
