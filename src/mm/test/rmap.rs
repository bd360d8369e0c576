//! Invariantes do mapa reverso (§8/§9): inserir e remover o mesmo
//! (env, va) deixa a cabeça vazia de novo, múltiplas entradas convivem
//! sem se atropelar, e `take` esvazia atomicamente.

use crate::klib::test_framework::{run_test_suite, TestCase};
use crate::mm::rmap::BackRefHead;
use crate::sched::EnvId;
use crate::{kassert, kassert_eq};

crate::ktest!(insert_then_remove_empties_head, {
    let mut head = BackRefHead::EMPTY;
    kassert!(head.is_empty());
    head.insert(EnvId(1), 0x1000);
    kassert!(!head.is_empty());
    head.remove(EnvId(1), 0x1000);
    kassert!(head.is_empty());
});

crate::ktest!(removing_unknown_entry_is_a_no_op, {
    let mut head = BackRefHead::EMPTY;
    head.insert(EnvId(1), 0x1000);
    head.remove(EnvId(2), 0x2000);
    kassert!(!head.is_empty());
    head.remove(EnvId(1), 0x1000);
    kassert!(head.is_empty());
});

crate::ktest!(multiple_back_refs_are_all_visited, {
    let mut head = BackRefHead::EMPTY;
    head.insert(EnvId(1), 0x1000);
    head.insert(EnvId(2), 0x2000);
    head.insert(EnvId(3), 0x3000);
    let mut count = 0;
    head.for_each(|_, _| count += 1);
    kassert_eq!(count, 3);
    head.remove(EnvId(2), 0x2000);
    count = 0;
    head.for_each(|_, _| count += 1);
    kassert_eq!(count, 2);
});

crate::ktest!(take_empties_and_returns_the_list, {
    let mut head = BackRefHead::EMPTY;
    head.insert(EnvId(7), 0x4000);
    let taken = head.take();
    kassert!(head.is_empty());
    kassert!(!taken.is_empty());
});

pub fn run() {
    run_test_suite(
        "mm::rmap",
        &[
            TestCase::new("insert_then_remove_empties_head", insert_then_remove_empties_head),
            TestCase::new("removing_unknown_entry_is_a_no_op", removing_unknown_entry_is_a_no_op),
            TestCase::new("multiple_back_refs_are_all_visited", multiple_back_refs_are_all_visited),
            TestCase::new("take_empties_and_returns_the_list", take_empties_and_returns_the_list),
        ],
    );
}
