//! Self-tests do gerenciador de memória física e paginação sob demanda.
//!
//! Rodam depois de `mm::init` (heap e diretório do kernel já de pé), a
//! partir de `core::test::run_all`. Cobrem as invariantes de §8: frames
//! nunca são entregues duas vezes enquanto referenciados, o mapa reverso
//! nunca aponta para um (env, va) que não mapeia mais o frame, e a
//! tabela de slots de swap nunca entrega o slot sentinela.

mod pmm;
mod reclaim;
mod rmap;
mod swap;
mod vmm;

pub fn run_all() {
    pmm::run();
    rmap::run();
    vmm::run();
    swap::run();
    reclaim::run();
}
