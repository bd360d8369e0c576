//! # Fachada de Ambientes (Env) e Execução
//!
//! Este módulo **não** é um scheduler. Ele é a superfície mínima que o
//! gerenciador de memória física espera de um registro de ambientes e de
//! um escalonador reais: uma lista de ambientes executáveis, os campos
//! por-ambiente que `mm` lê/escreve (diretório de páginas, lista de
//! VMAs, lock de memória, contador de page faults, tipo, status) e duas
//! primitivas cooperativas (`kernel_thread_sleep`, `kernel_thread_desched`).
//!
//! O algoritmo de escalonamento, troca de contexto, bring-up de Ring 3 e
//! ciclo de vida completo de um ambiente (criação a partir de um binário,
//! fork, `envid2env` com checagem de permissão) ficam fora deste
//! repositório — aqui só existe o suficiente para `mm::swap`/`mm::reclaim`
//! terem algo real para chamar.

pub mod env;

pub use env::{Env, EnvId, EnvStatus, EnvType, Vma};

use crate::arch::traits::CpuOps;
use crate::sync::Spinlock;
use alloc::vec::Vec;

/// Lock #1 da hierarquia: protege o registro de ambientes e a lista de
/// execução.
static REGISTRY: Spinlock<Vec<Env>> = Spinlock::new(Vec::new());

/// Registra um novo ambiente e retorna seu id.
pub fn register(env: Env) -> EnvId {
    let mut envs = REGISTRY.lock();
    let id = env.id;
    envs.push(env);
    id
}

/// Executa `f` com acesso mutável ao ambiente `id`, sob o lock do
/// registro. Retorna `None` se o ambiente não existe (já destruído).
pub fn with_env<R>(id: EnvId, f: impl FnOnce(&mut Env) -> R) -> Option<R> {
    let mut envs = REGISTRY.lock();
    envs.iter_mut().find(|e| e.id == id).map(f)
}

/// Marca o ambiente como `RUNNABLE` e o reinsere na lista de execução.
///
/// Usado pelo worker de swap ao concluir um `SwapIn` (§4.6): o ambiente
/// que sofreu o fault pode voltar a ser escalonado.
pub fn reenqueue_runnable(id: EnvId) {
    with_env(id, |e| e.status = EnvStatus::Runnable);
}

/// Itera todos os ambientes atualmente `RUNNABLE`.
///
/// Consumido pelo passe de relógio (`mm::reclaim`) para envelhecer PTEs
/// de todo ambiente executável.
pub fn for_each_runnable(mut f: impl FnMut(&mut Env)) {
    let mut envs = REGISTRY.lock();
    for e in envs.iter_mut() {
        if e.status == EnvStatus::Runnable || e.status == EnvStatus::Running {
            f(e);
        }
    }
}

/// Cede a CPU cooperativamente por `ticks` unidades de tempo.
///
/// Sem um escalonador real por trás, isso apenas segura a CPU ociosa;
/// ainda assim é o ponto de suspensão correto para quem só pode ceder,
/// nunca ser preemptado à força, enquanto segura locks de nível baixo.
pub fn kernel_thread_sleep(ticks: u32) {
    for _ in 0..ticks {
        crate::arch::platform::Cpu::halt();
    }
}

/// Desagenda a thread de kernel atual até ser explicitamente reacordada.
///
/// Facade: em um escalonador real isso removeria a thread da run list até
/// um wake-up; aqui equivale a um único `halt`.
pub fn kernel_thread_desched() {
    crate::arch::platform::Cpu::halt();
}
