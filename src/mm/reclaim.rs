//! Política de envelhecimento estilo relógio e o caminho de reclaim
//! direto e síncrono usado quando [`crate::mm::pmm::alloc`] não acha
//! frame livre.
//!
//! Espelha `direct_page_reclaim`/`kswapd` do original: varre as VMAs de
//! todo ambiente de usuário executável, envelhece cada PTE presente e
//! escolhe a mais fria para sair. A única diferença real entre este
//! caminho e o do worker cooperativo (`kswapd.rs`) é que aqui a escrita
//! em disco acontece na hora, bloqueando quem pediu o frame — não há
//! fila, não há cessão de CPU no meio do caminho.

use crate::mm::addr::VirtAddr;
use crate::mm::config::{self, pte};
use crate::mm::pmm::{self, FrameId};
use crate::mm::vmm;
use crate::sched::{self, Env};

/// Envelhece todas as PTEs presentes de `env`, chamando `observe(frame)`
/// para cada uma depois de atualizar `aging` e limpar o bit `A`.
fn age_env(env: &Env, mut observe: impl FnMut(FrameId)) {
    let vmas = env.vmas.lock().clone();
    for vma in vmas.iter() {
        let mut va = vma.va_start;
        let end = vma.va_start + vma.len;
        while va < end {
            let Some((frame, ptep)) = vmm::page_lookup(env.pgdir, VirtAddr::new(va)) else {
                va += config::PGSIZE;
                continue;
            };
            let accessed = unsafe { *ptep & pte::A != 0 };
            pmm::age(frame, accessed);
            unsafe {
                *ptep &= !pte::A;
            }
            observe(frame);
            va += vmm::mapping_size(env.pgdir, VirtAddr::new(va)).unwrap_or(config::PGSIZE);
        }
    }
}

/// Reclaim direto e síncrono (§4.5/§4.7): escolhe a vítima mais fria
/// entre todos os ambientes de usuário executáveis e a escreve em disco
/// imediatamente. Sem vítima (nenhuma página de usuário presente), só
/// registra o estouro — quem chamou `pmm::alloc` recebe `Oom`.
pub fn direct_reclaim() {
    let mut victim: Option<FrameId> = None;
    sched::for_each_runnable(|env| {
        if env.env_type == crate::sched::EnvType::Kernel {
            return;
        }
        age_env(env, |frame| {
            if victim.map_or(true, |v| pmm::aging(frame) < pmm::aging(v)) {
                victim = Some(frame);
            }
        });
    });

    match victim {
        Some(frame) => crate::mm::kswapd::swap_out_blocking(frame),
        None => crate::kwarn!("mm::reclaim: nenhuma vítima disponível, OOM real"),
    }
}

/// Passe periódico do relógio (§4.5): envelhece toda PTE presente de todo
/// ambiente de usuário executável e, para cada frame que chega a
/// `aging == 0`, enfileira um `SwapOut` assíncrono para o worker cooperativo
/// em vez de escrever em disco na hora — ao contrário de [`direct_reclaim`],
/// este passe nunca bloqueia quem o chama.
pub fn clock_tick() {
    sched::for_each_runnable(|env| {
        if env.env_type == crate::sched::EnvType::Kernel {
            return;
        }
        age_env(env, |frame| {
            if pmm::aging(frame) == 0 {
                crate::mm::swap::enqueue_swap_out(frame);
            }
        });
    });
}
