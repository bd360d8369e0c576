//! Entry Point Lógico do Kernel.
//!
//! Orquestra a inicialização de todos os subsistemas na ordem correta
//! de dependência. CPU bring-up (GDT/IDT/APIC), scheduler preemptivo,
//! IPC e filesystem ficam fora de escopo aqui: este kernel de ensino
//! entrega apenas gerência de memória física e paginação sob demanda;
//! o resto mora em colaboradores externos que este repositório não
//! implementa.

use crate::arch::platform::Cpu;
use crate::arch::traits::CpuOps;
use crate::core::handoff::{BootInfo, BOOT_MAGIC};

/// Função principal do Kernel (High-Level).
pub fn kernel_main(boot_info: &'static BootInfo) -> ! {
    // 1. Sanity Check (Segurança contra bootloaders incorretos)
    if boot_info.magic != BOOT_MAGIC {
        Cpu::hang();
    }

    // 2. Inicializar Logs (Serial)
    crate::drivers::serial::init();
    crate::kinfo!("==========================================");
    crate::kinfo!("kernel: initializing");
    crate::kinfo!("bootloader protocol v{}", boot_info.version);

    // 3. Memória (PMM, VMM, rmap, swap)
    crate::kinfo!("[init] mm: initializing");
    crate::mm::init(boot_info);

    // 4. Self-tests (opcional, feature "self_test")
    crate::core::test::run_all();

    // 5. A partir daqui um colaborador externo (scheduler preemptivo real)
    // assumiria o controle. Sem um, as duas threads de kernel cooperativas
    // da gerência de memória (worker de swap e passe periódico de relógio)
    // só avançam se algo as chamar — então o próprio laço ocioso faz esse
    // papel, igual à idle task do colaborador externo de escalonamento:
    // dreno pendências a cada ciclo antes de voltar a dormir.
    crate::kinfo!("[init] done, idling");
    unsafe {
        Cpu::enable_interrupts();
    }

    let mut idle_ticks: u32 = 0;
    loop {
        while crate::mm::kswapd::run_once() {}
        if idle_ticks % CLOCK_TICK_INTERVAL == 0 {
            crate::mm::reclaim::clock_tick();
        }
        idle_ticks = idle_ticks.wrapping_add(1);
        crate::sched::kernel_thread_sleep(1);
    }
}

/// Período, em ciclos do laço ocioso, entre dois passes do relógio de
/// envelhecimento (§4.5) — dreno do worker de swap acontece a cada ciclo,
/// a amostragem de acesso é mais cara e roda com menos frequência.
const CLOCK_TICK_INTERVAL: u32 = 16;
