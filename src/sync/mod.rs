//! # Synchronization Primitives
//!
//! Este módulo fornece as abstrações necessárias para garantir a integridade de dados em um ambiente
//! de kernel concorrente (Multicore e Interrupt-driven).
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Mutual Exclusion:** Garante que apenas uma CPU (ou fluxo de execução) acesse um dado por vez.
//! - **Interior Mutability:** Permite modificar dados compartilhados (`static`) de forma segura (`Send` + `Sync`).
//!
//! ## 🏗️ Arquitetura: Spinlocks
//! Atualmente, o Redstone OS utiliza **Spinlocks** (`spin::Mutex`).
//! - **Comportamento:** Se o lock está ocupado, a thread entra em loop infinito (busy wait) até liberar.
//! - **Custo:** Alto uso de CPU durante a espera, mas zero overhead de escalonamento (não dorme).
//!
//! ## 🔍 Análise Crítica (Kernel Engineer's View)
//!
//! ### ✅ Pontos Fortes
//! - **Lazy Initialization:** O uso de `spin::Lazy` resolve o problema do "Static Initialization Order Fiasco", permitindo
//!   inicializar globais complexos (como heaps e drivers) na primeira utilização.
//!
//! ### ⚠️ Pontos de Atenção (Dívida Técnica)
//! - **Deadlock por Interrupção:** O `spin::Mutex` padrão **NÃO** desabilita interrupções.
//!   - *Cenário:* Thread A pega Lock X. Interrupção ocorre. Handler da Interrupção tenta pegar Lock X.
//!   - *Resultado:* Deadlock eterno na mesma CPU.
//! - **Priority Inversion:** Spinlocks simples não previnem inversão de prioridade (embora em SMP round-robin isso seja menos crítico hoje).
//!
//! ## 🛠️ `Spinlock` (IRQ-safe)
//! O gerenciador de memória física usa uma hierarquia estrita de locks (scheduler,
//! fila de jobs de swap, metadados de swap, memória por ambiente, alocador de
//! frames, disco) onde cada um pode ser contendido a partir de um handler de
//! interrupção. `spin::Mutex` sozinho não basta: ver `Spinlock` abaixo.
//!
//! --------------------------------------------------------------------------------

// Re-exporta o Mutex da crate `spin` para dados só tocados fora de handlers.
pub use spin::{Mutex, MutexGuard};

/// Wrapper para garantir inicialização preguiçosa segura.
pub use spin::Lazy;

mod spinlock;

pub use spinlock::{Spinlock, SpinlockGuard};
