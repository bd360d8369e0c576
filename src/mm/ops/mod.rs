//! Operações de memória crua (`memcpy`/`memset`/...) usadas pelo runtime
//! `no_std` e pelo restante de `mm`. Sem relação com a semântica de
//! paginação; é só a intrínseca que o compilador espera encontrar.

pub mod compiler;
pub mod memops;
