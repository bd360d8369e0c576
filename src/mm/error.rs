//! Erros do gerenciador de memória física.
//!
//! Quatro categorias, cada uma com uma resposta fixa no chamador: `Oom`
//! mesmo depois de um reclaim direto é fatal para quem pediu o frame;
//! `Fault` é sempre fatal para o ambiente de usuário via
//! `user_mem_assert`; `Inval` é um bug do próprio kernel (double-free,
//! flags incompatíveis) e vira panic; `NoSlot` apenas faz o swap-out
//! virar no-op, a página continua residente.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmError {
    /// Nenhum frame livre mesmo após o reclaim direto.
    Oom,
    /// Checagem de acesso de usuário falhou (endereço fora de `UTOP`,
    /// permissão insuficiente, VMA inexistente).
    Fault,
    /// Operação inválida do ponto de vista do próprio kernel: double-free
    /// de frame, flags incompatíveis com o estado atual da PTE.
    Inval,
    /// Tabela de slots de swap cheia.
    NoSlot,
}

pub type MmResult<T> = Result<T, MmError>;
