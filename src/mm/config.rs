//! # Layout de Memória e Bits de PTE
//!
//! Tabelas de páginas de dois níveis (diretório de 1024 entradas, tabela
//! de 1024 entradas), frames pequenos de 4 KiB e frames grandes de 4 MiB
//! via `pte::PS`. Os números abaixo são os de um layout JOS-like clássico:
//! `inc/mmu.h`/`inc/memlayout.h` não vieram junto com `kern/pmap.c` na
//! árvore original (só os `.c` foram preservados), mas `pmap.c` os usa
//! sem redefini-los, então são canônicos desse layout e não uma invenção.

/// Tamanho de um frame pequeno.
pub const PGSIZE: usize = 4096;
pub const PGSHIFT: usize = 12;

/// Entradas por diretório/tabela de páginas (dois níveis, 10+10+12 bits).
pub const NPDENTRIES: usize = 1024;
pub const NPTENTRIES: usize = 1024;

/// Alcance de uma única entrada de diretório: o tamanho de um frame grande.
pub const PTSIZE: usize = PGSIZE * NPTENTRIES;
pub const HUGE_PGSIZE: usize = PTSIZE;
pub const PDXSHIFT: usize = 22;
pub const PTXSHIFT: usize = 12;

/// Número máximo de ambientes (usado para dimensionar `UENVS`).
pub const NENV: usize = 1024;

/// Início do espaço de endereço do kernel; mapeado 1:1 para [0, 2^32 - KERNBASE).
pub const KERNBASE: usize = 0xF000_0000;

pub const KSTACKTOP: usize = KERNBASE;
pub const KSTKSIZE: usize = 8 * PGSIZE;
/// Lacuna entre pilhas de kernel vizinhas: um estouro de pilha esbarra em
/// uma página não mapeada em vez de corromper a pilha seguinte.
pub const KSTKGAP: usize = 8 * PGSIZE;

pub const MMIOLIM: usize = KSTACKTOP - PTSIZE;
pub const MMIOBASE: usize = MMIOLIM - PTSIZE;

pub const ULIM: usize = MMIOBASE;
pub const UVPT: usize = ULIM - PTSIZE;
pub const UPAGES: usize = UVPT - PTSIZE;
pub const UENVS: usize = UPAGES - PTSIZE;

/// Topo do espaço de endereço de usuário; acima disso só o kernel mapeia.
pub const UTOP: usize = UENVS;
pub const UXSTACKTOP: usize = UTOP;
pub const USTACKTOP: usize = UTOP - 2 * PGSIZE;
pub const UTEXT: usize = 0x0080_0000;

/// Bits de entrada de tabela/diretório de páginas.
pub mod pte {
    pub const P: u32 = 0x001; // present
    pub const W: u32 = 0x002; // writable
    pub const U: u32 = 0x004; // acessível em modo usuário
    pub const PWT: u32 = 0x008; // write-through
    pub const PCD: u32 = 0x010; // cache desabilitado
    pub const A: u32 = 0x020; // accessed
    pub const D: u32 = 0x040; // dirty
    pub const PS: u32 = 0x080; // page size (frame de 4MiB quando em diretório)
    pub const G: u32 = 0x100; // global

    /// Máscara dos 20 bits de endereço físico de frame (bits 12..32).
    pub const ADDR_MASK: u32 = 0xFFFF_F000;
    /// Máscara dos 12 bits de flags baixos.
    pub const FLAGS_MASK: u32 = 0x0000_0FFF;
}

pub const fn pdx(va: usize) -> usize {
    (va >> PDXSHIFT) & (NPDENTRIES - 1)
}

pub const fn ptx(va: usize) -> usize {
    (va >> PTXSHIFT) & (NPTENTRIES - 1)
}

pub const fn pgnum(pa: usize) -> usize {
    pa >> PGSHIFT
}

pub const fn page_align_down(addr: usize) -> usize {
    addr & !(PGSIZE - 1)
}

pub const fn page_align_up(addr: usize) -> usize {
    (addr + PGSIZE - 1) & !(PGSIZE - 1)
}

pub const fn is_page_aligned(addr: usize) -> bool {
    addr & (PGSIZE - 1) == 0
}

pub const fn huge_align_down(addr: usize) -> usize {
    addr & !(HUGE_PGSIZE - 1)
}

pub const fn is_huge_aligned(addr: usize) -> bool {
    addr & (HUGE_PGSIZE - 1) == 0
}
