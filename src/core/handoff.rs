//! Interface de Handoff (Bootloader -> Kernel).
//! Define a estrutura de dados (ABI) passada do bootloader para o kernel.
//!
//! # Industrial Standard
//! - Structs `#[repr(C)]` para garantia de layout.
//! - Tipos primitivos (`u64`, `u32`) para portabilidade.
//! - Magic Number para validação de versão.
//!
//! Campos de vídeo/ACPI/initramfs do handoff original não são consumidos
//! pelo gerenciador de memória e foram deixados de fora: isso é superfície
//! de um colaborador externo (boot gráfico, descoberta de ACPI), não algo
//! que `mm::init` precise ler.

/// Assinatura mágica esperada do bootloader.
pub const BOOT_MAGIC: u64 = 0x524544_53544F4E45;

/// Estrutura de informações de boot.
/// Deve ser mantida em sincronia binária exata com o bootloader.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BootInfo {
    /// Assinatura para validação (deve ser igual a BOOT_MAGIC).
    pub magic: u64,

    /// Versão do protocolo de boot.
    pub version: u32,

    /// Mapa de memória física: ponteiro para um array de `MemoryMapEntry`.
    pub memory_map_addr: u64,
    pub memory_map_len: u64,

    /// Localização física da imagem do kernel, para que o PMM a exclua
    /// da lista livre.
    pub kernel_phys_addr: u64,
    pub kernel_size: u64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MemoryMapEntry {
    pub base: u64,
    pub len: u64,
    pub typ: MemoryType,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryType {
    Usable = 1,
    Reserved = 2,
    AcpiReclaimable = 3,
    AcpiNvs = 4,
    BadMemory = 5,
    BootloaderReclaimable = 6,
    KernelAndModules = 7,
}
