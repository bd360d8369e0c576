// =============================================================================
// KERNEL LOGGING SYSTEM
// =============================================================================
//
// Sistema de logging do kernel, escrito exclusivamente na serial (COM1).
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal de execução
// - DEBUG: Informações de debugging
// - TRACE: Detalhes extremos (cada operação)
//
// FEATURES:
// - no_logs:   Remove 100% dos logs (custo zero no binário)
// - log_info:  Habilita kdebug! além de error/warn/info
// - log_trace: Habilita kdebug! e ktrace!
//
// Uso: kinfo!("frame {:#x} liberado (refs={})", pa, refs);
//
// =============================================================================

use core::fmt::{self, Write};

use crate::drivers::serial;

pub const P_ERROR: &str = "\x1b[1;31m[erro]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[warn]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[info]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[debg]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[trac]\x1b[0m ";

/// Adaptador `core::fmt::Write` em cima do driver de serial cru.
///
/// O driver não conhece `core::fmt` de propósito (evita puxar código de
/// formatação para o caminho mais quente); este adaptador mora aqui, na
/// borda onde o logging realmente precisa de `write!`/`format_args!`.
pub struct SerialWriter;

impl Write for SerialWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        serial::emit_str(s);
        Ok(())
    }
}

/// Usado pelos macros `k*!`; não chamar diretamente.
#[doc(hidden)]
pub fn _log(prefix: &str, args: fmt::Arguments<'_>) {
    let mut w = SerialWriter;
    let _ = w.write_str(prefix);
    let _ = w.write_fmt(args);
    serial::emit_nl();
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {
        $crate::core::logging::_log($crate::core::logging::P_ERROR, format_args!($($arg)*))
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {
        $crate::core::logging::_log($crate::core::logging::P_WARN, format_args!($($arg)*))
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {
        $crate::core::logging::_log($crate::core::logging::P_INFO, format_args!($($arg)*))
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {{}};
}

#[cfg(any(feature = "log_trace", feature = "log_info"))]
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {
        $crate::core::logging::_log($crate::core::logging::P_DEBUG, format_args!($($arg)*))
    };
}

#[cfg(not(any(feature = "log_trace", feature = "log_info")))]
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log_trace")]
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {
        $crate::core::logging::_log($crate::core::logging::P_TRACE, format_args!($($arg)*))
    };
}

#[cfg(not(feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {{}};
}
