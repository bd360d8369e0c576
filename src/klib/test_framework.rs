//! # Framework de Self-Tests do Kernel
//!
//! Fornece estruturas e macros para testes padronizados.
//!
//! # Uso
//! ```rust
//! use crate::klib::test_framework::*;
//!
//! pub fn run_my_tests() {
//!     run_test_suite("Meu Módulo", &[
//!         test_something,
//!         test_another,
//!     ]);
//! }
//! ```

/// Resultado de um teste individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    /// Teste passou com sucesso.
    Pass,
    /// Teste falhou com mensagem.
    Fail,
    /// Teste foi pulado (não aplicável no contexto atual).
    Skip,
}

/// Estrutura para um caso de teste.
pub struct TestCase {
    /// Nome do teste (para logging).
    pub name: &'static str,
    /// Função que executa o teste.
    pub func: fn() -> TestResult,
}

impl TestCase {
    /// Cria um novo caso de teste.
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }

    /// Executa o teste e retorna o resultado.
    pub fn run(&self) -> TestResult {
        crate::kinfo!("[test] {}", self.name);
        let result = (self.func)();
        match result {
            TestResult::Pass => crate::kinfo!("[test] pass: {}", self.name),
            TestResult::Fail => crate::kerror!("[test] FAIL: {}", self.name),
            TestResult::Skip => crate::kwarn!("[test] skip: {}", self.name),
        }
        result
    }
}

/// Executa uma suíte de testes.
///
/// Se algum teste falhar, o kernel entra em panic.
/// Isso garante que o kernel só prossegue se todos os testes passarem.
pub fn run_test_suite(suite_name: &str, tests: &[TestCase]) {
    crate::kinfo!("=== suite: {} ===", suite_name);

    let mut passed = 0usize;
    let mut skipped = 0usize;

    // Usar while para evitar iteradores (caso SSE ainda seja problema)
    let mut i = 0;
    while i < tests.len() {
        let test = &tests[i];
        match test.run() {
            TestResult::Pass => passed += 1,
            TestResult::Fail => {
                crate::kerror!("suite failed: {}", suite_name);
                panic!("test suite failed - kernel halted");
            }
            TestResult::Skip => skipped += 1,
        }
        i += 1;
    }

    crate::kinfo!(
        "=== suite passed: {} ({} passed, {} skipped) ===",
        suite_name,
        passed,
        skipped
    );
}

/// Macro para criar asserções em testes.
///
/// Se a condição for falsa, loga erro e retorna Fail.
#[macro_export]
macro_rules! kassert {
    ($cond:expr) => {
        if !($cond) {
            crate::kerror!("ASSERTION FAILED: {}", stringify!($cond));
            return $crate::klib::test_framework::TestResult::Fail;
        }
    };
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            crate::kerror!("ASSERTION FAILED: {}", $msg);
            return $crate::klib::test_framework::TestResult::Fail;
        }
    };
}

/// Macro para criar asserções de igualdade.
#[macro_export]
macro_rules! kassert_eq {
    ($left:expr, $right:expr) => {
        if ($left) != ($right) {
            crate::kerror!(
                "assertion failed: {} != {}",
                stringify!($left),
                stringify!($right)
            );
            return $crate::klib::test_framework::TestResult::Fail;
        }
    };
}

/// Macro para definir um teste simples.
///
/// Uso:
/// ```rust
/// ktest!(test_name, {
///     // código do teste
///     kassert!(true);
/// });
/// ```
#[macro_export]
macro_rules! ktest {
    ($name:ident, $body:block) => {
        pub fn $name() -> $crate::klib::test_framework::TestResult {
            $body
            $crate::klib::test_framework::TestResult::Pass
        }
    };
}
