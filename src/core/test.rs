//! Agregador dos self-tests do kernel.
//!
//! Rodado a partir de `kernel_main` quando a feature `self_test` está
//! habilitada, em vez de `cargo test` (o kernel não tem um host para rodar
//! um harness convencional).

#[cfg(feature = "self_test")]
pub fn run_all() {
    crate::mm::test::run_all();
}

#[cfg(not(feature = "self_test"))]
pub fn run_all() {}
