//! Tests for tracing setup.

use conch_core::tracing::init_tracing;

#[test]
fn init_tracing_is_idempotent() {
    std::env::set_var("CONCH_LOG", "conch_storage=debug,conch_dispatch=warn");
    init_tracing();
    init_tracing();
    std::env::remove_var("CONCH_LOG");
    tracing::info!("still logging after repeated init");
}
