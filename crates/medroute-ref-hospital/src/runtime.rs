//! Wiring of the hospital runtime.

use std::sync::Arc;

use medroute_contracts::error::MedrouteResult;
use medroute_core::{traits::TextGenerator, Coordinator, SubAgentExecutor, ToolCatalog};
use medroute_policy::TomlScopePolicy;
use medroute_verify::SchemaArgumentVerifier;

use crate::{resolver::NikResolver, store::InMemoryRecordStore};

/// Build a coordinator over the hospital catalog with `generator` serving
/// every model call.
pub fn build_coordinator(
    generator: Arc<dyn TextGenerator>,
    store: InMemoryRecordStore,
    policy: TomlScopePolicy,
) -> Coordinator {
    let catalog = Arc::new(ToolCatalog::hospital());
    let executor = SubAgentExecutor::new(
        Arc::clone(&catalog),
        Arc::clone(&generator),
        Box::new(store),
        Box::new(policy),
        Box::new(NikResolver::default()),
        Box::new(SchemaArgumentVerifier::new()),
    );
    Coordinator::new(catalog, generator, executor)
}

/// Mock records, the embedded scoping policy, no simulated latency.
pub fn mock_coordinator(generator: Arc<dyn TextGenerator>) -> MedrouteResult<Coordinator> {
    Ok(build_coordinator(
        generator,
        InMemoryRecordStore::hospital()?,
        TomlScopePolicy::hospital()?,
    ))
}
