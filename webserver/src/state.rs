//! Shared handler state

use std::sync::Arc;

use curator::{DecisionOracle, DocumentGenerator, ItemStore, Optimizer, OptimizerSettings, Sampling};

/// Everything the handlers need, shared behind one `Arc`
pub struct AppState<S, O>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    pub store: Arc<S>,
    pub optimizer: Optimizer<S, O>,
    pub generator: DocumentGenerator<S, O>,
}

impl<S, O> AppState<S, O>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    pub fn new(store: Arc<S>, oracle: Arc<O>, settings: OptimizerSettings, generation: Sampling) -> Self {
        Self {
            optimizer: Optimizer::new(store.clone(), oracle.clone(), settings),
            generator: DocumentGenerator::new(store.clone(), oracle, generation),
            store,
        }
    }
}
