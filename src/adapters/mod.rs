// Adapters layer: concrete implementations for external systems (storage, config).

pub mod storage;
