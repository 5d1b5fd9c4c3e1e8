mod mock_index_store;

pub use mock_index_store::MockIndexStore;
