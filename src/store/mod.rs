pub mod record;
pub mod source;
pub mod wallet_store;

pub use record::{BehavioralMetrics, FieldValue, WalletRecord};
pub use wallet_store::WalletStore;
