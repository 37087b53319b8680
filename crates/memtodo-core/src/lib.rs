pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod observer;
pub mod shared;
pub mod store;

pub use config::{Config, DisplayConfig, LoggingConfig, StoreConfig};
pub use error::{MemtodoError, Result};
pub use ids::IdGenerator;
pub use models::*;
pub use observer::{Observers, Subscription};
pub use shared::{SharedStore, StoreEvent};
pub use store::TodoStore;
