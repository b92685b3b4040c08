pub mod include;
pub mod memory;
pub mod postgres;
pub mod store;

pub use include::{GraphScope, Include, Relation};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{RowStore, Store, UnitOfWork};
