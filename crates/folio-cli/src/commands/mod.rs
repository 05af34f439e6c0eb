//! Command implementations.

pub mod ask;
pub mod chunk;
pub mod evaluate;
pub mod index;
pub mod ingest;
pub mod search;

pub use self::ask::execute_ask;
pub use self::chunk::execute_chunk;
pub use self::evaluate::execute_evaluate;
pub use self::index::execute_index;
pub use self::ingest::execute_ingest;
pub use self::search::execute_search;
