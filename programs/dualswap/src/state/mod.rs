pub mod bin_cache;
pub mod protocol;
pub mod whitelist;

pub use bin_cache::*;
pub use protocol::*;
pub use whitelist::*;
