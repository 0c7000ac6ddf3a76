pub mod add_liquidity;
pub mod burn_empty_position;
pub mod create_community_pool;
pub mod create_pool;
pub mod initialize_bin;
pub mod modify_liquidity;
pub mod open_position;
pub mod remove_liquidity;
pub mod swap;

pub use add_liquidity::*;
pub use burn_empty_position::*;
pub use create_community_pool::*;
pub use create_pool::*;
pub use initialize_bin::*;
pub use modify_liquidity::*;
pub use open_position::*;
pub use remove_liquidity::*;
pub use swap::*;
