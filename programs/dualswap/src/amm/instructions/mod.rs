pub mod add_liquidity;
pub mod claim_fees;
pub mod create_pool;
pub mod open_position;
pub mod reinvest_fees;
pub mod remove_liquidity;
pub mod swap;

pub use add_liquidity::*;
pub use claim_fees::*;
pub use create_pool::*;
pub use open_position::*;
pub use reinvest_fees::*;
pub use remove_liquidity::*;
pub use swap::*;
