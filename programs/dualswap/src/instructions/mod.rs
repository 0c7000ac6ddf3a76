pub mod initialize_dlmm_parameters;
pub mod initialize_protocol;
pub mod populate_bin_cache;
pub mod update_amm_fees;
pub mod update_dlmm_fees;
pub mod update_dlmm_parameters;
pub mod update_fee_preference;

pub use initialize_dlmm_parameters::*;
pub use initialize_protocol::*;
pub use populate_bin_cache::*;
pub use update_amm_fees::*;
pub use update_dlmm_fees::*;
pub use update_dlmm_parameters::*;
pub use update_fee_preference::*;
