pub mod instructions;
pub mod math;
pub mod state;

pub use instructions::*;
