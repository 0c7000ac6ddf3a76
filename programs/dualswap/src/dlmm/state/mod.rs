pub mod bin;
pub mod pool;
pub mod position;

pub use bin::*;
pub use pool::*;
pub use position::*;
