pub mod align;
pub mod builder;
pub mod constraints;
pub mod scenario;
pub mod storage;
pub mod volatility;

pub use align::*;
pub use builder::*;
pub use constraints::*;
pub use scenario::*;
pub use storage::*;
pub use volatility::*;
