pub mod facility;
pub mod ledger;
pub mod records;
pub mod series;

pub use facility::*;
pub use ledger::*;
pub use records::*;
pub use series::*;
