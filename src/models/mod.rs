mod aggregate;
mod errors;
mod flag;
mod ledger;
mod movement;
mod transaction;

pub use aggregate::MonthlyAggregate;
pub use errors::DetectionError;
pub use flag::{AccountFlag, FlagType};
pub use ledger::{Ledger, REQUIRED_COLUMNS};
pub use movement::{ClassifiedMovement, Movement, MovementType, RankedMovement, Significance};
pub use transaction::{parse_amount, parse_date, Transaction};
