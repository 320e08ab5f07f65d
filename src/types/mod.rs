mod period;

pub use period::Period;

pub type AccountName = String;
