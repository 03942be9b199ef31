pub mod account;
pub mod estimate;
pub mod loans;
pub mod planning;
pub mod savings;
