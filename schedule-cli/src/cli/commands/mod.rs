pub mod export;
pub mod generate;
pub mod inspect;
pub mod login;
pub mod roster;
