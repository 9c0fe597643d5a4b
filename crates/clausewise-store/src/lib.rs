//! Clause store: the authoritative, ordered clause collection for one contract session.

mod contract;
mod error;
mod event;
mod file;
mod shared;

pub use contract::{ClauseSnapshot, ContractDocument, ContractStore, Delivery};
pub use error::StoreError;
pub use event::{ReviewAction, ReviewEvent};
pub use file::{load_contract, load_corpora, save_contract};
pub use shared::SharedContract;
