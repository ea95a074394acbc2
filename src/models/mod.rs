pub mod account;
mod state;

pub use account::{Account, AccountProfile, Role};
pub use state::AppState;
