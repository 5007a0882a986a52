// State management module
// Handles credentials, conversations and the shared router state

pub mod app_state;
pub mod conversations;
pub mod credentials;
pub mod store;
pub mod users;

pub use app_state::AppState;
pub use store::{SharedStore, Store};
pub use users::User;
