mod change;
mod find;

pub use change::ChangeArgs;
pub use change::handle_change;
pub use find::FindArgs;
pub use find::handle_find;
