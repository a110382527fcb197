pub mod delete;
pub mod export;
pub mod get;
pub mod update;

pub use delete::delete_user;
pub use export::export_users;
pub use get::{get_user_by_id, get_users_page};
pub use update::update_user;
