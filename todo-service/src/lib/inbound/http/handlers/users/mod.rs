pub mod get_current_user;
pub mod login;
pub mod logout;
pub mod register_user;

pub use get_current_user::get_current_user;
pub use login::login;
pub use logout::logout;
pub use register_user::register_user;
