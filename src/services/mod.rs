pub mod admin_service;
pub mod auth_service;
pub mod client_service;
pub mod contact_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use client_service::ClientService;
pub use contact_service::ContactService;
pub use user_service::UserService;
