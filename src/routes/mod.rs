mod admin;
mod chirps;
mod health_check;
mod sessions;
pub mod users;

pub use admin::{metrics, reset};
pub use chirps::{create_chirp, delete_chirp, get_chirp_by_id, get_chirps, validate_chirp};
pub use health_check::health_check;
pub use sessions::{login, refresh, revoke};
pub use users::{create_user, polka_webhooks, update_user};
