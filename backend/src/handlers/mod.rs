pub mod directory;
pub mod feed;
pub mod requests;
pub mod user;

pub use directory::{get_user, register_user};
pub use feed::get_feed;
pub use requests::{review_request, send_request};
pub use user::{connection_status, list_connections, received_requests, sent_requests};
