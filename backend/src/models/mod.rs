pub mod requests;
pub mod users;

pub use requests::{
    canonical_pair, ConnectionRequest, Party, ReceivedRequest, RequestRow, RequestStatus,
    ReviewStatus, SendStatus, SentRequest,
};
pub use users::{NewUser, User, UserSummary};
