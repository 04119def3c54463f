pub mod grant;
pub mod session;
pub mod token;
pub mod token_store;
pub mod user_info;

pub use grant::{Credentials, Grant};
pub use session::Session;
pub use token::TokenPair;
pub use token_store::{FileTokenStore, StoredSession, TokenStore};
pub use user_info::{UserInfo, UserInfoWidget};
