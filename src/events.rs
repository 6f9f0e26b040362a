// Event types for async communication

use crate::api::ApiError;
use crate::models::Profile;

#[derive(Debug)]
pub enum AppEvent {
    /// The AI answered a chat message
    ChatReplied(Result<String, ApiError>),
    /// A profile request finished
    ProfileFetched(Result<Profile, ApiError>),
}
