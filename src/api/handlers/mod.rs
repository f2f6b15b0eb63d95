pub mod root;
pub mod auth;
pub mod users;
pub mod events;
pub mod registrations;
pub mod announcements;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
