//! Public profile of a signed-in user.

use serde::{Deserialize, Serialize};

/// What the rest of the application may know about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
}
