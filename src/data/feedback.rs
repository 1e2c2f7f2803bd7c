use utoipa::ToSchema;

use super::account::looks_like_email;
use crate::error::PortalError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactMessage {
    pub name: String,
    #[schema(format = "email")]
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), PortalError> {
        if self.name.chars().count() < 2 {
            return Err(PortalError::validation(
                "name",
                "Name must be at least 2 characters.",
            ));
        }
        if !looks_like_email(&self.email) {
            return Err(PortalError::validation(
                "email",
                "Please enter a valid email address.",
            ));
        }
        if self.message.chars().count() < 10 {
            return Err(PortalError::validation(
                "message",
                "Message must be at least 10 characters.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    /// Experience rating from 1 to 5.
    pub rating: Option<u8>,
    pub feedback: String,
}

impl Feedback {
    pub fn validate(&self) -> Result<(), PortalError> {
        match self.rating {
            Some(1..=5) => {}
            _ => return Err(PortalError::validation("rating", "Please select a rating.")),
        }
        if self.feedback.chars().count() < 10 {
            return Err(PortalError::validation(
                "feedback",
                "Feedback must be at least 10 characters.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Confirmation {
    pub title: String,
    pub description: String,
}

impl Confirmation {
    pub fn message_sent() -> Confirmation {
        Confirmation {
            title: "Message Sent".to_string(),
            description: "We've received your message and will get back to you soon.".to_string(),
        }
    }

    pub fn feedback_submitted() -> Confirmation {
        Confirmation {
            title: "Feedback Submitted".to_string(),
            description: "Thank you for your feedback!".to_string(),
        }
    }
}
