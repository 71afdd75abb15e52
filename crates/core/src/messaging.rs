//! Direct message rules.

use crate::error::CoreError;
use crate::media::{MediaKey, MediaSnapshot};
use crate::profiles::Visibility;
use crate::types::UserId;

pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Shareable title attached to a message.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaCard {
    pub key: MediaKey,
    pub snapshot: MediaSnapshot,
}

/// A validated message ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub body: Option<String>,
    pub card: Option<MediaCard>,
}

impl MessageDraft {
    /// Validate a message: a body, a media card, or both.
    pub fn new(body: Option<&str>, card: Option<MediaCard>) -> Result<Self, CoreError> {
        let body = body.map(str::trim).filter(|b| !b.is_empty());
        if body.is_none() && card.is_none() {
            return Err(CoreError::Validation(
                "A message needs a body or a media card".to_string(),
            ));
        }
        if let Some(text) = body {
            if text.chars().count() > MAX_MESSAGE_LENGTH {
                return Err(CoreError::Validation(format!(
                    "Message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
                )));
            }
        }
        if let Some(card) = &card {
            card.snapshot.validate()?;
        }
        Ok(Self {
            body: body.map(str::to_string),
            card,
        })
    }
}

/// Check the sender may message the recipient.
///
/// Private recipients only accept messages from users connected to them in
/// either direction.
pub fn check_can_message(
    sender: UserId,
    recipient: UserId,
    recipient_visibility: Visibility,
    connected: bool,
) -> Result<(), CoreError> {
    if sender == recipient {
        return Err(CoreError::Validation(
            "You cannot message yourself".to_string(),
        ));
    }
    if recipient_visibility.is_private() && !connected {
        return Err(CoreError::Forbidden(
            "This user only accepts messages from connections".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::media::MediaType;

    fn card() -> MediaCard {
        MediaCard {
            key: MediaKey::new(MediaType::Movie, 603).unwrap(),
            snapshot: MediaSnapshot {
                title: Some("The Matrix".into()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn needs_body_or_card() {
        assert_matches!(MessageDraft::new(Some("  "), None), Err(CoreError::Validation(_)));
        assert!(MessageDraft::new(None, Some(card())).is_ok());

        let draft = MessageDraft::new(Some(" watch this "), Some(card())).unwrap();
        assert_eq!(draft.body.as_deref(), Some("watch this"));
    }

    #[test]
    fn body_length_limit() {
        let long = "m".repeat(MAX_MESSAGE_LENGTH + 1);
        assert_matches!(MessageDraft::new(Some(&long), None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn messaging_rules() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_matches!(
            check_can_message(a, a, Visibility::Public, false),
            Err(CoreError::Validation(_))
        );
        assert!(check_can_message(a, b, Visibility::Public, false).is_ok());
        assert_matches!(
            check_can_message(a, b, Visibility::Private, false),
            Err(CoreError::Forbidden(_))
        );
        assert!(check_can_message(a, b, Visibility::Private, true).is_ok());
    }
}
