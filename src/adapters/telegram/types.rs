//! Bot API wire types.
//!
//! Only the fields the bot reads or writes are modelled; everything else in
//! the payloads is ignored by serde.

use serde::{Deserialize, Serialize};

use crate::application::bot::Keyboard;
use crate::application::{Inbound, Sender};
use crate::domain::foundation::UserId;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// An update reduced to what the router needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub chat_id: i64,
    pub sender: Sender,
    pub inbound: Inbound,
    /// Set for button presses, which must be acknowledged.
    pub callback_id: Option<String>,
}

impl Update {
    /// Extracts a text message or a button press; other updates yield `None`.
    pub fn into_incoming(self) -> Option<Incoming> {
        if let Some(message) = self.message {
            let from = message.from?;
            let text = message.text?;
            return Some(Incoming {
                chat_id: message.chat.id,
                sender: from.into_sender(),
                inbound: Inbound::Text(text),
                callback_id: None,
            });
        }

        let query = self.callback_query?;
        // Buttons on inaccessible messages have nowhere to reply to.
        let chat_id = query.message.as_ref()?.chat.id;
        Some(Incoming {
            chat_id,
            sender: query.from.into_sender(),
            inbound: Inbound::Callback(query.data.unwrap_or_default()),
            callback_id: Some(query.id),
        })
    }
}

impl User {
    fn into_sender(self) -> Sender {
        Sender::new(UserId::new(self.id), self.username.unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdates {
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendPhoto<'a> {
    pub chat_id: i64,
    pub photo: &'a str,
    pub caption: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|b| InlineKeyboardButton {
                            text: b.label.clone(),
                            callback_data: b.data.clone(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::bot::Button;

    fn parse(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_message_becomes_text_inbound() {
        let update = parse(
            r#"{"update_id": 10, "message": {"message_id": 5,
                "from": {"id": 77, "is_bot": false, "first_name": "M", "username": "seeker"},
                "chat": {"id": 77, "type": "private"}, "date": 0, "text": "/read love?"}}"#,
        );

        let incoming = update.into_incoming().unwrap();

        assert_eq!(incoming.chat_id, 77);
        assert_eq!(incoming.sender, Sender::new(UserId::new(77), "seeker"));
        assert_eq!(incoming.inbound, Inbound::Text("/read love?".to_string()));
        assert!(incoming.callback_id.is_none());
    }

    #[test]
    fn missing_username_becomes_empty_handle() {
        let update = parse(
            r#"{"update_id": 1, "message": {"message_id": 1,
                "from": {"id": 3, "is_bot": false, "first_name": "A"},
                "chat": {"id": 3}, "text": "hi"}}"#,
        );

        assert_eq!(update.into_incoming().unwrap().sender.handle, "");
    }

    #[test]
    fn button_press_becomes_callback_inbound() {
        let update = parse(
            r#"{"update_id": 11, "callback_query": {"id": "cb-1",
                "from": {"id": 77, "is_bot": false, "first_name": "M"},
                "message": {"message_id": 9, "chat": {"id": 500}},
                "data": "gender_F"}}"#,
        );

        let incoming = update.into_incoming().unwrap();

        assert_eq!(incoming.chat_id, 500);
        assert_eq!(incoming.inbound, Inbound::Callback("gender_F".to_string()));
        assert_eq!(incoming.callback_id.as_deref(), Some("cb-1"));
    }

    #[test]
    fn non_text_updates_are_skipped() {
        let sticker = parse(
            r#"{"update_id": 12, "message": {"message_id": 1,
                "from": {"id": 1, "is_bot": false, "first_name": "A"},
                "chat": {"id": 1}, "sticker": {}}}"#,
        );
        let edited = parse(r#"{"update_id": 13, "edited_message": {}}"#);

        assert!(sticker.into_incoming().is_none());
        assert!(edited.into_incoming().is_none());
    }

    #[test]
    fn keyboard_serializes_as_inline_markup() {
        let keyboard = Keyboard::default()
            .row(vec![Button::new("Male", "gender_M"), Button::new("Female", "gender_F")]);

        let markup = InlineKeyboardMarkup::from(&keyboard);
        let json = serde_json::to_value(&markup).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"inline_keyboard": [[
                {"text": "Male", "callback_data": "gender_M"},
                {"text": "Female", "callback_data": "gender_F"}
            ]]})
        );
    }

    #[test]
    fn error_envelope_parses() {
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(
            r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#,
        )
        .unwrap();

        assert!(!response.ok);
        assert_eq!(response.error_code, Some(401));
        assert!(response.result.is_none());
    }
}
