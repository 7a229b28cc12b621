//! Parsing of inbound chat text and button payloads.

use crate::domain::user::Gender;

/// A slash command with its argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Read(String),
    TopUp(String),
    Balance,
    Profile,
    History,
    Help,
    Menu,
    Stats,
    Unknown(String),
}

impl BotCommand {
    /// Parses `/name[@bot] args...`. Returns `None` for plain text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start();
        let rest = text.strip_prefix('/')?;

        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        // Group chats address commands as `/read@SomeBot`.
        let name = head.split('@').next().unwrap_or(head).to_lowercase();

        let command = match name.as_str() {
            "start" => BotCommand::Start,
            "read" => BotCommand::Read(args.to_string()),
            "topup" => BotCommand::TopUp(args.to_string()),
            "balance" => BotCommand::Balance,
            "profile" => BotCommand::Profile,
            "history" => BotCommand::History,
            "help" => BotCommand::Help,
            "menu" => BotCommand::Menu,
            "stats" => BotCommand::Stats,
            _ => BotCommand::Unknown(name),
        };
        Some(command)
    }
}

/// Entries of the inline menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Read,
    Balance,
    Profile,
    History,
    Help,
}

impl MenuAction {
    /// All entries, in display order.
    pub const ALL: [MenuAction; 5] = [
        MenuAction::Read,
        MenuAction::Balance,
        MenuAction::Profile,
        MenuAction::History,
        MenuAction::Help,
    ];

    pub fn callback_data(&self) -> &'static str {
        match self {
            MenuAction::Read => "menu_read",
            MenuAction::Balance => "menu_balance",
            MenuAction::Profile => "menu_profile",
            MenuAction::History => "menu_history",
            MenuAction::Help => "menu_help",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Read => "Get a reading",
            MenuAction::Balance => "Balance",
            MenuAction::Profile => "Profile",
            MenuAction::History => "History",
            MenuAction::Help => "Help",
        }
    }
}

/// Decoded inline button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Menu(MenuAction),
    Gender(Gender),
}

const GENDER_PREFIX: &str = "gender_";

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(code) = data.strip_prefix(GENDER_PREFIX) {
            return Gender::parse(code).map(CallbackAction::Gender);
        }
        MenuAction::ALL
            .into_iter()
            .find(|action| action.callback_data() == data)
            .map(CallbackAction::Menu)
    }

    /// Button payload for a gender option.
    pub fn gender_data(gender: Gender) -> String {
        format!("{}{}", GENDER_PREFIX, gender.code())
    }
}
