//! User-facing texts.

use super::command::{CallbackAction, MenuAction};
use super::reply::{Button, Keyboard, Photo, Reply};
use crate::domain::catalog::Card;
use crate::domain::ledger::Price;
use crate::domain::reading::Reading;
use crate::domain::user::{Gender, UserAccount};
use crate::ports::UserStatistics;

const CURRENCY: &str = "RUB";
const NOT_SPECIFIED: &str = "not specified";

pub const HELP: &str = "Available commands:\n\
/read <question> - get a reading\n\
/balance - check your balance\n\
/topup <amount> - top up your balance\n\
/profile - your profile\n\
/history - your past readings\n\
/menu - open the menu\n\
/stats - statistics (admin only)";

pub const ASK_NAME: &str = "What is your name?";
pub const ASK_AGE: &str = "How old are you?";
pub const RETRY_AGE: &str = "Please enter a number. How old are you?";
pub const READ_USAGE: &str = "Put your question after the command: /read <your question>";
pub const TOPUP_USAGE: &str = "Usage: /topup <amount>, where amount is a positive whole number";
pub const EMPTY_HISTORY: &str = "Your history is empty.";
pub const UNKNOWN_COMMAND: &str = "Unknown command. Send /help for the list of commands.";
pub const APOLOGY: &str = "Something went wrong on our side. Please try again later.";

fn pricing_line(price: Price) -> String {
    format!(
        "The first reading is free. Each further reading costs {} {}.\n\
         Send /help for the list of commands.",
        price, CURRENCY
    )
}

fn gender_keyboard() -> Keyboard {
    Keyboard::default().row(
        Gender::OPTIONS
            .into_iter()
            .map(|g| Button::new(g.label(), CallbackAction::gender_data(g)))
            .collect(),
    )
}

pub fn ask_gender() -> Reply {
    Reply::text("What is your gender?").with_keyboard(gender_keyboard())
}

pub fn retry_gender() -> Reply {
    Reply::text("Please choose one of the options below.").with_keyboard(gender_keyboard())
}

pub fn onboarding_complete(name: &str, price: Price) -> String {
    format!("Thank you, {}! Your profile is saved.\n{}", name, pricing_line(price))
}

pub fn welcome(name: &str, price: Price) -> String {
    format!(
        "Hello, {}! Welcome to the tarot reading bot.\n{}",
        name,
        pricing_line(price)
    )
}

pub fn insufficient_funds(balance: i64, price: Price) -> String {
    format!(
        "Insufficient funds: a reading costs {price} {cur}, your balance is {balance} {cur}. \
         Top up with /topup <amount>",
        price = price,
        balance = balance,
        cur = CURRENCY
    )
}

/// Card pictures (when present) followed by the spread and the answer.
pub fn reading(cards: &[Card], answer: &str) -> Reply {
    let names = cards
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let photos = cards
        .iter()
        .filter_map(|c| {
            c.image().map(|url| Photo {
                url: url.to_string(),
                caption: c.name.clone(),
            })
        })
        .collect();

    Reply::text(format!("Cards: {}\n\n{}", names, answer)).with_photos(photos)
}

pub fn topped_up(amount: i64, balance: i64) -> String {
    format!(
        "Balance topped up by {amount} {cur}. Current balance: {balance} {cur}.",
        amount = amount,
        balance = balance,
        cur = CURRENCY
    )
}

pub fn balance(balance: i64) -> String {
    format!("Your balance: {} {}", balance, CURRENCY)
}

pub fn profile(account: &UserAccount) -> String {
    let age = account
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    format!(
        "Profile of {handle}\n\
         Name: {name}\n\
         Age: {age}\n\
         Gender: {gender}\n\
         Balance: {balance} {cur}\n\
         Free reading used: {free}",
        handle = account.handle,
        name = account.name.as_deref().unwrap_or(NOT_SPECIFIED),
        age = age,
        gender = account.gender.map(|g| g.label()).unwrap_or(NOT_SPECIFIED),
        balance = account.balance(),
        cur = CURRENCY,
        free = if account.free_used() { "yes" } else { "no" },
    )
}

pub fn history(readings: &[Reading]) -> String {
    if readings.is_empty() {
        return EMPTY_HISTORY.to_string();
    }

    readings
        .iter()
        .map(|r| {
            format!(
                "{} - {}\nCards: {}\n{}",
                r.created_at.to_display_string(),
                r.question,
                r.cards.join(", "),
                r.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn menu() -> Reply {
    let keyboard = MenuAction::ALL.into_iter().fold(Keyboard::default(), |kb, action| {
        kb.row(vec![Button::new(action.label(), action.callback_data())])
    });
    Reply::text("Choose an action:").with_keyboard(keyboard)
}

pub fn stats(stats: &UserStatistics) -> String {
    format!(
        "Users: {}\nTotal balance: {} {}",
        stats.user_count, stats.total_balance, CURRENCY
    )
}
