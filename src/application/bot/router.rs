//! CommandRouter - maps inbound chat updates onto the handlers.
//!
//! The router never fails. Usage mistakes become usage hints, store failures
//! become a logged error plus a generic apology, and some inputs (non-admin
//! `stats`, stray text outside onboarding) get no reply at all.

use std::sync::Arc;
use tracing::{debug, error};

use super::command::{BotCommand, CallbackAction, MenuAction};
use super::messages;
use super::reply::Reply;
use crate::application::handlers::{
    GetAccountHandler, GetAccountQuery, GetHistoryHandler, GetHistoryQuery, GetStatsHandler,
    GetStatsQuery, PerformReadingCommand, PerformReadingHandler, PerformReadingResult,
    StartCommand, StartHandler, StartResult, SubmitOnboardingInputCommand,
    SubmitOnboardingInputHandler, TopUpCommand, TopUpHandler,
};
use crate::application::AnswerSynthesizer;
use crate::domain::catalog::CardCatalog;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::ledger::Price;
use crate::domain::onboarding::OnboardingStep;
use crate::ports::{HistoryRepository, OnboardingSessionStore, UserRepository};

/// Who sent an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: UserId,
    /// Platform handle; empty when the user has none.
    pub handle: String,
}

impl Sender {
    pub fn new(user_id: UserId, handle: impl Into<String>) -> Self {
        Self {
            user_id,
            handle: handle.into(),
        }
    }
}

/// A transport-neutral inbound update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Message text, command or not.
    Text(String),
    /// Inline button payload.
    Callback(String),
}

/// Collaborators the router wires its handlers with.
#[derive(Clone)]
pub struct RouterPorts {
    pub users: Arc<dyn UserRepository>,
    pub history: Arc<dyn HistoryRepository>,
    pub sessions: Arc<dyn OnboardingSessionStore>,
    pub catalog: Arc<CardCatalog>,
    pub synthesizer: AnswerSynthesizer,
}

/// Tunables read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterSettings {
    pub price: Price,
    pub history_limit: usize,
    pub admin: Option<UserId>,
}

/// Dispatches updates to the application handlers.
pub struct CommandRouter {
    start: StartHandler,
    onboarding: SubmitOnboardingInputHandler,
    reading: PerformReadingHandler,
    top_up: TopUpHandler,
    account: GetAccountHandler,
    history: GetHistoryHandler,
    stats: GetStatsHandler,
    price: Price,
}

impl CommandRouter {
    pub fn new(ports: RouterPorts, settings: RouterSettings) -> Self {
        Self {
            start: StartHandler::new(ports.users.clone(), ports.sessions.clone()),
            onboarding: SubmitOnboardingInputHandler::new(ports.users.clone(), ports.sessions),
            reading: PerformReadingHandler::new(
                ports.users.clone(),
                ports.history.clone(),
                ports.catalog,
                ports.synthesizer,
                settings.price,
            ),
            top_up: TopUpHandler::new(ports.users.clone()),
            account: GetAccountHandler::new(ports.users.clone()),
            history: GetHistoryHandler::new(ports.history, settings.history_limit),
            stats: GetStatsHandler::new(ports.users, settings.admin),
            price: settings.price,
        }
    }

    /// Handles one update and returns what to send back, if anything.
    pub async fn route(&self, sender: &Sender, inbound: Inbound) -> Option<Reply> {
        let outcome = match inbound {
            Inbound::Text(text) => match BotCommand::parse(&text) {
                Some(command) => {
                    debug!(user_id = %sender.user_id, command = ?command, "Command received");
                    self.dispatch(sender, command).await
                }
                None => self.onboarding_answer(sender, text).await,
            },
            Inbound::Callback(data) => match CallbackAction::parse(&data) {
                Some(CallbackAction::Menu(action)) => self.menu_action(sender, action).await,
                Some(CallbackAction::Gender(gender)) => {
                    self.onboarding_answer(sender, gender.code().to_string()).await
                }
                None => {
                    debug!(user_id = %sender.user_id, data = %data, "Ignoring unknown callback");
                    Ok(None)
                }
            },
        };

        outcome.unwrap_or_else(|e| {
            error!(user_id = %sender.user_id, error = %e, "Command failed");
            Some(Reply::text(messages::APOLOGY))
        })
    }

    async fn dispatch(
        &self,
        sender: &Sender,
        command: BotCommand,
    ) -> Result<Option<Reply>, DomainError> {
        let reply = match command {
            BotCommand::Start => self.start(sender).await?,
            BotCommand::Read(question) => self.read(sender, question).await?,
            BotCommand::TopUp(amount) => self.top_up(sender, amount).await?,
            BotCommand::Balance => {
                let account = self.account.handle(self.account_query(sender)).await?;
                Reply::text(messages::balance(account.balance()))
            }
            BotCommand::Profile => {
                let account = self.account.handle(self.account_query(sender)).await?;
                Reply::text(messages::profile(&account))
            }
            BotCommand::History => {
                let readings = self
                    .history
                    .handle(GetHistoryQuery {
                        user_id: sender.user_id,
                    })
                    .await?;
                Reply::text(messages::history(&readings))
            }
            BotCommand::Help => Reply::text(messages::HELP),
            BotCommand::Menu => messages::menu(),
            BotCommand::Stats => {
                let stats = self
                    .stats
                    .handle(GetStatsQuery {
                        requester: sender.user_id,
                    })
                    .await?;
                return Ok(stats.map(|s| Reply::text(messages::stats(&s))));
            }
            BotCommand::Unknown(_) => Reply::text(messages::UNKNOWN_COMMAND),
        };

        Ok(Some(reply))
    }

    async fn menu_action(
        &self,
        sender: &Sender,
        action: MenuAction,
    ) -> Result<Option<Reply>, DomainError> {
        let command = match action {
            MenuAction::Read => return Ok(Some(Reply::text(messages::READ_USAGE))),
            MenuAction::Balance => BotCommand::Balance,
            MenuAction::Profile => BotCommand::Profile,
            MenuAction::History => BotCommand::History,
            MenuAction::Help => BotCommand::Help,
        };
        self.dispatch(sender, command).await
    }

    async fn start(&self, sender: &Sender) -> Result<Reply, DomainError> {
        let result = self
            .start
            .handle(StartCommand {
                user_id: sender.user_id,
                handle: sender.handle.clone(),
            })
            .await?;

        Ok(match result {
            StartResult::OnboardingStarted => Reply::text(messages::ASK_NAME),
            StartResult::Welcome { account } => Reply::text(messages::welcome(
                account.name.as_deref().unwrap_or(&account.handle),
                self.price,
            )),
        })
    }

    async fn read(&self, sender: &Sender, question: String) -> Result<Reply, DomainError> {
        let result = self
            .reading
            .handle(PerformReadingCommand {
                user_id: sender.user_id,
                handle: sender.handle.clone(),
                question,
            })
            .await;

        match result {
            Ok(PerformReadingResult::Completed { cards, answer, .. }) => {
                Ok(messages::reading(&cards, &answer))
            }
            Ok(PerformReadingResult::InsufficientFunds { balance, price }) => {
                Ok(Reply::text(messages::insufficient_funds(balance, price)))
            }
            Err(e) if e.is_validation() => Ok(Reply::text(messages::READ_USAGE)),
            Err(e) => Err(e),
        }
    }

    async fn top_up(&self, sender: &Sender, amount: String) -> Result<Reply, DomainError> {
        let result = self
            .top_up
            .handle(TopUpCommand {
                user_id: sender.user_id,
                handle: sender.handle.clone(),
                amount,
            })
            .await;

        match result {
            Ok(done) => Ok(Reply::text(messages::topped_up(
                done.credited.units(),
                done.balance,
            ))),
            Err(e) if e.is_validation() => Ok(Reply::text(messages::TOPUP_USAGE)),
            Err(e) => Err(e),
        }
    }

    async fn onboarding_answer(
        &self,
        sender: &Sender,
        input: String,
    ) -> Result<Option<Reply>, DomainError> {
        let step = self
            .onboarding
            .handle(SubmitOnboardingInputCommand {
                user_id: sender.user_id,
                input,
            })
            .await?;

        let Some(step) = step else {
            debug!(user_id = %sender.user_id, "Ignoring text outside onboarding");
            return Ok(None);
        };

        Ok(Some(match step {
            OnboardingStep::AskName => Reply::text(messages::ASK_NAME),
            OnboardingStep::AskAge => Reply::text(messages::ASK_AGE),
            OnboardingStep::RetryAge => Reply::text(messages::RETRY_AGE),
            OnboardingStep::AskGender => messages::ask_gender(),
            OnboardingStep::RetryGender => messages::retry_gender(),
            OnboardingStep::Completed(profile) => {
                Reply::text(messages::onboarding_complete(&profile.name, self.price))
            }
        }))
    }

    fn account_query(&self, sender: &Sender) -> GetAccountQuery {
        GetAccountQuery {
            user_id: sender.user_id,
            handle: sender.handle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{
        InMemoryHistoryRepository, InMemoryOnboardingStore, InMemoryUserRepository,
    };
    use crate::domain::catalog::Card;
    use crate::domain::ledger::{ConsumeResult, CreditAmount};
    use crate::domain::onboarding::OnboardingState;
    use crate::domain::user::{Profile, UserAccount};
    use crate::ports::UserStatistics;
    use async_trait::async_trait;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    /// Store that is down.
    struct UnavailableUserRepository;

    fn down() -> DomainError {
        DomainError::database("connection refused")
    }

    #[async_trait]
    impl UserRepository for UnavailableUserRepository {
        async fn get_or_create(&self, _id: UserId, _handle: &str) -> Result<UserAccount, DomainError> {
            Err(down())
        }

        async fn find(&self, _id: UserId) -> Result<Option<UserAccount>, DomainError> {
            Err(down())
        }

        async fn save_profile(&self, _id: UserId, _profile: &Profile) -> Result<(), DomainError> {
            Err(down())
        }

        async fn credit(&self, _id: UserId, _amount: CreditAmount) -> Result<i64, DomainError> {
            Err(down())
        }

        async fn consume_entitlement(
            &self,
            _id: UserId,
            _price: Price,
        ) -> Result<ConsumeResult, DomainError> {
            Err(down())
        }

        async fn statistics(&self) -> Result<UserStatistics, DomainError> {
            Err(down())
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    const ADMIN: i64 = 1;
    const USER: i64 = 2;

    struct Fixture {
        router: CommandRouter,
        users: InMemoryUserRepository,
        sessions: InMemoryOnboardingStore,
    }

    fn catalog() -> Arc<CardCatalog> {
        let cards = ["The Fool", "The Magician", "The Empress", "The Sun"]
            .into_iter()
            .map(|n| Card::new(n, "meaning"))
            .collect();
        Arc::new(CardCatalog::new(cards).unwrap())
    }

    fn settings() -> RouterSettings {
        RouterSettings {
            price: Price::new(299).unwrap(),
            history_limit: 10,
            admin: Some(UserId::new(ADMIN)),
        }
    }

    fn fixture() -> Fixture {
        let users = InMemoryUserRepository::new();
        let sessions = InMemoryOnboardingStore::new();
        let router = CommandRouter::new(
            RouterPorts {
                users: Arc::new(users.clone()),
                history: Arc::new(InMemoryHistoryRepository::new()),
                sessions: Arc::new(sessions.clone()),
                catalog: catalog(),
                synthesizer: AnswerSynthesizer::offline(),
            },
            settings(),
        );
        Fixture {
            router,
            users,
            sessions,
        }
    }

    fn user() -> Sender {
        Sender::new(UserId::new(USER), "seeker")
    }

    async fn say(router: &CommandRouter, sender: &Sender, text: &str) -> Option<Reply> {
        router.route(sender, Inbound::Text(text.to_string())).await
    }

    async fn text_of(router: &CommandRouter, sender: &Sender, text: &str) -> String {
        say(router, sender, text).await.expect("expected a reply").text
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Onboarding
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn onboarding_via_text_and_button() {
        let f = fixture();
        let sender = user();

        assert_eq!(text_of(&f.router, &sender, "/start").await, messages::ASK_NAME);
        assert_eq!(text_of(&f.router, &sender, "Maria").await, messages::ASK_AGE);
        assert_eq!(text_of(&f.router, &sender, "abc").await, messages::RETRY_AGE);

        let gender_prompt = say(&f.router, &sender, "29").await.unwrap();
        let female = gender_prompt.keyboard.unwrap().rows[0][1].data.clone();

        let done = f.router.route(&sender, Inbound::Callback(female)).await.unwrap();
        assert!(done.text.starts_with("Thank you, Maria!"));
        assert!(done.text.contains("299"));

        let welcome = text_of(&f.router, &sender, "/start").await;
        assert!(welcome.starts_with("Hello, Maria!"));
    }

    #[tokio::test]
    async fn commands_mid_onboarding_leave_session_untouched() {
        let f = fixture();
        let sender = user();
        say(&f.router, &sender, "/start").await;
        say(&f.router, &sender, "Maria").await;

        let balance = text_of(&f.router, &sender, "/balance").await;

        assert_eq!(balance, messages::balance(0));
        let session = f.sessions.get(UserId::new(USER)).await.unwrap().unwrap();
        assert_eq!(session.state(), OnboardingState::AwaitAge);
    }

    #[tokio::test]
    async fn text_outside_onboarding_gets_no_reply() {
        let f = fixture();
        assert!(say(&f.router, &user(), "hello there").await.is_none());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Commands
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn read_without_question_shows_usage() {
        let f = fixture();

        assert_eq!(text_of(&f.router, &user(), "/read").await, messages::READ_USAGE);
        assert_eq!(text_of(&f.router, &user(), "/read    ").await, messages::READ_USAGE);
        assert!(f.users.is_empty().await);
    }

    #[tokio::test]
    async fn read_returns_cards_and_answer() {
        let f = fixture();

        let reply = text_of(&f.router, &user(), "/read will it work?").await;

        assert!(reply.starts_with("Cards: "));
        assert!(reply.contains("will it work?"));
    }

    #[tokio::test]
    async fn topup_validates_and_credits() {
        let f = fixture();
        let sender = user();

        assert_eq!(text_of(&f.router, &sender, "/topup abc").await, messages::TOPUP_USAGE);
        assert_eq!(text_of(&f.router, &sender, "/topup").await, messages::TOPUP_USAGE);
        assert_eq!(text_of(&f.router, &sender, "/topup 50").await, messages::topped_up(50, 50));
        assert_eq!(text_of(&f.router, &sender, "/balance").await, messages::balance(50));
    }

    #[tokio::test]
    async fn second_reading_without_funds_is_refused() {
        let f = fixture();
        let sender = user();

        say(&f.router, &sender, "/read first").await;
        let reply = text_of(&f.router, &sender, "/read second").await;

        assert_eq!(reply, messages::insufficient_funds(0, Price::new(299).unwrap()));
    }

    #[tokio::test]
    async fn stats_only_for_admin() {
        let f = fixture();
        say(&f.router, &user(), "/topup 70").await;

        assert!(say(&f.router, &user(), "/stats").await.is_none());

        let admin = Sender::new(UserId::new(ADMIN), "boss");
        let stats = text_of(&f.router, &admin, "/stats").await;
        assert_eq!(
            stats,
            messages::stats(&UserStatistics {
                user_count: 1,
                total_balance: 70
            })
        );
    }

    #[tokio::test]
    async fn menu_buttons_dispatch_to_commands() {
        let f = fixture();
        let sender = user();

        let menu = say(&f.router, &sender, "/menu").await.unwrap();
        assert_eq!(menu.keyboard.as_ref().unwrap().rows.len(), 5);

        let read = f
            .router
            .route(&sender, Inbound::Callback("menu_read".to_string()))
            .await
            .unwrap();
        assert_eq!(read.text, messages::READ_USAGE);

        let help = f
            .router
            .route(&sender, Inbound::Callback("menu_help".to_string()))
            .await
            .unwrap();
        assert_eq!(help.text, messages::HELP);

        let history = f
            .router
            .route(&sender, Inbound::Callback("menu_history".to_string()))
            .await
            .unwrap();
        assert_eq!(history.text, messages::EMPTY_HISTORY);
    }

    #[tokio::test]
    async fn unknown_command_gets_hint() {
        let f = fixture();
        assert_eq!(text_of(&f.router, &user(), "/dance").await, messages::UNKNOWN_COMMAND);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failures
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn store_outage_yields_apology_not_denial() {
        let router = CommandRouter::new(
            RouterPorts {
                users: Arc::new(UnavailableUserRepository),
                history: Arc::new(InMemoryHistoryRepository::new()),
                sessions: Arc::new(InMemoryOnboardingStore::new()),
                catalog: catalog(),
                synthesizer: AnswerSynthesizer::offline(),
            },
            settings(),
        );

        for command in ["/read q", "/balance", "/topup 10", "/start"] {
            assert_eq!(text_of(&router, &user(), command).await, messages::APOLOGY);
        }
    }
}
