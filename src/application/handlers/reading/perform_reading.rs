//! PerformReadingHandler - The paid reading transaction.
//!
//! Steps, in order:
//! 1. Validate the question (no side effects on failure)
//! 2. Resolve the user (get-or-create)
//! 3. Consume the entitlement atomically (free reading first, then balance)
//! 4. Draw three distinct cards
//! 5. Synthesize the answer (never fails; may degrade to a fallback)
//! 6. Append the history entry
//!
//! A denied entitlement stops at step 3: no draw, no backend call, no
//! history. Once granted the reading is charged even if synthesis fell back.

use std::sync::Arc;
use tracing::{error, info};

use crate::application::AnswerSynthesizer;
use crate::domain::catalog::{Card, CardCatalog, SPREAD_SIZE};
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::ledger::{ConsumeResult, GrantVia, Price};
use crate::domain::reading::{NewReading, Question, Reading};
use crate::ports::{HistoryRepository, UserRepository};

/// Command issued by `read <question>`.
#[derive(Debug, Clone)]
pub struct PerformReadingCommand {
    pub user_id: UserId,
    pub handle: String,
    /// Raw question text as typed.
    pub question: String,
}

/// Outcome of a reading request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerformReadingResult {
    /// Entitlement granted and the reading recorded.
    Completed {
        /// Drawn cards, in draw order.
        cards: Vec<Card>,
        answer: String,
        via: GrantVia,
        reading: Reading,
    },
    /// Free reading used and balance below the price. Nothing changed.
    InsufficientFunds { balance: i64, price: Price },
}

/// Handler for the reading pipeline.
pub struct PerformReadingHandler {
    users: Arc<dyn UserRepository>,
    history: Arc<dyn HistoryRepository>,
    catalog: Arc<CardCatalog>,
    synthesizer: AnswerSynthesizer,
    price: Price,
}

impl PerformReadingHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        history: Arc<dyn HistoryRepository>,
        catalog: Arc<CardCatalog>,
        synthesizer: AnswerSynthesizer,
        price: Price,
    ) -> Self {
        Self {
            users,
            history,
            catalog,
            synthesizer,
            price,
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// # Errors
    ///
    /// - `EmptyField` for a blank question
    /// - `DatabaseError` when the store fails; a failure after the grant is
    ///   logged with the user, grant kind and question
    pub async fn handle(
        &self,
        cmd: PerformReadingCommand,
    ) -> Result<PerformReadingResult, DomainError> {
        // 1. Validate input before touching any state
        let question = Question::new(&cmd.question)?;

        // 2. Resolve the user
        let account = self.users.get_or_create(cmd.user_id, &cmd.handle).await?;

        // 3. Entitlement
        let via = match self.users.consume_entitlement(cmd.user_id, self.price).await? {
            ConsumeResult::Granted(via) => via,
            ConsumeResult::Denied { balance } => {
                info!(user_id = %cmd.user_id, balance, "Reading denied");
                return Ok(PerformReadingResult::InsufficientFunds {
                    balance,
                    price: self.price,
                });
            }
        };

        // 4. Draw
        let cards = self
            .catalog
            .sample(SPREAD_SIZE)
            .map_err(|e| self.charged_without_history(cmd.user_id, via, &question, e.into()))?;

        // 5. Synthesize
        let answer = self.synthesizer.synthesize(&question, &cards, &account).await;

        // 6. Record
        let entry = NewReading::new(cmd.user_id, question.clone(), &cards, answer.clone())
            .map_err(|e| self.charged_without_history(cmd.user_id, via, &question, e.into()))?;
        let reading = self
            .history
            .append(entry)
            .await
            .map_err(|e| self.charged_without_history(cmd.user_id, via, &question, e))?;

        info!(
            user_id = %cmd.user_id,
            via = %via,
            reading_id = %reading.id,
            "Reading completed"
        );

        Ok(PerformReadingResult::Completed {
            cards,
            answer,
            via,
            reading,
        })
    }

    /// Logs a granted entitlement that has no matching history entry.
    fn charged_without_history(
        &self,
        user_id: UserId,
        via: GrantVia,
        question: &Question,
        err: DomainError,
    ) -> DomainError {
        error!(
            user_id = %user_id,
            via = %via,
            question = %question,
            error = %err,
            "Entitlement consumed but reading was not recorded"
        );
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::storage::{InMemoryHistoryRepository, InMemoryUserRepository};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::ledger::{CreditAmount, LedgerState};
    use crate::domain::reading::prompt::UNAVAILABLE_ANSWER;
    use crate::domain::user::{Profile, UserAccount};
    use crate::ports::UserStatistics;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    /// Fails every append.
    struct FailingHistoryRepository;

    #[async_trait]
    impl HistoryRepository for FailingHistoryRepository {
        async fn append(&self, _reading: NewReading) -> Result<Reading, DomainError> {
            Err(DomainError::database("Simulated append failure"))
        }

        async fn list_for_user(
            &self,
            _user_id: UserId,
            _limit: usize,
        ) -> Result<Vec<Reading>, DomainError> {
            Ok(Vec::new())
        }
    }

    /// Store that is reachable for reads but fails the entitlement write.
    struct ConsumeFailingRepository {
        consume_calls: AtomicUsize,
    }

    #[async_trait]
    impl UserRepository for ConsumeFailingRepository {
        async fn get_or_create(&self, id: UserId, handle: &str) -> Result<UserAccount, DomainError> {
            Ok(UserAccount::new(id, handle))
        }

        async fn find(&self, _id: UserId) -> Result<Option<UserAccount>, DomainError> {
            Ok(None)
        }

        async fn save_profile(&self, _id: UserId, _profile: &Profile) -> Result<(), DomainError> {
            Ok(())
        }

        async fn credit(&self, _id: UserId, _amount: CreditAmount) -> Result<i64, DomainError> {
            Ok(0)
        }

        async fn consume_entitlement(
            &self,
            _id: UserId,
            _price: Price,
        ) -> Result<ConsumeResult, DomainError> {
            self.consume_calls.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::database("connection reset"))
        }

        async fn statistics(&self) -> Result<UserStatistics, DomainError> {
            Ok(UserStatistics::default())
        }
    }

    /// Reads an older balance than the one the entitlement write observes,
    /// as when a credit lands between the two calls.
    struct CreditedMeanwhileRepository {
        read_balance: i64,
        consume_balance: i64,
    }

    #[async_trait]
    impl UserRepository for CreditedMeanwhileRepository {
        async fn get_or_create(&self, id: UserId, handle: &str) -> Result<UserAccount, DomainError> {
            let mut account = UserAccount::new(id, handle);
            account.ledger = LedgerState::new(self.read_balance, true)?;
            Ok(account)
        }

        async fn find(&self, _id: UserId) -> Result<Option<UserAccount>, DomainError> {
            Ok(None)
        }

        async fn save_profile(&self, _id: UserId, _profile: &Profile) -> Result<(), DomainError> {
            Ok(())
        }

        async fn credit(&self, _id: UserId, _amount: CreditAmount) -> Result<i64, DomainError> {
            Ok(self.consume_balance)
        }

        async fn consume_entitlement(
            &self,
            _id: UserId,
            _price: Price,
        ) -> Result<ConsumeResult, DomainError> {
            Ok(ConsumeResult::Denied {
                balance: self.consume_balance,
            })
        }

        async fn statistics(&self) -> Result<UserStatistics, DomainError> {
            Ok(UserStatistics::default())
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    const USER: i64 = 42;

    fn catalog() -> Arc<CardCatalog> {
        let cards = (0..10)
            .map(|i| Card::new(format!("Card {}", i), format!("Meaning {}", i)))
            .collect();
        Arc::new(CardCatalog::new(cards).unwrap())
    }

    fn price() -> Price {
        Price::new(299).unwrap()
    }

    fn handler_with(
        users: Arc<dyn UserRepository>,
        history: Arc<dyn HistoryRepository>,
        synthesizer: AnswerSynthesizer,
    ) -> PerformReadingHandler {
        PerformReadingHandler::new(users, history, catalog(), synthesizer, price())
    }

    fn command(question: &str) -> PerformReadingCommand {
        PerformReadingCommand {
            user_id: UserId::new(USER),
            handle: "seeker".to_string(),
            question: question.to_string(),
        }
    }

    async fn seed(users: &InMemoryUserRepository, balance: i64, free_used: bool) {
        let mut account = UserAccount::new(UserId::new(USER), "seeker");
        account.ledger = LedgerState::new(balance, free_used).unwrap();
        users.insert(account).await;
    }

    async fn ledger(users: &InMemoryUserRepository) -> LedgerState {
        users.find(UserId::new(USER)).await.unwrap().unwrap().ledger
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Entitlement paths
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fresh_user_gets_free_offline_reading() {
        let users = InMemoryUserRepository::new();
        let history = InMemoryHistoryRepository::new();
        let handler = handler_with(
            Arc::new(users.clone()),
            Arc::new(history.clone()),
            AnswerSynthesizer::offline(),
        );

        let result = handler.handle(command("test")).await.unwrap();

        let PerformReadingResult::Completed { cards, answer, via, reading } = result else {
            panic!("expected a completed reading");
        };
        assert_eq!(via, GrantVia::Free);
        assert!(answer.contains("test"));
        assert_eq!(cards.len(), 3);
        assert_eq!(reading.question, "test");

        let state = ledger(&users).await;
        assert_eq!(state.balance, 0);
        assert!(state.free_used);
        assert_eq!(history.all().await.len(), 1);
    }

    #[tokio::test]
    async fn insufficient_balance_is_denied_without_side_effects() {
        let users = InMemoryUserRepository::new();
        let history = InMemoryHistoryRepository::new();
        let provider = Arc::new(MockAIProvider::new());
        seed(&users, 100, true).await;
        let handler = handler_with(
            Arc::new(users.clone()),
            Arc::new(history.clone()),
            AnswerSynthesizer::with_provider(provider.clone()),
        );

        let result = handler.handle(command("Will I be rich?")).await.unwrap();

        assert_eq!(
            result,
            PerformReadingResult::InsufficientFunds {
                balance: 100,
                price: price()
            }
        );
        assert_eq!(ledger(&users).await, LedgerState::new(100, true).unwrap());
        assert!(history.all().await.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn denial_reports_balance_seen_by_the_entitlement_check() {
        let users = Arc::new(CreditedMeanwhileRepository {
            read_balance: 0,
            consume_balance: 150,
        });
        let history = InMemoryHistoryRepository::new();
        let handler = handler_with(users, Arc::new(history.clone()), AnswerSynthesizer::offline());

        let result = handler.handle(command("Any luck?")).await.unwrap();

        assert_eq!(
            result,
            PerformReadingResult::InsufficientFunds {
                balance: 150,
                price: price()
            }
        );
        assert!(history.all().await.is_empty());
    }

    #[tokio::test]
    async fn paid_reading_debits_price_once() {
        let users = InMemoryUserRepository::new();
        let history = InMemoryHistoryRepository::new();
        seed(&users, 500, true).await;
        let handler = handler_with(
            Arc::new(users.clone()),
            Arc::new(history.clone()),
            AnswerSynthesizer::offline(),
        );

        let result = handler.handle(command("Career?")).await.unwrap();

        assert!(matches!(
            result,
            PerformReadingResult::Completed { via: GrantVia::Paid, .. }
        ));
        assert_eq!(ledger(&users).await.balance, 201);
        assert_eq!(history.all().await.len(), 1);
    }

    #[tokio::test]
    async fn backend_failure_still_charges_and_records_fallback() {
        let users = InMemoryUserRepository::new();
        let history = InMemoryHistoryRepository::new();
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::Status { status: 500 }));
        let handler = handler_with(
            Arc::new(users.clone()),
            Arc::new(history.clone()),
            AnswerSynthesizer::with_provider(provider),
        );

        let result = handler.handle(command("test")).await.unwrap();

        let PerformReadingResult::Completed { answer, via, .. } = result else {
            panic!("expected a completed reading");
        };
        assert_eq!(answer, UNAVAILABLE_ANSWER);
        assert_eq!(via, GrantVia::Free);
        assert!(ledger(&users).await.free_used);
        assert_eq!(history.all().await[0].answer, UNAVAILABLE_ANSWER);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Draw and history
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn history_matches_drawn_cards() {
        let users = InMemoryUserRepository::new();
        let history = InMemoryHistoryRepository::new();
        let catalog = catalog();
        let handler = PerformReadingHandler::new(
            Arc::new(users.clone()),
            Arc::new(history.clone()),
            catalog.clone(),
            AnswerSynthesizer::offline(),
            price(),
        );

        let PerformReadingResult::Completed { cards, .. } =
            handler.handle(command("q")).await.unwrap()
        else {
            panic!("expected a completed reading");
        };

        let stored = &history.all().await[0];
        let drawn: Vec<String> = cards.iter().map(|c| c.name.clone()).collect();
        assert_eq!(stored.cards, drawn);
        assert_eq!(stored.cards.iter().collect::<HashSet<_>>().len(), 3);
        assert!(stored.cards.iter().all(|name| catalog.find(name).is_some()));
    }

    #[tokio::test]
    async fn blank_question_touches_nothing() {
        let users = InMemoryUserRepository::new();
        let history = InMemoryHistoryRepository::new();
        let handler = handler_with(
            Arc::new(users.clone()),
            Arc::new(history.clone()),
            AnswerSynthesizer::offline(),
        );

        let err = handler.handle(command("   ")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::EmptyField);
        assert!(users.is_empty().await);
        assert!(history.all().await.is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Store failures
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn store_failure_is_an_error_not_a_denial() {
        let users = Arc::new(ConsumeFailingRepository {
            consume_calls: AtomicUsize::new(0),
        });
        let history = InMemoryHistoryRepository::new();
        let handler = handler_with(
            users.clone(),
            Arc::new(history.clone()),
            AnswerSynthesizer::offline(),
        );

        let err = handler.handle(command("q")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(users.consume_calls.load(Ordering::SeqCst), 1);
        assert!(history.all().await.is_empty());
    }

    #[tokio::test]
    async fn history_failure_after_grant_is_reported() {
        let users = InMemoryUserRepository::new();
        let handler = handler_with(
            Arc::new(users.clone()),
            Arc::new(FailingHistoryRepository),
            AnswerSynthesizer::offline(),
        );

        let err = handler.handle(command("q")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        // The grant itself stands; it is never rolled back or refunded.
        assert!(ledger(&users).await.free_used);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Concurrency
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_readings_spend_free_reading_once() {
        let users = InMemoryUserRepository::new();
        let history = InMemoryHistoryRepository::new();
        let handler = Arc::new(handler_with(
            Arc::new(users.clone()),
            Arc::new(history.clone()),
            AnswerSynthesizer::offline(),
        ));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(command("race")).await.unwrap() })
            })
            .collect();

        let mut granted = 0;
        for task in tasks {
            if matches!(task.await.unwrap(), PerformReadingResult::Completed { .. }) {
                granted += 1;
            }
        }

        assert_eq!(granted, 1);
        assert_eq!(history.all().await.len(), 1);
        assert_eq!(ledger(&users).await, LedgerState::new(0, true).unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_paid_readings_never_overdraw() {
        let users = InMemoryUserRepository::new();
        let history = InMemoryHistoryRepository::new();
        seed(&users, 1000, true).await;
        let handler = Arc::new(handler_with(
            Arc::new(users.clone()),
            Arc::new(history.clone()),
            AnswerSynthesizer::offline(),
        ));

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(command("race")).await.unwrap() })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        // 1000 / 299 = 3 readings, 103 left.
        assert_eq!(history.all().await.len(), 3);
        assert_eq!(ledger(&users).await.balance, 103);
    }
}
