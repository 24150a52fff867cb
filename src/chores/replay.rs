//! Bring "replay" and "backlog" cards back into the to-do list when they are due
//!
//! A card of the to-do list that has the replay label and a title ending with `(N d)` is a task that should be done again every N days.
//! Once it is archived (i.e. done), this chore takes it out of the archive and parks it in the replay list, due in N days.
//! Cards of the replay and backlog lists that become due soon are moved to the to-do list.

use std::error::Error;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::board::BoardSession;
use crate::card::{CardFilter, CardUpdate, Position};
use crate::error::HousekeeperError;
use crate::ids::ListId;
use crate::progress::RunProgress;
use crate::traits::BoardService;
use crate::utils::comparison::compare_due_dates_desc;

/// Largest accepted lookahead, in days
pub const MAX_LOOKAHEAD_DAYS: i64 = 3650;

/// Matches the `(20 d)` suffix of a title
static REPLAY_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\((\d{1,3}) d\)\s*$").expect("invalid replay directive regex")
});

/// Extract the number of days from a title ending with `(N d)`, where N has 1 to 3 digits
pub fn parse_replay_days(title: &str) -> Option<i64> {
    REPLAY_DIRECTIVE.captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|days| days.as_str().parse().ok())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub todo_list: String,
    pub replay_list: String,
    pub backlog_list: String,
    pub replay_label: String,
    /// Cards due before `now + lookahead_days` are moved to the to-do list
    pub lookahead_days: i64,
    /// Also sort the dated cards of the to-do list
    pub sort_todo: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            todo_list: "ToDo".to_string(),
            replay_list: "Replay".to_string(),
            backlog_list: "Backlog".to_string(),
            replay_label: "replay".to_string(),
            lookahead_days: 2,
            sort_todo: false,
        }
    }
}

/// What a [`ReplayChore`] run did
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReplayOutcome {
    /// Cards taken out of the archive into the replay list
    pub revived: usize,
    /// Cards moved from the replay or backlog list to the to-do list
    pub promoted: usize,
}


pub struct ReplayChore {
    config: ReplayConfig,
}

impl ReplayChore {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub async fn run<S: BoardService>(&self, session: &mut BoardSession<S>, progress: &mut RunProgress) -> Result<ReplayOutcome, Box<dyn Error>> {
        self.run_at(session, progress, Utc::now()).await
    }

    /// Run the chore as if the current time was `now`.
    ///
    /// The to-do, replay and backlog lists must exist.
    pub async fn run_at<S: BoardService>(&self, session: &mut BoardSession<S>, progress: &mut RunProgress, now: DateTime<Utc>) -> Result<ReplayOutcome, Box<dyn Error>> {
        let todo = session.require_list(&self.config.todo_list)?;
        let replay = session.require_list(&self.config.replay_list)?;
        let backlog = session.require_list(&self.config.backlog_list)?;

        let threshold = days_after(now, self.config.lookahead_days)?;

        let revived = self.revive_archived_replays(session, progress, &todo, &replay, now).await?;

        let mut promoted = 0;
        for list in &[&replay, &backlog] {
            promoted += promote_due_cards(session, progress, list, &todo, threshold).await?;
        }
        progress.info(&format!("{} replay cards revived, {} cards moved to {}", revived, promoted, self.config.todo_list));

        let mut lists_to_sort = vec![&replay, &backlog];
        if self.config.sort_todo {
            lists_to_sort.push(&todo);
        }
        for list in lists_to_sort {
            pin_by_due_date(session, list).await?;
        }

        Ok(ReplayOutcome { revived, promoted })
    }

    /// Take the archived cards of the to-do list that have the replay label, and put them in the replay list.
    ///
    /// Their due date is set from the `(N d)` directive of their title. Cards without a valid directive keep their due date.
    async fn revive_archived_replays<S: BoardService>(&self, session: &mut BoardSession<S>, progress: &mut RunProgress,
        todo: &ListId, replay: &ListId, now: DateTime<Utc>) -> Result<usize, Box<dyn Error>>
    {
        let archived = session.service().get_list_cards(todo, CardFilter::Closed).await?;

        let mut revived = 0;
        for card in archived.iter().filter(|c| c.has_label(&self.config.replay_label)) {
            let mut update = CardUpdate::new().reopen().move_to(replay.clone());
            match parse_replay_days(card.name()) {
                None => {
                    log::warn!("No valid \"(N d)\" suffix in {:?}. Its due date is left unchanged", card.name());
                },
                Some(days) => {
                    progress.debug(&format!("{:?} will be due in {} days", card.name(), days));
                    update = update.due(days_after(now, days)?);
                },
            }
            session.service_mut().update_card(card.id(), update).await?;
            revived += 1;
        }
        Ok(revived)
    }
}

/// `now` plus `days` days. Fails on a day count outside `0..=MAX_LOOKAHEAD_DAYS`, or a date chrono cannot represent
fn days_after(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, HousekeeperError> {
    let out_of_range = || HousekeeperError::InvalidConfig(format!("{} days is not a valid delay", days));
    if (0..=MAX_LOOKAHEAD_DAYS).contains(&days) == false {
        return Err(out_of_range());
    }
    Duration::try_days(days)
        .and_then(|delay| now.checked_add_signed(delay))
        .ok_or_else(out_of_range)
}

/// Move the cards of `list` that are due before `threshold` to `todo`
async fn promote_due_cards<S: BoardService>(session: &mut BoardSession<S>, progress: &mut RunProgress,
    list: &ListId, todo: &ListId, threshold: DateTime<Utc>) -> Result<usize, Box<dyn Error>>
{
    let cards = session.service().get_list_cards(list, CardFilter::Open).await?;

    let mut promoted = 0;
    for card in &cards {
        let due = match card.due() {
            None => continue,
            Some(due) => *due,
        };
        if due < threshold {
            progress.debug(&format!("{:?} is due on {}, moving it", card.name(), due));
            session.service_mut().update_card(card.id(), CardUpdate::new().move_to(todo.clone())).await?;
            promoted += 1;
        }
    }
    Ok(promoted)
}

/// Sort the dated cards of a list by descending due date, and move them to the top of the list one after the other.
///
/// Since each card is put above the previous one, the list ends up with the earliest due date first,
/// followed by the other dated cards in ascending order, then by the cards without due date (in their previous order).
async fn pin_by_due_date<S: BoardService>(session: &mut BoardSession<S>, list: &ListId) -> Result<(), Box<dyn Error>> {
    let mut cards = session.service().get_list_cards(list, CardFilter::Open).await?;
    cards.retain(|card| card.due().is_some());
    cards.sort_by(compare_due_dates_desc);

    for card in &cards {
        session.service_mut().update_card(card.id(), CardUpdate::new().position(Position::Top)).await?;
    }
    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use crate::mock_board::MockBoardService;
    use crate::ids::{BoardId, LabelId};

    struct Fixture {
        service: MockBoardService,
        board: BoardId,
        todo: ListId,
        replay: ListId,
        backlog: ListId,
        label_replay: LabelId,
    }

    fn fixture() -> Fixture {
        let service = MockBoardService::new();
        let board = service.add_board("UNITTEST");
        let todo = service.add_list(&board, "ToDo");
        let replay = service.add_list(&board, "Replay");
        let backlog = service.add_list(&board, "Backlog");
        let label_replay = service.add_label(&board, "replay", Some("red"));
        Fixture { service, board, todo, replay, backlog, label_replay }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 15, 9, 30, 0).unwrap()
    }

    /// Midnight of `now + days`, the way a date-only due date is stored
    fn day(days: i64) -> DateTime<Utc> {
        let date = (now() + Duration::days(days)).date_naive();
        DateTime::from_naive_utc_and_offset(date.and_hms_opt(0, 0, 0).unwrap(), Utc)
    }

    #[test]
    fn replay_directive() {
        assert_eq!(parse_replay_days("Test_Get_From_Archive_1 (20 d)"), Some(20));
        assert_eq!(parse_replay_days("Water the plants (7 d)"), Some(7));
        assert_eq!(parse_replay_days("Descale (365 d) "), Some(365));
        assert_eq!(parse_replay_days("Test_Get_From_Archive_3 (wrong timedelta)"), None);
        assert_eq!(parse_replay_days("Too long (1000 d)"), None);
        assert_eq!(parse_replay_days("Wrong unit (20 D)"), None);
        assert_eq!(parse_replay_days("(20 d) not at the end"), None);
        assert_eq!(parse_replay_days("No directive"), None);
    }

    #[tokio::test]
    async fn fetch_replay_from_archive() {
        let _ = env_logger::builder().is_test(true).try_init();
        let f = fixture();
        let first = f.service.add_card(&f.todo, "Test_Get_From_Archive_1 (20 d)", &[f.label_replay.clone()], None);
        let second = f.service.add_card(&f.todo, "Test_Get_From_Archive_2 (10 d)", &[f.label_replay.clone()], None);
        let wrong = f.service.add_card(&f.todo, "Test_Get_From_Archive_3 (wrong timedelta)", &[f.label_replay.clone()], Some(day(0)));
        f.service.add_card(&f.todo, "Test_Stay_In_Archive", &[], Some(day(1)));
        f.service.archive_all_cards(&f.todo);
        f.service.add_card(&f.todo, "Test_Stay_On_Board (20 d)", &[f.label_replay.clone()], None);

        let mut session = BoardSession::open(f.service.clone(), "UNITTEST").await.unwrap();
        let mut progress = RunProgress::new();
        let outcome = ReplayChore::new(ReplayConfig::default()).run_at(&mut session, &mut progress, now()).await.unwrap();
        assert_eq!(outcome, ReplayOutcome { revived: 3, promoted: 1 });
        assert!(progress.is_success());

        // The card without directive kept its due date, which is today: it went straight back to the to-do list
        let todo_cards = f.service.open_cards(&f.todo);
        assert_eq!(todo_cards.len(), 2);
        assert!(todo_cards.iter().any(|c| c.name() == "Test_Stay_On_Board (20 d)"));
        assert_eq!(f.service.card(&wrong).unwrap().due(), Some(&day(0)));
        assert_eq!(f.service.card(&wrong).unwrap().list_id(), &f.todo);

        assert_eq!(f.service.open_card_names(&f.replay), vec!["Test_Get_From_Archive_2 (10 d)", "Test_Get_From_Archive_1 (20 d)"]);
        assert_eq!(f.service.card(&second).unwrap().due(), Some(&(now() + Duration::days(10))));
        assert_eq!(f.service.card(&first).unwrap().due(), Some(&(now() + Duration::days(20))));

        let closed: Vec<String> = f.service.closed_cards(&f.board).iter().map(|c| c.name().to_string()).collect();
        assert_eq!(closed, vec!["Test_Stay_In_Archive"]);
    }

    #[tokio::test]
    async fn replay_and_backlog_to_todo() {
        let f = fixture();
        let label = vec![f.label_replay.clone()];
        f.service.add_card(&f.replay, "Test_To_Todo_2 (20 d)", &label, Some(day(0)));
        f.service.add_card(&f.replay, "Test_To_Todo_1 (20 d)", &label, Some(day(2)));
        f.service.add_card(&f.replay, "Test_Stay_Replay_1 (20 d)", &label, Some(day(3)));
        f.service.add_card(&f.backlog, "Test_To_Todo_3", &[], Some(day(1)));
        f.service.add_card(&f.backlog, "Test_Stay_Backlog_1", &[], Some(day(10)));
        f.service.add_card(&f.backlog, "Test_Stay_Backlog_2", &[], Some(day(4)));
        f.service.add_card(&f.backlog, "Undated", &[], None);
        f.service.add_card(&f.todo, "Just_a_card", &[], None);

        let mut session = BoardSession::open(f.service.clone(), "UNITTEST").await.unwrap();
        let outcome = ReplayChore::new(ReplayConfig::default()).run_at(&mut session, &mut RunProgress::new(), now()).await.unwrap();
        assert_eq!(outcome, ReplayOutcome { revived: 0, promoted: 3 });

        assert_eq!(f.service.open_card_names(&f.replay), vec!["Test_Stay_Replay_1 (20 d)"]);
        assert_eq!(f.service.open_card_names(&f.backlog), vec!["Test_Stay_Backlog_2", "Test_Stay_Backlog_1", "Undated"]);

        let mut todo = f.service.open_card_names(&f.todo);
        todo.sort();
        assert_eq!(todo, vec!["Just_a_card", "Test_To_Todo_1 (20 d)", "Test_To_Todo_2 (20 d)", "Test_To_Todo_3"]);
    }

    #[tokio::test]
    async fn lookahead_boundary() {
        let f = fixture();
        f.service.add_card(&f.backlog, "Just before", &[], Some(now() + Duration::days(2) - Duration::seconds(1)));
        f.service.add_card(&f.backlog, "Exactly at", &[], Some(now() + Duration::days(2)));

        let mut session = BoardSession::open(f.service.clone(), "UNITTEST").await.unwrap();
        ReplayChore::new(ReplayConfig::default()).run_at(&mut session, &mut RunProgress::new(), now()).await.unwrap();

        assert_eq!(f.service.open_card_names(&f.todo), vec!["Just before"]);
        assert_eq!(f.service.open_card_names(&f.backlog), vec!["Exactly at"]);
    }

    #[tokio::test]
    async fn todo_list_can_be_sorted_too() {
        let f = fixture();
        f.service.add_card(&f.todo, "Undated", &[], None);
        f.service.add_card(&f.todo, "Later", &[], Some(day(9)));
        f.service.add_card(&f.todo, "Sooner", &[], Some(day(5)));

        let config = ReplayConfig { sort_todo: true, ..ReplayConfig::default() };
        let mut session = BoardSession::open(f.service.clone(), "UNITTEST").await.unwrap();
        ReplayChore::new(config).run_at(&mut session, &mut RunProgress::new(), now()).await.unwrap();

        assert_eq!(f.service.open_card_names(&f.todo), vec!["Sooner", "Later", "Undated"]);
    }

    #[tokio::test]
    async fn missing_list_is_an_error() {
        let service = MockBoardService::new();
        let board = service.add_board("UNITTEST");
        service.add_list(&board, "ToDo");
        service.add_list(&board, "Replay");

        let mut session = BoardSession::open(service, "UNITTEST").await.unwrap();
        let err = ReplayChore::new(ReplayConfig::default()).run_at(&mut session, &mut RunProgress::new(), now()).await.err().unwrap();
        assert!(matches!(err.downcast_ref::<crate::error::HousekeeperError>(),
            Some(crate::error::HousekeeperError::ListNotFound(name)) if name == "Backlog"));
    }

    #[tokio::test]
    async fn oversized_lookahead_is_rejected_before_any_change() {
        let f = fixture();
        let archived = f.service.add_card(&f.todo, "Fenster putzen (7 d)", &[f.label_replay.clone()], None);
        f.service.archive_all_cards(&f.todo);
        f.service.add_card(&f.backlog, "Due", &[], Some(now()));

        let config = ReplayConfig { lookahead_days: 1_000_000_000_000, ..ReplayConfig::default() };
        let mut session = BoardSession::open(f.service.clone(), "UNITTEST").await.unwrap();
        let err = ReplayChore::new(config).run_at(&mut session, &mut RunProgress::new(), now()).await.err().unwrap();
        assert!(matches!(err.downcast_ref::<HousekeeperError>(), Some(HousekeeperError::InvalidConfig(_))));

        assert!(f.service.card(&archived).unwrap().is_closed());
        assert_eq!(f.service.open_card_names(&f.backlog), vec!["Due"]);
    }

    #[test]
    fn delays_are_bounded() {
        assert_eq!(days_after(now(), 3).unwrap(), now() + Duration::days(3));
        assert!(days_after(now(), MAX_LOOKAHEAD_DAYS).is_ok());
        assert!(days_after(now(), MAX_LOOKAHEAD_DAYS + 1).is_err());
        assert!(days_after(now(), -1).is_err());
        assert!(days_after(now(), i64::MAX).is_err());
    }
}
