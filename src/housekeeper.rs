//! Run the configured chores on a board, one after the other

use std::error::Error;

use chrono::{DateTime, Utc};

use crate::board::BoardSession;
use crate::chores::{ReminderChore, ReplayChore, ShoppingChore};
use crate::config::{Chores, Settings};
use crate::progress::{FeedbackSender, RunEvent, RunProgress};
use crate::traits::BoardService;

/// Runs the housekeeping chores selected in its [`Settings`] on a board.
///
/// Chores are independent: a chore that fails does not prevent the next ones from running.
/// Changes that a failing chore already applied to the board are kept.
pub struct Housekeeper<S: BoardService> {
    session: BoardSession<S>,
    settings: Settings,
}

impl<S: BoardService> Housekeeper<S> {
    pub fn new(session: BoardSession<S>, settings: Settings) -> Self {
        Self { session, settings }
    }

    /// Open the board named in `settings` and create a housekeeper for it
    pub async fn open(service: S, settings: Settings) -> Result<Self, Box<dyn Error>> {
        let session = BoardSession::open(service, &settings.board_name).await?;
        Ok(Self::new(session, settings))
    }

    pub fn session(&self) -> &BoardSession<S> { &self.session }
    pub fn settings(&self) -> &Settings { &self.settings }

    /// Run the chores, and provide feedback about the progress.
    ///
    /// It returns whether the run was totally successful (details about errors are logged using the `log::*` macros).
    pub async fn run_with_feedback(&mut self, feedback_sender: FeedbackSender) -> bool {
        let mut progress = RunProgress::new_with_feedback_channel(feedback_sender);
        self.run_chores(&mut progress, Utc::now()).await
    }

    /// Run the chores, without giving any feedback.
    ///
    /// See [`Self::run_with_feedback`]
    pub async fn run(&mut self) -> bool {
        self.run_at(Utc::now()).await
    }

    /// Run the chores as if the current time was `now`
    pub async fn run_at(&mut self, now: DateTime<Utc>) -> bool {
        let mut progress = RunProgress::new();
        self.run_chores(&mut progress, now).await
    }

    async fn run_chores(&mut self, progress: &mut RunProgress, now: DateTime<Utc>) -> bool {
        progress.info(&format!("Starting housekeeping of board {:?}", self.session.board().name()));
        progress.feedback(RunEvent::Started);
        let chores = self.settings.chores;

        if chores.contains(Chores::SHOPPING) {
            progress.feedback(RunEvent::InProgress{ chore: "shopping".to_string(), details: "re-filing bought items".to_string() });
            if let Err(err) = self.run_shopping(progress).await {
                progress.error(&format!("Shopping chore failed: {}", err));
            }
        }

        if chores.contains(Chores::REPLAY) {
            progress.feedback(RunEvent::InProgress{ chore: "replay".to_string(), details: "recycling replay cards".to_string() });
            if let Err(err) = self.run_replay(progress, now).await {
                progress.error(&format!("Replay chore failed: {}", err));
            }
        }

        if chores.contains(Chores::REMINDERS) {
            progress.feedback(RunEvent::InProgress{ chore: "reminders".to_string(), details: "creating reminders".to_string() });
            if let Err(err) = self.run_reminders(progress, now).await {
                progress.error(&format!("Reminder chore failed: {}", err));
            }
        }

        progress.feedback(RunEvent::Finished{ success: progress.is_success() });
        progress.info(&format!("Housekeeping finished with {} errors", progress.n_errors()));
        progress.is_success()
    }

    async fn run_shopping(&mut self, progress: &mut RunProgress) -> Result<(), Box<dyn Error>> {
        let chore = ShoppingChore::new(self.settings.shopping.clone());
        chore.run(&mut self.session, progress).await?;
        Ok(())
    }

    async fn run_replay(&mut self, progress: &mut RunProgress, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
        let chore = ReplayChore::new(self.settings.replay.clone());
        let outcome = chore.run_at(&mut self.session, progress, now).await?;
        progress.debug(&format!("Replay: {} cards revived, {} promoted", outcome.revived, outcome.promoted));
        Ok(())
    }

    async fn run_reminders(&mut self, progress: &mut RunProgress, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
        let chore = ReminderChore::new(self.settings.reminders.clone());
        chore.run_at(&mut self.session, progress, now).await?;
        Ok(())
    }
}
