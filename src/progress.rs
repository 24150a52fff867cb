//! Utilities to track the progression of a housekeeping run

use std::fmt::{Display, Error, Formatter};

/// An event that happens during a run
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    /// The run has not started
    NotStarted,
    /// The run has just started but no chore is handled yet
    Started,
    /// A chore is in progress.
    InProgress{ chore: String, details: String },
    /// The run is finished
    Finished{ success: bool },
}

impl Display for RunEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            RunEvent::NotStarted => write!(f, "Not started"),
            RunEvent::Started => write!(f, "Run has started..."),
            RunEvent::InProgress{chore, details} => write!(f, "[{}] {}...", chore, details),
            RunEvent::Finished{success} => match success {
                true => write!(f, "Run successfully finished"),
                false => write!(f, "Run finished with errors"),
            }
        }
    }
}

impl Default for RunEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<RunEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<RunEvent>;

/// Create a feeback channel, that can be used to retrieve the current progress of a run
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(RunEvent::default())
}




/// A structure that tracks the progression and the errors that happen during a run
pub struct RunProgress {
    n_errors: u32,
    feedback_channel: Option<FeedbackSender>,
}
impl RunProgress {
    pub fn new() -> Self {
        Self { n_errors: 0, feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { n_errors: 0, feedback_channel: Some(channel) }
    }

    pub fn is_success(&self) -> bool {
        self.n_errors == 0
    }

    pub fn n_errors(&self) -> u32 {
        self.n_errors
    }

    /// Log an error
    pub fn error(&mut self, text: &str) {
        log::error!("{}", text);
        self.n_errors += 1;
    }
    /// Log a warning. Warnings count as errors: the run will not be reported as successful
    pub fn warn(&mut self, text: &str) {
        log::warn!("{}", text);
        self.n_errors += 1;
    }
    /// Log an info
    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
    }
    /// Log a debug message
    pub fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }
    /// Log a trace message
    pub fn trace(&mut self, text: &str) {
        log::trace!("{}", text);
    }
    /// Send an event as a feedback to the listener (if any).
    pub fn feedback(&mut self, event: RunEvent) {
        if let Some(sender) = &self.feedback_channel {
            // Nobody listening is not an error
            let _ = sender.send(event);
        }
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}
