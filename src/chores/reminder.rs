//! Create recurring reminder cards, the day before they are due
//!
//! A reminder is scheduled on some weekdays, on some days of every month, or on some days of some months.
//! When tomorrow matches its schedule, a card is added on top of the to-do list, with a checklist and an organizational label.

use std::error::Error;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::board::BoardSession;
use crate::card::{Card, NewCard, Position};
use crate::error::HousekeeperError;
use crate::progress::RunProgress;
use crate::traits::BoardService;

/// When a reminder should be created.
///
/// Weekdays are checked first. Days of the month are only considered when no weekday matches,
/// and are restricted to `months_of_year` (1 = January) when it is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<Weekday>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_month: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_of_year: Option<Vec<u32>>,
}

/// The part of a [`ReminderSchedule`] that matched a date
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScheduleRule {
    Weekly,
    Monthly,
    Yearly,
}

impl ReminderSchedule {
    pub fn weekly(days: &[Weekday]) -> Self {
        Self { days_of_week: Some(days.to_vec()), ..Self::default() }
    }

    pub fn monthly(days: &[u32]) -> Self {
        Self { days_of_month: Some(days.to_vec()), ..Self::default() }
    }

    pub fn yearly(months: &[u32], days: &[u32]) -> Self {
        Self { days_of_month: Some(days.to_vec()), months_of_year: Some(months.to_vec()), ..Self::default() }
    }

    /// Also remind on these weekdays
    pub fn with_weekdays(mut self, days: &[Weekday]) -> Self {
        self.days_of_week = Some(days.to_vec());
        self
    }

    /// Which rule (if any) selects `date`. At most one rule is returned, the weekly one has the priority
    pub fn matching_rule(&self, date: NaiveDate) -> Option<ScheduleRule> {
        if let Some(weekdays) = &self.days_of_week {
            if weekdays.contains(&date.weekday()) {
                return Some(ScheduleRule::Weekly);
            }
        }

        let days = self.days_of_month.as_ref()?;
        if days.contains(&date.day()) == false {
            return None;
        }
        match &self.months_of_year {
            None => Some(ScheduleRule::Monthly),
            Some(months) if months.contains(&date.month()) => Some(ScheduleRule::Yearly),
            Some(_) => None,
        }
    }

    /// Check the values are valid days and months
    pub fn validate(&self) -> Result<(), HousekeeperError> {
        if let Some(days) = &self.days_of_month {
            if let Some(day) = days.iter().find(|d| (1..=31).contains(*d) == false) {
                return Err(HousekeeperError::InvalidConfig(format!("{} is not a day of the month", day)));
            }
        }
        if let Some(months) = &self.months_of_year {
            if let Some(month) = months.iter().find(|m| (1..=12).contains(*m) == false) {
                return Err(HousekeeperError::InvalidConfig(format!("{} is not a month", month)));
            }
        }
        Ok(())
    }
}


/// A reminder card and its schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReminderDefinition {
    pub title: String,
    #[serde(default)]
    pub checklist: Vec<String>,
    #[serde(flatten)]
    pub schedule: ReminderSchedule,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub todo_list: String,
    /// Label put on every reminder card
    pub label: String,
    pub checklist_name: String,
    pub reminders: Vec<ReminderDefinition>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            todo_list: "ToDo".to_string(),
            label: "Orga".to_string(),
            checklist_name: "Checklist".to_string(),
            reminders: Vec::new(),
        }
    }
}


pub struct ReminderChore {
    config: ReminderConfig,
}

impl ReminderChore {
    pub fn new(config: ReminderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    pub async fn run<S: BoardService>(&self, session: &mut BoardSession<S>, progress: &mut RunProgress) -> Result<usize, Box<dyn Error>> {
        self.run_at(session, progress, Utc::now()).await
    }

    /// Create the cards of every configured reminder that is due tomorrow.
    ///
    /// A reminder that cannot be created is logged as a warning, and does not prevent the next ones. Returns the number of created cards
    pub async fn run_at<S: BoardService>(&self, session: &mut BoardSession<S>, progress: &mut RunProgress, now: DateTime<Utc>) -> Result<usize, Box<dyn Error>> {
        let mut created = 0;
        for reminder in &self.config.reminders {
            match self.create_scheduled_reminder(session, progress, &reminder.title, &reminder.checklist, &reminder.schedule, now).await {
                Err(err) => progress.warn(&format!("Unable to create reminder {:?}: {}", reminder.title, err)),
                Ok(None) => progress.trace(&format!("Reminder {:?} is not due tomorrow", reminder.title)),
                Ok(Some(_)) => created += 1,
            }
        }
        progress.info(&format!("{} reminder cards created", created));
        Ok(created)
    }

    /// Create a reminder card if the day after `now` matches `schedule`.
    ///
    /// The card is put at the top of the to-do list, with the organizational label.
    /// A checklist is added in case `checklist` is not empty.
    /// Returns the created card, or `None` if the schedule does not match.
    pub async fn create_scheduled_reminder<S: BoardService>(&self, session: &mut BoardSession<S>, progress: &mut RunProgress,
        title: &str, checklist: &[String], schedule: &ReminderSchedule, now: DateTime<Utc>) -> Result<Option<Card>, Box<dyn Error>>
    {
        let tomorrow = now.date_naive() + Duration::days(1);
        let rule = match schedule.matching_rule(tomorrow) {
            None => return Ok(None),
            Some(rule) => rule,
        };
        log::debug!("Reminder {:?} matches {} ({:?} rule)", title, tomorrow, rule);

        let todo = session.require_list(&self.config.todo_list)?;
        let mut new_card = NewCard::new(todo, title, Position::Top);
        match session.label_by_name(&self.config.label) {
            None => progress.warn(&format!("No label named {:?}, the reminder {:?} will have no label", self.config.label, title)),
            Some(label) => new_card = new_card.with_label(label.id().clone()),
        }

        let card = session.service_mut().create_card(new_card).await?;
        if checklist.is_empty() == false {
            session.service_mut().add_checklist(card.id(), &self.config.checklist_name, checklist).await?;
        }
        log::info!("Created reminder {:?}", title);
        Ok(Some(card))
    }
}
