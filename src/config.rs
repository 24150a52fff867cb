//! Support for the housekeeper configuration

use std::convert::TryFrom;
use std::error::Error;
use std::path::Path;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::chores::{ReminderConfig, ReplayConfig, ShoppingConfig};
use crate::chores::replay::MAX_LOOKAHEAD_DAYS;
use crate::client::TRELLO_API_URL;
use crate::error::HousekeeperError;

bitflags! {
    /// The chores a run should perform
    #[derive(Serialize, Deserialize)]
    #[serde(try_from = "Vec<String>", into = "Vec<String>")]
    pub struct Chores: u8 {
        /// Re-file bought shopping items
        const SHOPPING = 1;
        /// Recycle replay cards and promote due cards
        const REPLAY = 2;
        /// Create the recurring reminders due tomorrow
        const REMINDERS = 4;
    }
}

const CHORE_NAMES: [(&str, Chores); 3] = [
    ("shopping", Chores::SHOPPING),
    ("replay", Chores::REPLAY),
    ("reminders", Chores::REMINDERS),
];

impl Default for Chores {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for Chores {
    type Err = HousekeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        CHORE_NAMES.iter()
            .find(|(n, _)| *n == name)
            .map(|(_, chore)| *chore)
            .ok_or_else(|| HousekeeperError::InvalidConfig(format!("unknown chore {:?}", s)))
    }
}

impl TryFrom<Vec<String>> for Chores {
    type Error = HousekeeperError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let mut chores = Chores::empty();
        for name in names {
            chores |= name.parse()?;
        }
        Ok(chores)
    }
}

impl From<Chores> for Vec<String> {
    fn from(chores: Chores) -> Self {
        CHORE_NAMES.iter()
            .filter(|(_, chore)| chores.contains(*chore))
            .map(|(name, _)| name.to_string())
            .collect()
    }
}


/// Everything a run needs to know, except the credentials
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The board to clean up. Its name must match exactly
    pub board_name: String,
    pub api_url: String,
    /// Name of the environment variable that contains the API key
    pub key_var: String,
    /// Name of the environment variable that contains the API token
    pub secret_var: String,
    pub chores: Chores,
    pub shopping: ShoppingConfig,
    pub replay: ReplayConfig,
    pub reminders: ReminderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_name: String::new(),
            api_url: TRELLO_API_URL.to_string(),
            key_var: "TRELLO_API_KEY".to_string(),
            secret_var: "TRELLO_API_SECRET".to_string(),
            chores: Chores::default(),
            shopping: ShoppingConfig::default(),
            replay: ReplayConfig::default(),
            reminders: ReminderConfig::default(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their default values
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let settings: Self = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// The API key and token, read from the environment
    pub fn credentials(&self) -> Result<(String, String), HousekeeperError> {
        let read = |var: &str| {
            std::env::var(var).map_err(|_| HousekeeperError::MissingCredential(var.to_string()))
        };
        Ok((read(&self.key_var)?, read(&self.secret_var)?))
    }

    pub fn validate(&self) -> Result<(), HousekeeperError> {
        if (0..=MAX_LOOKAHEAD_DAYS).contains(&self.replay.lookahead_days) == false {
            return Err(HousekeeperError::InvalidConfig(format!(
                "the replay lookahead must be between 0 and {} days, not {}", MAX_LOOKAHEAD_DAYS, self.replay.lookahead_days)));
        }
        for reminder in &self.reminders.reminders {
            reminder.schedule.validate()
                .map_err(|err| HousekeeperError::InvalidConfig(format!("reminder {:?}: {}", reminder.title, err)))?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::Weekday;
    use crate::chores::ReminderSchedule;

    #[test]
    fn chores_from_names() {
        assert_eq!("shopping".parse::<Chores>().unwrap(), Chores::SHOPPING);
        assert_eq!(" Reminders".parse::<Chores>().unwrap(), Chores::REMINDERS);
        assert!("dishes".parse::<Chores>().is_err());

        let chores: Chores = serde_json::from_str(r#"["replay", "shopping"]"#).unwrap();
        assert_eq!(chores, Chores::SHOPPING | Chores::REPLAY);
        assert_eq!(serde_json::to_string(&chores).unwrap(), r#"["shopping","replay"]"#);
    }

    #[test]
    fn partial_settings_file() {
        let json = r#"{
            "board_name": "Haushalt",
            "chores": ["reminders"],
            "replay": { "lookahead_days": 3 },
            "reminders": { "reminders": [ {"title": "Gym", "days_of_week": ["Mon"]} ] }
        }"#;
        let path = std::env::temp_dir().join(format!("housekeeper-settings-{}.json", std::process::id()));
        std::fs::write(&path, json).unwrap();
        let settings = Settings::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.board_name, "Haushalt");
        assert_eq!(settings.chores, Chores::REMINDERS);
        assert_eq!(settings.replay.lookahead_days, 3);
        assert_eq!(settings.replay.todo_list, "ToDo");
        assert_eq!(settings.reminders.label, "Orga");
        assert_eq!(settings.reminders.reminders[0].schedule, ReminderSchedule::weekly(&[Weekday::Mon]));
        assert_eq!(settings.shopping, ShoppingConfig::default());
        assert_eq!(settings.api_url, TRELLO_API_URL);
    }

    #[test]
    fn missing_file() {
        assert!(Settings::from_file(Path::new("/this/file/does/not/exist.json")).is_err());
    }

    #[test]
    fn invalid_reminders_are_rejected() {
        let mut settings = Settings::default();
        settings.reminders.reminders.push(crate::chores::ReminderDefinition {
            title: "Never".to_string(),
            checklist: Vec::new(),
            schedule: ReminderSchedule::yearly(&[2], &[32]),
        });
        assert!(matches!(settings.validate(), Err(HousekeeperError::InvalidConfig(_))));
    }

    #[test]
    fn lookahead_must_be_in_range() {
        let mut settings = Settings::default();
        settings.replay.lookahead_days = MAX_LOOKAHEAD_DAYS;
        assert!(settings.validate().is_ok());

        for lookahead in &[-1, MAX_LOOKAHEAD_DAYS + 1, 1_000_000_000_000] {
            settings.replay.lookahead_days = *lookahead;
            assert!(matches!(settings.validate(), Err(HousekeeperError::InvalidConfig(_))));
        }

        let json = r#"{ "replay": { "lookahead_days": 1000000000000 } }"#;
        let path = std::env::temp_dir().join(format!("housekeeper-lookahead-{}.json", std::process::id()));
        std::fs::write(&path, json).unwrap();
        let loaded = Settings::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(loaded.is_err());
    }

    #[test]
    fn credentials_from_environment() {
        let settings = Settings {
            key_var: "HOUSEKEEPER_TEST_KEY".to_string(),
            secret_var: "HOUSEKEEPER_TEST_SECRET".to_string(),
            ..Settings::default()
        };
        std::env::set_var("HOUSEKEEPER_TEST_KEY", "the key");
        match settings.credentials() {
            Err(HousekeeperError::MissingCredential(var)) => assert_eq!(var, "HOUSEKEEPER_TEST_SECRET"),
            other => panic!("unexpected result {:?}", other),
        }

        std::env::set_var("HOUSEKEEPER_TEST_SECRET", "the secret");
        assert_eq!(settings.credentials().unwrap(), ("the key".to_string(), "the secret".to_string()));
    }
}
