//! Cards, and the requests that create or modify them

use serde::{Deserialize, Serialize, Serializer};
use chrono::{DateTime, Utc};

use crate::board::Label;
use crate::ids::{CardId, ChecklistId, LabelId, ListId};

/// A card, as returned by the board service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    id: CardId,
    /// The card title
    name: String,
    /// Whether the card is archived
    #[serde(default)]
    closed: bool,
    id_list: ListId,
    /// The ordering key within its list. Lower values are displayed first
    #[serde(default)]
    pos: f64,
    #[serde(default)]
    due: Option<DateTime<Utc>>,
    #[serde(default)]
    labels: Vec<Label>,
}

impl Card {
    pub fn new(id: CardId, name: String, list: ListId, pos: f64, due: Option<DateTime<Utc>>, labels: Vec<Label>) -> Self {
        Self {
            id, name, pos, due, labels,
            closed: false,
            id_list: list,
        }
    }

    pub fn id(&self) -> &CardId          { &self.id }
    pub fn name(&self) -> &str           { &self.name }
    pub fn is_closed(&self) -> bool      { self.closed }
    pub fn list_id(&self) -> &ListId     { &self.id_list }
    pub fn position(&self) -> f64        { self.pos }
    pub fn due(&self) -> Option<&DateTime<Utc>> { self.due.as_ref() }
    pub fn labels(&self) -> &[Label]     { &self.labels }

    /// Whether one of the labels of this card has exactly this name
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name() == name)
    }

    /// Apply the changes of an update, the way the board service does
    #[cfg(any(test, feature = "mock_board"))]
    pub(crate) fn apply(&mut self, update: &CardUpdate, resolved_pos: Option<f64>) {
        if let Some(list) = &update.id_list {
            self.id_list = list.clone();
        }
        if let Some(closed) = update.closed {
            self.closed = closed;
        }
        if let Some(due) = update.due {
            self.due = Some(due);
        }
        if let Some(pos) = resolved_pos {
            self.pos = pos;
        }
    }

    #[cfg(any(test, feature = "mock_board"))]
    pub(crate) fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }
}


/// Where a card should be placed in its list
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Before every other card of the list
    Top,
    /// After every other card of the list
    Bottom,
    /// At an explicit ordering key
    At(f64),
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Position::Top => serializer.serialize_str("top"),
            Position::Bottom => serializer.serialize_str("bottom"),
            Position::At(pos) => serializer.serialize_f64(*pos),
        }
    }
}


/// Which cards should be retrieved, depending on their archive state
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardFilter {
    Open,
    Closed,
    All,
}

impl CardFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardFilter::Open => "open",
            CardFilter::Closed => "closed",
            CardFilter::All => "all",
        }
    }

    pub fn accepts(&self, card: &Card) -> bool {
        match self {
            CardFilter::Open => card.is_closed() == false,
            CardFilter::Closed => card.is_closed(),
            CardFilter::All => true,
        }
    }
}


/// A card that does not exist on the board yet
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub id_list: ListId,
    pub name: String,
    pub pos: Position,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub id_labels: Vec<LabelId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
}

impl NewCard {
    pub fn new<S: ToString>(list: ListId, name: S, pos: Position) -> Self {
        Self {
            id_list: list,
            name: name.to_string(),
            pos,
            id_labels: Vec::new(),
            due: None,
        }
    }

    pub fn with_label(mut self, label: LabelId) -> Self {
        self.id_labels.push(label);
        self
    }
}


/// A partial modification of a card. Fields that are `None` are left untouched
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_list: Option<ListId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<Position>,
}

impl CardUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the card to another list. Its position is kept unless [`Self::position`] is also used
    pub fn move_to(mut self, list: ListId) -> Self {
        self.id_list = Some(list);
        self
    }

    /// Take the card out of the archive
    pub fn reopen(mut self) -> Self {
        self.closed = Some(false);
        self
    }

    pub fn due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn position(mut self, pos: Position) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}


/// A checklist attached to a card
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    id: ChecklistId,
    name: String,
    id_card: CardId,
    #[serde(default)]
    check_items: Vec<CheckItem>,
}

/// One entry of a checklist
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckItem {
    name: String,
}

impl Checklist {
    pub fn new(id: ChecklistId, name: String, card: CardId) -> Self {
        Self { id, name, id_card: card, check_items: Vec::new() }
    }

    pub fn id(&self) -> &ChecklistId    { &self.id }
    pub fn name(&self) -> &str          { &self.name }
    pub fn card_id(&self) -> &CardId    { &self.id_card }
    pub fn items(&self) -> &[CheckItem] { &self.check_items }

    pub(crate) fn push_item(&mut self, item: CheckItem) {
        self.check_items.push(item);
    }
}

impl CheckItem {
    pub fn new<S: ToString>(name: S) -> Self {
        Self { name: name.to_string() }
    }

    pub fn name(&self) -> &str { &self.name }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserialize_trello_card() {
        let json = r#"{
            "id": "5abbe4b7ddc1b351ef961414",
            "name": "Milk (3 d)",
            "closed": true,
            "idList": "5abbe4b7ddc1b351ef961415",
            "idBoard": "5abbe4b7ddc1b351ef961410",
            "pos": 65535,
            "due": "2021-03-04T11:00:00.000Z",
            "labels": [
                {"id": "l1", "idBoard": "5abbe4b7ddc1b351ef961410", "name": "replay", "color": "red"}
            ]
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.name(), "Milk (3 d)");
        assert!(card.is_closed());
        assert_eq!(card.list_id().as_str(), "5abbe4b7ddc1b351ef961415");
        assert_eq!(card.position(), 65535.0);
        assert_eq!(card.due(), Some(&Utc.with_ymd_and_hms(2021, 3, 4, 11, 0, 0).unwrap()));
        assert!(card.has_label("replay"));
        assert!(card.has_label("Replay") == false);
    }

    #[test]
    fn card_without_due_date() {
        let json = r#"{"id": "c", "name": "Bread", "idList": "l", "pos": 1.5, "due": null, "labels": []}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.due(), None);
        assert!(card.is_closed() == false);
    }

    #[test]
    fn update_only_sends_what_changes() {
        let update = CardUpdate::new()
            .move_to(ListId::from("replay"))
            .reopen()
            .position(Position::Top);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"idList": "replay", "closed": false, "pos": "top"}));

        assert!(CardUpdate::new().is_empty());
        let json = serde_json::to_value(&CardUpdate::new().position(Position::At(3.0))).unwrap();
        assert_eq!(json, serde_json::json!({"pos": 3.0}));
    }

    #[test]
    fn new_card_payload() {
        let card = NewCard::new(ListId::from("todo"), "Pay rent", Position::Top)
            .with_label(LabelId::from("orga"));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json, serde_json::json!({"idList": "todo", "name": "Pay rent", "pos": "top", "idLabels": ["orga"]}));
    }
}
