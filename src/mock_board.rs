//! An in-memory board service, that behaves (mostly) like a Trello server.
//!
//! It is used to test the chores without any network access.
//! Clones of a `MockBoardService` share the same data, so that a test can keep a handle on the "server" it gave to a [`BoardSession`](crate::board::BoardSession).
#![cfg(any(test, feature = "mock_board"))]

use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::traits::BoardService;
use crate::board::{Board, BoardList, Label};
use crate::card::{Card, CardFilter, CardUpdate, CheckItem, Checklist, NewCard, Position};
use crate::ids::{BoardId, CardId, ChecklistId, LabelId, ListId};
use crate::mock_behaviour::MockBehaviour;

/// Position given to the first card of an empty list
const FIRST_POSITION: f64 = 65536.0;
/// Gap between the last card of a list and a card added at its bottom
const POSITION_STEP: f64 = 16384.0;

#[derive(Default, Debug)]
struct BoardData {
    boards: Vec<Board>,
    lists: Vec<(BoardId, BoardList)>,
    labels: Vec<(BoardId, Label)>,
    /// In creation order
    cards: Vec<Card>,
    checklists: Vec<Checklist>,
}

impl BoardData {
    fn board_of_list(&self, list: &ListId) -> Option<&BoardId> {
        self.lists.iter()
            .find(|(_, l)| l.id() == list)
            .map(|(board, _)| board)
    }

    /// Resolve a [`Position`] in `list`, ignoring the card `moved` (that is being placed)
    fn resolve_position(&self, list: &ListId, pos: Position, moved: Option<&CardId>) -> f64 {
        let positions = self.cards.iter()
            .filter(|c| c.list_id() == list && c.is_closed() == false)
            .filter(|c| Some(c.id()) != moved)
            .map(|c| c.position());

        match pos {
            Position::At(p) => p,
            Position::Top => positions.fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.min(p))))
                .map(|min| min / 2.0)
                .unwrap_or(FIRST_POSITION),
            Position::Bottom => positions.fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
                .map(|max| max + POSITION_STEP)
                .unwrap_or(FIRST_POSITION),
        }
    }

    fn sorted(mut cards: Vec<Card>) -> Vec<Card> {
        cards.sort_by(|a, b| a.position().partial_cmp(&b.position()).unwrap_or(std::cmp::Ordering::Equal));
        cards
    }
}


/// A [`BoardService`] that stores everything in memory
#[derive(Clone, Default)]
pub struct MockBoardService {
    data: Arc<Mutex<BoardData>>,
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MockBoardService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service whose calls may fail, depending on the given behaviour
    pub fn with_behaviour(mock_behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        Self {
            data: Arc::new(Mutex::new(BoardData::default())),
            mock_behaviour: Some(mock_behaviour),
        }
    }

    pub fn add_board(&self, name: &str) -> BoardId {
        let board = Board::new(BoardId::random(), name.to_string());
        let id = board.id().clone();
        self.data.lock().unwrap().boards.push(board);
        id
    }

    pub fn add_list(&self, board: &BoardId, name: &str) -> ListId {
        let mut data = self.data.lock().unwrap();
        let pos = (data.lists.len() as f64 + 1.0) * POSITION_STEP;
        let list = BoardList::new(ListId::random(), name.to_string(), pos);
        let id = list.id().clone();
        data.lists.push((board.clone(), list));
        id
    }

    pub fn add_label(&self, board: &BoardId, name: &str, color: Option<&str>) -> LabelId {
        let label = Label::new(LabelId::random(), name, color);
        let id = label.id().clone();
        self.data.lock().unwrap().labels.push((board.clone(), label));
        id
    }

    /// Add an open card at the bottom of a list
    ///
    /// # Panics
    /// Panics if a label does not exist
    pub fn add_card(&self, list: &ListId, name: &str, labels: &[LabelId], due: Option<DateTime<Utc>>) -> CardId {
        let mut data = self.data.lock().unwrap();
        let labels = labels.iter()
            .map(|id| {
                data.labels.iter()
                    .find(|(_, l)| l.id() == id)
                    .map(|(_, l)| l.clone())
                    .expect("unknown label")
            })
            .collect();
        let pos = data.resolve_position(list, Position::Bottom, None);
        let card = Card::new(CardId::random(), name.to_string(), list.clone(), pos, due, labels);
        let id = card.id().clone();
        data.cards.push(card);
        id
    }

    /// Archive every open card of a list
    pub fn archive_all_cards(&self, list: &ListId) {
        let mut data = self.data.lock().unwrap();
        for card in data.cards.iter_mut().filter(|c| c.list_id() == list) {
            card.set_closed(true);
        }
    }

    pub fn card(&self, id: &CardId) -> Option<Card> {
        self.data.lock().unwrap().cards.iter()
            .find(|c| c.id() == id)
            .cloned()
    }

    /// The open cards of a list, in display order
    pub fn open_cards(&self, list: &ListId) -> Vec<Card> {
        let data = self.data.lock().unwrap();
        BoardData::sorted(data.cards.iter()
            .filter(|c| c.list_id() == list && c.is_closed() == false)
            .cloned()
            .collect())
    }

    /// The names of the open cards of a list, in display order
    pub fn open_card_names(&self, list: &ListId) -> Vec<String> {
        self.open_cards(list).iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// The archived cards of a whole board
    pub fn closed_cards(&self, board: &BoardId) -> Vec<Card> {
        let data = self.data.lock().unwrap();
        data.cards.iter()
            .filter(|c| c.is_closed() && data.board_of_list(c.list_id()) == Some(board))
            .cloned()
            .collect()
    }

    pub fn checklists_of(&self, card: &CardId) -> Vec<Checklist> {
        self.data.lock().unwrap().checklists.iter()
            .filter(|cl| cl.card_id() == card)
            .cloned()
            .collect()
    }

    fn check_behaviour<F>(&self, check: F) -> Result<(), Box<dyn Error>>
    where
        F: FnOnce(&mut MockBehaviour) -> Result<(), Box<dyn Error>>,
    {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => {
                let mut behaviour = behaviour.lock().unwrap();
                check(&mut *behaviour)
            },
        }
    }
}

#[async_trait]
impl BoardService for MockBoardService {
    async fn get_boards(&self) -> Result<Vec<Board>, Box<dyn Error>> {
        self.check_behaviour(|b| b.can_get_boards())?;
        Ok(self.data.lock().unwrap().boards.clone())
    }

    async fn get_lists(&self, board: &BoardId) -> Result<Vec<BoardList>, Box<dyn Error>> {
        Ok(self.data.lock().unwrap().lists.iter()
            .filter(|(b, _)| b == board)
            .map(|(_, l)| l.clone())
            .collect())
    }

    async fn get_labels(&self, board: &BoardId) -> Result<Vec<Label>, Box<dyn Error>> {
        Ok(self.data.lock().unwrap().labels.iter()
            .filter(|(b, _)| b == board)
            .map(|(_, l)| l.clone())
            .collect())
    }

    async fn get_board_cards(&self, board: &BoardId, filter: CardFilter) -> Result<Vec<Card>, Box<dyn Error>> {
        self.check_behaviour(|b| b.can_get_cards())?;
        let data = self.data.lock().unwrap();
        Ok(data.cards.iter()
            .filter(|c| filter.accepts(c) && data.board_of_list(c.list_id()) == Some(board))
            .cloned()
            .collect())
    }

    async fn get_list_cards(&self, list: &ListId, filter: CardFilter) -> Result<Vec<Card>, Box<dyn Error>> {
        self.check_behaviour(|b| b.can_get_cards())?;
        let data = self.data.lock().unwrap();
        Ok(BoardData::sorted(data.cards.iter()
            .filter(|c| filter.accepts(c) && c.list_id() == list)
            .cloned()
            .collect()))
    }

    async fn create_card(&mut self, card: NewCard) -> Result<Card, Box<dyn Error>> {
        self.check_behaviour(|b| b.can_create_card())?;
        let mut data = self.data.lock().unwrap();
        if data.board_of_list(&card.id_list).is_none() {
            return Err(format!("No list with ID {}", card.id_list).into());
        }

        let mut labels = Vec::new();
        for label_id in &card.id_labels {
            match data.labels.iter().find(|(_, l)| l.id() == label_id) {
                None => return Err(format!("No label with ID {}", label_id).into()),
                Some((_, label)) => labels.push(label.clone()),
            }
        }

        let pos = data.resolve_position(&card.id_list, card.pos, None);
        let created = Card::new(CardId::random(), card.name, card.id_list, pos, card.due, labels);
        data.cards.push(created.clone());
        Ok(created)
    }

    async fn add_checklist(&mut self, card: &CardId, name: &str, items: &[String]) -> Result<Checklist, Box<dyn Error>> {
        self.check_behaviour(|b| b.can_add_checklist())?;
        let mut data = self.data.lock().unwrap();
        if data.cards.iter().any(|c| c.id() == card) == false {
            return Err(format!("No card with ID {}", card).into());
        }

        let mut checklist = Checklist::new(ChecklistId::random(), name.to_string(), card.clone());
        for item in items {
            checklist.push_item(CheckItem::new(item));
        }
        data.checklists.push(checklist.clone());
        Ok(checklist)
    }

    async fn update_card(&mut self, card: &CardId, update: CardUpdate) -> Result<Card, Box<dyn Error>> {
        self.check_behaviour(|b| b.can_update_card())?;
        let mut data = self.data.lock().unwrap();

        let current_list = match data.cards.iter().find(|c| c.id() == card) {
            None => return Err(format!("No card with ID {}", card).into()),
            Some(c) => c.list_id().clone(),
        };
        let target_list = update.id_list.clone().unwrap_or(current_list);
        if data.board_of_list(&target_list).is_none() {
            return Err(format!("No list with ID {}", target_list).into());
        }

        let resolved_pos = update.pos.map(|pos| data.resolve_position(&target_list, pos, Some(card)));
        let stored = data.cards.iter_mut()
            .find(|c| c.id() == card)
            .ok_or("card vanished")?;
        stored.apply(&update, resolved_pos);
        Ok(stored.clone())
    }
}
