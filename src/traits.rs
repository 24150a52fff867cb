use std::error::Error;

use async_trait::async_trait;

use crate::board::{Board, BoardList, Label};
use crate::card::{Card, CardFilter, CardUpdate, Checklist, NewCard};
use crate::ids::{BoardId, CardId, ListId};

/// The operations a remote board service (e.g. Trello) must provide to this crate
#[async_trait]
pub trait BoardService {
    /// Returns every board that is visible with the current credentials
    async fn get_boards(&self) -> Result<Vec<Board>, Box<dyn Error>>;

    /// Returns the open lists of a board, in the order they are displayed
    async fn get_lists(&self, board: &BoardId) -> Result<Vec<BoardList>, Box<dyn Error>>;
    /// Returns the labels defined on a board
    async fn get_labels(&self, board: &BoardId) -> Result<Vec<Label>, Box<dyn Error>>;

    /// Returns the cards of a whole board
    async fn get_board_cards(&self, board: &BoardId, filter: CardFilter) -> Result<Vec<Card>, Box<dyn Error>>;
    /// Returns the cards of a list, sorted by ascending position
    async fn get_list_cards(&self, list: &ListId, filter: CardFilter) -> Result<Vec<Card>, Box<dyn Error>>;

    /// Create a card, and return it as the server stored it
    async fn create_card(&mut self, card: NewCard) -> Result<Card, Box<dyn Error>>;
    /// Attach a new checklist to a card, and fill it with `items`
    async fn add_checklist(&mut self, card: &CardId, name: &str, items: &[String]) -> Result<Checklist, Box<dyn Error>>;
    /// Change the list, archive state, due date and/or position of a card
    async fn update_card(&mut self, card: &CardId, update: CardUpdate) -> Result<Card, Box<dyn Error>>;
}
