//! Boards, their lists and labels, and a session opened on a single board

use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::traits::BoardService;
use crate::ids::{BoardId, LabelId, ListId};
use crate::error::HousekeeperError;

/// A board, as returned by the board service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    name: String,
    #[serde(default)]
    closed: bool,
}

impl Board {
    pub fn new(id: BoardId, name: String) -> Self {
        Self { id, name, closed: false }
    }

    pub fn id(&self) -> &BoardId { &self.id }
    pub fn name(&self) -> &str   { &self.name }
    pub fn is_closed(&self) -> bool { self.closed }
}

/// A named, ordered column of cards
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardList {
    id: ListId,
    name: String,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    pos: f64,
}

impl BoardList {
    pub fn new(id: ListId, name: String, pos: f64) -> Self {
        Self { id, name, pos, closed: false }
    }

    pub fn id(&self) -> &ListId  { &self.id }
    pub fn name(&self) -> &str   { &self.name }
    pub fn position(&self) -> f64 { self.pos }
}

/// A tag that can be put on cards. Labels are matched by their name only
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    id: LabelId,
    #[serde(default)]
    name: String,
    /// Trello color names (`red`, `sky`...). Labels may have no color
    #[serde(default)]
    color: Option<String>,
}

impl Label {
    pub fn new<S: ToString>(id: LabelId, name: S, color: Option<&str>) -> Self {
        Self { id, name: name.to_string(), color: color.map(|c| c.to_string()) }
    }

    pub fn id(&self) -> &LabelId { &self.id }
    pub fn name(&self) -> &str   { &self.name }
    pub fn color(&self) -> Option<&str> { self.color.as_deref() }
}


/// A connection to a service, bound to a single board.
///
/// The lists and labels of the board are fetched once, when the session is opened (or [`refreshed`](Self::refresh)).
/// Lookups by name are linear scans over these snapshots, and return the first exact match
/// (there is no detection of duplicate names).
pub struct BoardSession<S: BoardService> {
    service: S,
    board: Board,
    lists: Vec<BoardList>,
    labels: Vec<Label>,
}

impl<S: BoardService> BoardSession<S> {
    /// Find the board named `board_name` among the boards visible to the service credentials.
    ///
    /// Returns a [`HousekeeperError::BoardNotFound`] in case no board has this exact name
    pub async fn open(service: S, board_name: &str) -> Result<Self, Box<dyn Error>> {
        let boards = service.get_boards().await?;
        log::debug!("{} boards are visible", boards.len());

        let board = match find_board(&boards, board_name) {
            None => return Err(HousekeeperError::BoardNotFound(board_name.to_string()).into()),
            Some(b) => b.clone(),
        };
        log::info!("Opened board {} ({})", board.name(), board.id());

        let mut session = Self {
            service,
            board,
            lists: Vec::new(),
            labels: Vec::new(),
        };
        session.refresh().await?;
        Ok(session)
    }

    /// Fetch the lists and labels of the board again
    pub async fn refresh(&mut self) -> Result<(), Box<dyn Error>> {
        self.lists = self.service.get_lists(self.board.id()).await?;
        self.labels = self.service.get_labels(self.board.id()).await?;
        log::debug!("Board {} has {} lists and {} labels", self.board.name(), self.lists.len(), self.labels.len());
        Ok(())
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn lists(&self) -> &[BoardList] { &self.lists }
    pub fn labels(&self) -> &[Label] { &self.labels }

    pub fn service(&self) -> &S { &self.service }
    pub fn service_mut(&mut self) -> &mut S { &mut self.service }

    /// Returns the first list that has exactly this name
    pub fn list_by_name(&self, name: &str) -> Option<&BoardList> {
        self.lists.iter().find(|list| list.name() == name)
    }

    /// Returns the first label that has exactly this name
    pub fn label_by_name(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.name() == name)
    }

    /// Same as [`Self::list_by_name`], for callers that cannot do anything without this list
    pub fn require_list(&self, name: &str) -> Result<ListId, HousekeeperError> {
        self.list_by_name(name)
            .map(|list| list.id().clone())
            .ok_or_else(|| HousekeeperError::ListNotFound(name.to_string()))
    }
}

fn find_board<'a>(boards: &'a [Board], name: &str) -> Option<&'a Board> {
    if name.is_empty() {
        return None;
    }
    boards.iter().find(|board| board.name() == name)
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::mock_board::MockBoardService;

    #[tokio::test]
    async fn open_existing_board() {
        let _ = env_logger::builder().is_test(true).try_init();

        let service = MockBoardService::new();
        service.add_board("Groceries");
        let unittest = service.add_board("UNITTEST");
        let list = service.add_list(&unittest, "neue_liste");
        service.add_list(&unittest, "neue_liste");
        service.add_label(&unittest, "Orga", Some("pink"));

        let session = BoardSession::open(service, "UNITTEST").await.unwrap();
        assert_eq!(session.board().id(), &unittest);
        assert_eq!(session.list_by_name("neue_liste").unwrap().id(), &list);
        assert_eq!(session.list_by_name("bla"), None);
        assert_eq!(session.label_by_name("Orga").unwrap().color(), Some("pink"));
        assert_eq!(session.label_by_name("orga"), None);
        assert_eq!(session.require_list("neue_liste").unwrap(), list);
        assert!(matches!(session.require_list("bla"), Err(HousekeeperError::ListNotFound(name)) if name == "bla"));
    }

    #[tokio::test]
    async fn missing_board() {
        let service = MockBoardService::new();
        service.add_board("UNITTEST");

        let err = BoardSession::open(service.clone(), "Tada").await.err().unwrap();
        match err.downcast_ref::<HousekeeperError>() {
            Some(HousekeeperError::BoardNotFound(name)) => assert_eq!(name, "Tada"),
            other => panic!("Unexpected error {:?}", other),
        }

        let err = BoardSession::open(service, "").await.err().unwrap();
        assert!(matches!(err.downcast_ref::<HousekeeperError>(), Some(HousekeeperError::BoardNotFound(_))));
    }

    #[tokio::test]
    async fn refresh_sees_new_lists() {
        let service = MockBoardService::new();
        let board = service.add_board("UNITTEST");

        let mut session = BoardSession::open(service, "UNITTEST").await.unwrap();
        assert!(session.list_by_name("Replay").is_none());

        session.service_mut().add_list(&board, "Replay");
        assert!(session.list_by_name("Replay").is_none());
        session.refresh().await.unwrap();
        assert!(session.list_by_name("Replay").is_some());
    }
}
