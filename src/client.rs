//! This module provides a client to connect to the Trello REST API

use std::error::Error;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::traits::BoardService;
use crate::resource::Resource;
use crate::board::{Board, BoardList, Label};
use crate::card::{Card, CardFilter, CardUpdate, CheckItem, Checklist, NewCard};
use crate::ids::{BoardId, CardId, ListId};
use crate::error::HousekeeperError;

/// The root of the public Trello API
pub static TRELLO_API_URL: &str = "https://api.trello.com/1/";


/// A [`BoardService`] that talks to a Trello server.
///
/// Every call is a single HTTP request (except [`BoardService::add_checklist`], that needs one more request per item).
/// There are no retries: a failed request is an error.
pub struct Client {
    resource: Resource,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for an API rooted at `url`. This does not start a connection
    pub fn new<S: AsRef<str>, T: ToString, U: ToString>(url: S, key: T, token: U) -> Result<Self, Box<dyn Error>> {
        let mut url = url.as_ref().to_string();
        if url.ends_with('/') == false {
            url.push('/');
        }
        let url = Url::parse(&url)?;

        Ok(Self{
            resource: Resource::new(url, key.to_string(), token.to_string()),
            http: reqwest::Client::new(),
        })
    }

    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let mut url = self.resource.combine(path)?;
        for (name, value) in query {
            url.query_pairs_mut().append_pair(name, value);
        }
        log::trace!("GET {}", path);

        let response = self.http
            .get(url)
            .send()
            .await?;
        let response = check_status(response, path)?;
        Ok(response.json::<T>().await?)
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, Box<dyn Error>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.resource.combine(path)?;
        log::trace!("{} {}", method, path);

        let response = self.http
            .request(method, url)
            .json(body)
            .send()
            .await?;
        let response = check_status(response, path)?;
        Ok(response.json::<T>().await?)
    }
}

fn check_status(response: reqwest::Response, path: &str) -> Result<reqwest::Response, HousekeeperError> {
    let status = response.status();
    if status.is_success() == false {
        return Err(HousekeeperError::UnexpectedStatus { status: status.as_u16(), endpoint: path.to_string() });
    }
    Ok(response)
}

/// Trello returns cards ordered by position, but nothing in its documentation guarantees it
fn sort_by_position(cards: &mut Vec<Card>) {
    cards.sort_by(|a, b| a.position().partial_cmp(&b.position()).unwrap_or(std::cmp::Ordering::Equal));
}


#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewChecklist<'a> {
    id_card: &'a CardId,
    name: &'a str,
}

#[derive(Serialize)]
struct NewCheckItem<'a> {
    name: &'a str,
}


#[async_trait]
impl BoardService for Client {
    async fn get_boards(&self) -> Result<Vec<Board>, Box<dyn Error>> {
        self.get("members/me/boards", &[("filter", "all")]).await
    }

    async fn get_lists(&self, board: &BoardId) -> Result<Vec<BoardList>, Box<dyn Error>> {
        self.get(&format!("boards/{}/lists", board), &[("filter", "open")]).await
    }

    async fn get_labels(&self, board: &BoardId) -> Result<Vec<Label>, Box<dyn Error>> {
        self.get(&format!("boards/{}/labels", board), &[]).await
    }

    async fn get_board_cards(&self, board: &BoardId, filter: CardFilter) -> Result<Vec<Card>, Box<dyn Error>> {
        let mut cards: Vec<Card> = self.get(&format!("boards/{}/cards/{}", board, filter.as_str()), &[]).await?;
        sort_by_position(&mut cards);
        Ok(cards)
    }

    async fn get_list_cards(&self, list: &ListId, filter: CardFilter) -> Result<Vec<Card>, Box<dyn Error>> {
        let mut cards: Vec<Card> = self.get(&format!("lists/{}/cards/{}", list, filter.as_str()), &[]).await?;
        sort_by_position(&mut cards);
        Ok(cards)
    }

    async fn create_card(&mut self, card: NewCard) -> Result<Card, Box<dyn Error>> {
        let created: Card = self.send(Method::POST, "cards", &card).await?;
        log::debug!("Created card {} ({})", created.name(), created.id());
        Ok(created)
    }

    async fn add_checklist(&mut self, card: &CardId, name: &str, items: &[String]) -> Result<Checklist, Box<dyn Error>> {
        let body = NewChecklist { id_card: card, name };
        let mut checklist: Checklist = self.send(Method::POST, "checklists", &body).await?;

        for item in items {
            let path = format!("checklists/{}/checkItems", checklist.id());
            let created: CheckItem = self.send(Method::POST, &path, &NewCheckItem { name: item }).await?;
            checklist.push_item(created);
        }
        Ok(checklist)
    }

    async fn update_card(&mut self, card: &CardId, update: CardUpdate) -> Result<Card, Box<dyn Error>> {
        let updated: Card = self.send(Method::PUT, &format!("cards/{}", card), &update).await?;
        Ok(updated)
    }
}
