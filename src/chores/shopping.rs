//! Put bought shopping items back into the lists of things that are not needed right now
//!
//! Items of a shopping list are archived once bought. This chore takes them out of the archive and files them
//! into a list per category (e.g. `Gerade nicht kaufen (Lebensmittel)`), so that they can be dragged back to the shopping list the next time they are needed.

use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::board::BoardSession;
use crate::card::{Card, CardFilter, CardUpdate, Position};
use crate::ids::ListId;
use crate::progress::RunProgress;
use crate::traits::BoardService;
use crate::utils::comparison::compare_cards_alpha;

/// Placeholder for the category in [`ShoppingConfig::list_template`]
const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Associates a label name to a category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub label: String,
    pub category: String,
}

impl CategoryMapping {
    pub fn new<S: ToString, T: ToString>(label: S, category: T) -> Self {
        Self { label: label.to_string(), category: category.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingConfig {
    /// Several labels may lead to the same category. The order matters when a card has several labels (see [`ShoppingChore::category_of`])
    pub categories: Vec<CategoryMapping>,
    /// Name of the list of a category
    pub list_template: String,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryMapping::new("Lebensmittel", "Lebensmittel"),
                CategoryMapping::new("Getränke", "Lebensmittel"),
                CategoryMapping::new("Drogerie", "Drogerie"),
            ],
            list_template: format!("Gerade nicht kaufen ({})", CATEGORY_PLACEHOLDER),
        }
    }
}

impl ShoppingConfig {
    pub fn list_name(&self, category: &str) -> String {
        self.list_template.replace(CATEGORY_PLACEHOLDER, category)
    }

    /// Every category once, in the order of their first appearance in the mapping
    pub fn distinct_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for mapping in &self.categories {
            if categories.contains(&mapping.category.as_str()) == false {
                categories.push(&mapping.category);
            }
        }
        categories
    }
}


pub struct ShoppingChore {
    config: ShoppingConfig,
}

impl ShoppingChore {
    pub fn new(config: ShoppingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShoppingConfig {
        &self.config
    }

    /// The category of the first label of `card` (in the card's own label order) that is known to the mapping
    pub fn category_of(&self, card: &Card) -> Option<&str> {
        card.labels().iter()
            .find_map(|label| {
                self.config.categories.iter()
                    .find(|mapping| mapping.label == label.name())
                    .map(|mapping| mapping.category.as_str())
            })
    }

    /// Re-file every archived card that has a category label, then sort every category list.
    ///
    /// Returns the number of cards that have been taken out of the archive.
    /// Cards whose category list does not exist stay archived (this is logged as a warning).
    pub async fn run<S: BoardService>(&self, session: &mut BoardSession<S>, progress: &mut RunProgress) -> Result<usize, Box<dyn Error>> {
        let board_id = session.board().id().clone();
        let closed_cards = session.service().get_board_cards(&board_id, CardFilter::Closed).await?;
        progress.debug(&format!("{} archived cards on the board", closed_cards.len()));

        let mut refiled = 0;
        for (category, cards) in self.buckets(closed_cards) {
            let list_name = self.config.list_name(category);
            let list_id = match session.list_by_name(&list_name) {
                None => {
                    progress.warn(&format!("No list named {:?}, {} archived cards of category {} are left in the archive", list_name, cards.len(), category));
                    continue;
                },
                Some(list) => list.id().clone(),
            };

            for card in cards {
                progress.debug(&format!("Moving {:?} to {:?}", card.name(), list_name));
                let update = CardUpdate::new().reopen().move_to(list_id.clone());
                session.service_mut().update_card(card.id(), update).await?;
                refiled += 1;
            }
        }
        progress.info(&format!("{} shopping items taken out of the archive", refiled));

        for category in self.config.distinct_categories() {
            let list_name = self.config.list_name(category);
            let list_id = match session.list_by_name(&list_name) {
                None => {
                    progress.debug(&format!("No list named {:?} to sort", list_name));
                    continue;
                },
                Some(list) => list.id().clone(),
            };
            sort_list_alphabetically(session, &list_id).await?;
        }

        Ok(refiled)
    }

    /// Group cards by category, in the order of [`ShoppingConfig::distinct_categories`]. Cards without category are dropped
    fn buckets(&self, cards: Vec<Card>) -> Vec<(&str, Vec<Card>)> {
        let mut buckets: Vec<(&str, Vec<Card>)> = self.config.distinct_categories()
            .into_iter()
            .map(|category| (category, Vec::new()))
            .collect();

        for card in cards {
            let category = match self.category_of(&card) {
                None => continue,
                Some(c) => c,
            };
            if let Some((_, bucket)) = buckets.iter_mut().find(|(c, _)| *c == category) {
                bucket.push(card);
            }
        }

        buckets.retain(|(_, cards)| cards.is_empty() == false);
        buckets
    }
}

/// Give the open cards of a list the positions 1..N, in case-insensitive alphabetical order of their titles
async fn sort_list_alphabetically<S: BoardService>(session: &mut BoardSession<S>, list: &ListId) -> Result<(), Box<dyn Error>> {
    let mut cards = session.service().get_list_cards(list, CardFilter::Open).await?;
    cards.sort_by(compare_cards_alpha);

    for (index, card) in cards.iter().enumerate() {
        let update = CardUpdate::new().position(Position::At((index + 1) as f64));
        session.service_mut().update_card(card.id(), update).await?;
    }
    Ok(())
}
