///! Some utility functions

use std::error::Error;

use crate::board::BoardSession;
use crate::card::{Card, CardFilter};
use crate::traits::BoardService;

pub mod comparison;

/// A debug utility that pretty-prints the open lists of a board, with their cards
pub async fn print_board<S: BoardService>(session: &BoardSession<S>) -> Result<(), Box<dyn Error>> {
    println!("BOARD {} ({})", session.board().name(), session.board().id());
    for list in session.lists() {
        println!("  LIST {} ({})", list.name(), list.id());
        let cards = session.service().get_list_cards(list.id(), CardFilter::Open).await?;
        for card in &cards {
            print_card(card);
        }
    }
    Ok(())
}

pub fn print_card(card: &Card) {
    println!("    {}", format_card(card));
}

/// One line describing a card: archive state, title, due date and labels
pub fn format_card(card: &Card) -> String {
    let closed = if card.is_closed() { "x" } else { " " };
    let due = match card.due() {
        None => String::new(),
        Some(due) => format!(" (due {})", due.format("%Y-%m-%d")),
    };
    let labels: Vec<&str> = card.labels().iter().map(|l| l.name()).collect();
    let labels = if labels.is_empty() {
        String::new()
    } else {
        format!(" [{}]", labels.join(", "))
    };
    format!("{} {}{}{}", closed, card.name(), due, labels)
}
