//! Utilities to compare cards
//!
//! These can be used to sort results, e.g. with `sort_by`, which keeps the relative order of equal cards

use std::cmp::Ordering;

use crate::card::Card;

/// Compare card titles alphabetically, ignoring their case
pub fn compare_cards_alpha(left: &Card, right: &Card) -> Ordering {
    Ord::cmp(&left.name().to_lowercase(), &right.name().to_lowercase())
}

/// Compare due dates, latest first. Cards without a due date come last
pub fn compare_due_dates_desc(left: &Card, right: &Card) -> Ordering {
    match (left.due(), right.due()) {
        (Some(l), Some(r)) => r.cmp(l),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::ids::{CardId, ListId};

    fn card(name: &str, due_day: Option<u32>) -> Card {
        let due = due_day.map(|d| Utc.with_ymd_and_hms(2021, 1, d, 0, 0, 0).unwrap());
        Card::new(CardId::from(name), name.to_string(), ListId::from("l"), 0.0, due, Vec::new())
    }

    #[test]
    fn alphabetical_ignores_case() {
        let mut cards = vec![card("banana", None), card("Apple", None), card("apple", None), card("Cherry", None)];
        cards.sort_by(compare_cards_alpha);
        let names: Vec<&str> = cards.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Apple", "apple", "banana", "Cherry"]);
    }

    #[test]
    fn latest_due_date_first() {
        let mut cards = vec![card("a", Some(3)), card("b", None), card("c", Some(20)), card("d", Some(3))];
        cards.sort_by(compare_due_dates_desc);
        let names: Vec<&str> = cards.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["c", "a", "d", "b"]);
    }
}
