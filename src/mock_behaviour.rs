//! Failure injection for the in-memory board service
#![cfg(any(test, feature = "mock_board"))]

use std::error::Error;

/// How a [`MockBoardService`](crate::mock_board::MockBoardService) answers its calls during a test.
///
/// Each operation has a `(m, n)` plan: the first `m` calls succeed, the next `n` calls fail, and every later call succeeds.
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    pub get_boards_behaviour: (u32, u32),
    pub get_cards_behaviour: (u32, u32),
    pub create_card_behaviour: (u32, u32),
    pub add_checklist_behaviour: (u32, u32),
    pub update_card_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_get_boards(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.get_boards_behaviour, "get_boards")
    }
    pub fn can_get_cards(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.get_cards_behaviour, "get_cards")
    }
    pub fn can_create_card(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.create_card_behaviour, "create_card")
    }
    pub fn can_add_checklist(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.add_checklist_behaviour, "add_checklist")
    }
    pub fn can_update_card(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.update_card_behaviour, "update_card")
    }
}


/// Consume one planned success if any is left, otherwise consume one planned failure and return an error
fn consume(plan: &mut (u32, u32), operation: &str) -> Result<(), Box<dyn Error>> {
    let (successes, failures) = plan;
    if *successes > 0 {
        *successes -= 1;
    } else if *failures > 0 {
        *failures -= 1;
        log::debug!("Mock behaviour: {} fails ({} more failures planned)", operation, failures);
        return Err(format!("Mocked failure of {}", operation).into());
    }
    log::debug!("Mock behaviour: {} is allowed", operation);
    Ok(())
}
