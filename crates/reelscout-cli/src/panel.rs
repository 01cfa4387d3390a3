use std::io::Write;

use reelscout_core::render::{Container, Generation};
use reelscout_core::view::Card;

/// Results container that prints each card to stdout as it is appended.
#[derive(Debug, Default)]
pub struct TerminalPanel {
    generation: Generation,
    cards: Vec<Card>,
}

impl TerminalPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Card at 1-based `position`, as numbered on screen.
    pub fn card(&self, position: usize) -> Option<&Card> {
        position.checked_sub(1).and_then(|i| self.cards.get(i))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }
}

impl Container for TerminalPanel {
    type Element = Card;

    fn clear(&mut self) -> Generation {
        self.cards.clear();
        self.generation = self.generation.next();
        self.generation
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn append(&mut self, card: Card) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{:>3}. {}", self.cards.len() + 1, card.to_text());
        let _ = out.flush();
        self.cards.push(card);
    }
}
