//! Weather card content and the tap-to-expand stack.
//!
//! Readings are static placeholders; nothing here fetches weather data.

use serde::{Deserialize, Serialize};

use crate::config::CardStyle;

/// Opacity of the forecast block on an expanded card.
pub const EXPANDED_DETAIL_OPACITY: f32 = 0.6;

/// What one card shows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeatherCard {
    pub id: String,
    pub location: String,
    /// Current temperature in whole degrees.
    pub temperature: i32,
    /// Symbolic icon name, e.g. `cloud.rain.fill`.
    pub icon: String,
    pub forecast: String,
    pub high: i32,
    pub low: i32,
    #[serde(default)]
    pub style: CardStyle,
}

impl WeatherCard {
    pub fn london() -> Self {
        Self {
            id: "london".into(),
            location: "London".into(),
            temperature: 14,
            icon: "cloud.rain.fill".into(),
            forecast: "Rain for the next hour".into(),
            high: 15,
            low: 8,
            style: CardStyle::default(),
        }
    }

    /// `14°`
    pub fn temperature_label(&self) -> String {
        format!("{}°", self.temperature)
    }

    /// `H:15° L:8°`
    pub fn range_label(&self) -> String {
        format!("H:{}° L:{}°", self.high, self.low)
    }
}

/// Ordered cards with at most one expanded.
#[derive(Clone, Debug, Default)]
pub struct CardStack {
    cards: Vec<WeatherCard>,
    expanded: Option<usize>,
}

impl CardStack {
    /// Stack with every card collapsed.
    pub fn new(cards: Vec<WeatherCard>) -> Self {
        Self {
            cards,
            expanded: None,
        }
    }

    pub fn cards(&self) -> &[WeatherCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card with the given id.
    pub fn get(&self, id: &str) -> Option<&WeatherCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// The expanded card, if any.
    pub fn expanded(&self) -> Option<&WeatherCard> {
        self.expanded.and_then(|i| self.cards.get(i))
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded().is_some_and(|c| c.id == id)
    }

    /// Toggle a card. Tapping the expanded card collapses it; tapping any
    /// other card expands that one instead. Unknown ids are ignored.
    ///
    /// Returns whether the tapped card is now expanded.
    pub fn tap(&mut self, id: &str) -> bool {
        let Some(index) = self.cards.iter().position(|c| c.id == id) else {
            log::debug!("tap on unknown card {id:?}");
            return false;
        };

        if self.expanded == Some(index) {
            self.expanded = None;
            false
        } else {
            self.expanded = Some(index);
            true
        }
    }

    /// Opacity of a card's forecast block.
    pub fn detail_opacity(&self, id: &str) -> f32 {
        if self.is_expanded(id) {
            EXPANDED_DETAIL_OPACITY
        } else {
            0.0
        }
    }

    /// Collapse whichever card is expanded. Returns `false` if none was.
    pub fn collapse(&mut self) -> bool {
        self.expanded.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> WeatherCard {
        WeatherCard {
            id: "paris".into(),
            location: "Paris".into(),
            temperature: -2,
            icon: "cloud.snow.fill".into(),
            forecast: "Snow this evening".into(),
            high: 1,
            low: -4,
            style: CardStyle::default(),
        }
    }

    #[test]
    fn test_labels() {
        let card = WeatherCard::london();
        assert_eq!(card.temperature_label(), "14°");
        assert_eq!(card.range_label(), "H:15° L:8°");
        assert_eq!(paris().range_label(), "H:1° L:-4°");
    }

    #[test]
    fn test_tap_toggles() {
        let mut stack = CardStack::new(vec![WeatherCard::london()]);
        assert_eq!(stack.detail_opacity("london"), 0.0);

        assert!(stack.tap("london"));
        assert_eq!(stack.detail_opacity("london"), EXPANDED_DETAIL_OPACITY);

        assert!(!stack.tap("london"));
        assert!(stack.expanded().is_none());
    }

    #[test]
    fn test_only_one_expanded() {
        let mut stack = CardStack::new(vec![WeatherCard::london(), paris()]);
        stack.tap("london");
        stack.tap("paris");

        assert!(stack.is_expanded("paris"));
        assert!(!stack.is_expanded("london"));
    }

    #[test]
    fn test_unknown_tap_is_ignored() {
        let mut stack = CardStack::new(vec![WeatherCard::london()]);
        stack.tap("london");
        assert!(!stack.tap("tokyo"));
        assert!(stack.is_expanded("london"));
    }
}
