//! Deck data types and editing helpers.

use serde::{Deserialize, Serialize};

/// Prefix that marks an image reference carrying its bytes inline.
const INLINE_IMAGE_PREFIX: &str = "data:";

/// A single editable card.
///
/// `image` is empty, an inline `data:` URL, or an external URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub image_detail: String,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default)]
    pub is_muted: bool,
}

/// A named category of cards sharing a base art-style prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub symbol: String,
    pub accent: String,
    pub base_style: String,
    pub cards: Vec<Card>,
}

/// The whole deck: an ordered list of sections.
///
/// Serializes as a bare JSON array, which is both the storage snapshot and
/// the export/share format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    pub sections: Vec<Section>,
}

/// Editable text fields of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Name,
    Description,
    Image,
    ImageDetail,
    Type,
}

/// The section/card pair currently focused by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub section_id: String,
    pub card_id: String,
}

/// Returns `true` if the image reference embeds its bytes (`data:` URL).
pub fn is_inline_image(image: &str) -> bool {
    image.starts_with(INLINE_IMAGE_PREFIX)
}

/// Builds the text-to-image prompt for a card.
///
/// The section's base style and the card's detail are trimmed and joined
/// with a space; when either is empty the other is used alone.
pub fn image_prompt(section: &Section, card: &Card) -> String {
    let base = section.base_style.trim();
    let detail = card.image_detail.trim();
    if base.is_empty() {
        return detail.to_string();
    }
    if detail.is_empty() {
        return base.to_string();
    }
    format!("{base} {detail}")
}

impl Card {
    /// Returns `true` if the card has an art prompt but no image yet.
    pub fn needs_artwork(&self) -> bool {
        !self.image_detail.trim().is_empty() && self.image.trim().is_empty()
    }

    fn field_mut(&mut self, field: CardField) -> &mut String {
        match field {
            CardField::Name => &mut self.name,
            CardField::Description => &mut self.description,
            CardField::Image => &mut self.image,
            CardField::ImageDetail => &mut self.image_detail,
            CardField::Type => &mut self.card_type,
        }
    }
}

impl Section {
    /// Looks up a card by ID.
    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }
}

impl Deck {
    /// Creates a deck from its sections.
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Whether the deck has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Looks up a section by ID.
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Looks up a card within a section.
    pub fn card(&self, section_id: &str, card_id: &str) -> Option<&Card> {
        self.section(section_id)?.card(card_id)
    }

    fn card_mut(&mut self, section_id: &str, card_id: &str) -> Option<&mut Card> {
        self.sections
            .iter_mut()
            .find(|s| s.id == section_id)?
            .card_mut(card_id)
    }

    /// Total number of cards across all sections.
    pub fn total_cards(&self) -> usize {
        self.sections.iter().map(|s| s.cards.len()).sum()
    }

    /// First section and its first card; empty IDs when absent.
    pub fn first_selection(&self) -> Selection {
        let Some(section) = self.sections.first() else {
            return Selection::default();
        };
        Selection {
            section_id: section.id.clone(),
            card_id: section.cards.first().map(|c| c.id.clone()).unwrap_or_default(),
        }
    }

    /// Sets one text field of a card. Returns `false` if the card is unknown.
    pub fn update_card(
        &mut self,
        section_id: &str,
        card_id: &str,
        field: CardField,
        value: impl Into<String>,
    ) -> bool {
        match self.card_mut(section_id, card_id) {
            Some(card) => {
                *card.field_mut(field) = value.into();
                true
            }
            None => false,
        }
    }

    /// Replaces a card's image reference.
    pub fn set_card_image(&mut self, section_id: &str, card_id: &str, image: impl Into<String>) -> bool {
        self.update_card(section_id, card_id, CardField::Image, image)
    }

    /// Replaces a section's base style prompt.
    pub fn set_section_style(&mut self, section_id: &str, style: impl Into<String>) -> bool {
        match self.sections.iter_mut().find(|s| s.id == section_id) {
            Some(section) => {
                section.base_style = style.into();
                true
            }
            None => false,
        }
    }

    /// Flips a card's muted flag and returns the new value.
    pub fn toggle_card_muted(&mut self, section_id: &str, card_id: &str) -> Option<bool> {
        let card = self.card_mut(section_id, card_id)?;
        card.is_muted = !card.is_muted;
        Some(card.is_muted)
    }

    /// Returns a copy with every inline (`data:`) image cleared.
    ///
    /// External image URLs are kept.
    pub fn strip_inline_images(&self) -> Deck {
        let mut stripped = self.clone();
        for card in stripped.sections.iter_mut().flat_map(|s| s.cards.iter_mut()) {
            if is_inline_image(&card.image) {
                card.image.clear();
            }
        }
        stripped
    }
}
