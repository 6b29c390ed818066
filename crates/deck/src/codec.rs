//! Validated JSON codec for decks.
//!
//! The shape check is carried by the serde derives on [`Deck`]: the top
//! level must be an array, every section and card field must be present
//! with the right JSON type, and `isMuted` (optional) must be a boolean.

use crate::error::DeckError;
use crate::model::Deck;

/// Serializes a deck as compact JSON.
pub fn serialize_deck(deck: &Deck) -> String {
    // A tree of strings and booleans always serializes.
    serde_json::to_string(deck).unwrap_or_else(|_| String::from("[]"))
}

/// Parses and shape-checks a deck.
///
/// Absent `isMuted` fields come back as `false`. Never panics.
pub fn parse_deck(text: &str) -> Result<Deck, DeckError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, Section};
    use crate::starter::starter_deck;

    const MINIMAL: &str = r#"[{"id":"s","title":"T","subtitle":"","symbol":"S","accent":"","baseStyle":"",
        "cards":[{"id":"c","name":"N","description":"D","image":"","imageDetail":"x","type":"Object"}]}]"#;

    #[test]
    fn starter_deck_roundtrip() {
        let deck = starter_deck();
        let parsed = parse_deck(&serialize_deck(&deck)).unwrap();
        assert_eq!(parsed, deck);
    }

    #[test]
    fn roundtrip_with_unicode_and_muted() {
        let deck = Deck::new(vec![Section {
            id: "é".into(),
            title: "Lagoa da Conceição 🌊".into(),
            cards: vec![Card {
                id: "c\"1".into(),
                name: "Ünïcødé\n".into(),
                is_muted: true,
                image: "data:image/png;base64,AAAA".into(),
                ..Default::default()
            }],
            ..Default::default()
        }]);
        assert_eq!(parse_deck(&serialize_deck(&deck)).unwrap(), deck);
    }

    #[test]
    fn missing_is_muted_defaults_false() {
        let deck = parse_deck(MINIMAL).unwrap();
        assert!(!deck.sections[0].cards[0].is_muted);
        // Default-fill is idempotent.
        assert_eq!(parse_deck(&serialize_deck(&deck)).unwrap(), deck);
    }

    #[test]
    fn serialize_uses_wire_names() {
        let json = serialize_deck(&parse_deck(MINIMAL).unwrap());
        assert!(json.starts_with('['));
        assert!(json.contains("\"baseStyle\""));
        assert!(json.contains("\"imageDetail\""));
        assert!(json.contains("\"type\":\"Object\""));
        assert!(json.contains("\"isMuted\":false"));
    }

    #[test]
    fn empty_array_is_empty_deck() {
        let deck = parse_deck("[]").unwrap();
        assert!(deck.is_empty());
    }

    #[test]
    fn section_with_no_cards_is_valid() {
        let json = r#"[{"id":"s","title":"","subtitle":"","symbol":"","accent":"","baseStyle":"","cards":[]}]"#;
        assert!(parse_deck(json).unwrap().sections[0].cards.is_empty());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let json = MINIMAL.replace("\"symbol\":\"S\"", "\"symbol\":\"S\",\"extra\":42");
        assert!(parse_deck(&json).is_ok());
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_deck("not json").is_err());
        assert!(parse_deck("").is_err());
    }

    #[test]
    fn rejects_top_level_object() {
        assert!(parse_deck(r#"{"not":"a deck"}"#).is_err());
    }

    #[test]
    fn rejects_missing_string_field() {
        let json = MINIMAL.replace("\"name\":\"N\",", "");
        assert!(parse_deck(&json).is_err());
        let json = MINIMAL.replace("\"baseStyle\":\"\",", "");
        assert!(parse_deck(&json).is_err());
    }

    #[test]
    fn rejects_wrong_field_types() {
        let json = MINIMAL.replace("\"name\":\"N\"", "\"name\":7");
        assert!(parse_deck(&json).is_err());
        let json = MINIMAL.replace("\"title\":\"T\"", "\"title\":null");
        assert!(parse_deck(&json).is_err());
    }

    #[test]
    fn rejects_non_boolean_is_muted() {
        let json = MINIMAL.replace("\"type\":\"Object\"", "\"type\":\"Object\",\"isMuted\":\"yes\"");
        assert!(parse_deck(&json).is_err());
        let json = MINIMAL.replace("\"type\":\"Object\"", "\"type\":\"Object\",\"isMuted\":null");
        assert!(parse_deck(&json).is_err());
    }

    #[test]
    fn rejects_non_array_cards() {
        let json = MINIMAL.replace("\"cards\":[", "\"cards\":{\"x\":").replace("}]}]", "}}}]");
        assert!(parse_deck(&json).is_err());
    }

    #[test]
    fn rejects_non_object_elements() {
        assert!(parse_deck("[1, 2]").is_err());
        assert!(parse_deck("[null]").is_err());
    }

    mod laws {
        use proptest::prelude::*;

        use super::*;

        fn card() -> impl Strategy<Value = Card> {
            (
                any::<String>(),
                any::<String>(),
                any::<String>(),
                any::<String>(),
                any::<String>(),
                any::<String>(),
                any::<bool>(),
            )
                .prop_map(|(id, name, description, image, image_detail, card_type, is_muted)| Card {
                    id,
                    name,
                    description,
                    image,
                    image_detail,
                    card_type,
                    is_muted,
                })
        }

        fn section() -> impl Strategy<Value = Section> {
            (
                any::<String>(),
                any::<String>(),
                any::<String>(),
                any::<String>(),
                any::<String>(),
                any::<String>(),
                prop::collection::vec(card(), 0..6),
            )
                .prop_map(|(id, title, subtitle, symbol, accent, base_style, cards)| Section {
                    id,
                    title,
                    subtitle,
                    symbol,
                    accent,
                    base_style,
                    cards,
                })
        }

        fn deck() -> impl Strategy<Value = Deck> {
            prop::collection::vec(section(), 0..5).prop_map(Deck::new)
        }

        proptest! {
            #[test]
            fn any_deck_roundtrips(deck in deck()) {
                prop_assert_eq!(parse_deck(&serialize_deck(&deck)).unwrap(), deck);
            }

            #[test]
            fn any_deck_roundtrips_through_share_token(deck in deck()) {
                let token = crate::share::encode_share_token(&serialize_deck(&deck));
                prop_assert_eq!(crate::import::deck_from_token(&token).unwrap(), deck);
            }
        }
    }
}
