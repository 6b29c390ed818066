//! The starter deck shown on first launch and after a reset.

use crate::model::{Card, Deck, Section};

struct SectionSeed {
    id: &'static str,
    title: &'static str,
    subtitle: &'static str,
    symbol: &'static str,
    accent: &'static str,
    base_style: &'static str,
    card_type: &'static str,
    /// `(id, name, description, image detail)`
    cards: &'static [(&'static str, &'static str, &'static str, &'static str)],
}

const SEEDS: &[SectionSeed] = &[
    SectionSeed {
        id: "characters",
        title: "Characters",
        subtitle: "The people who can be part of the Holy mystery.",
        symbol: "CHAR",
        accent: "from-[color:var(--coral)] to-[color:var(--sun)]",
        base_style: "Voxel-based illustration, 3/4 corner interior view, centered full-body character, crisp block geometry, soft warm light, playful but clean palette, shallow depth, high detail.",
        card_type: "Character",
        cards: &[
            ("mark", "Mark", "Hosts the loudest gatherings and never misses a clue.",
                "Young man wearing a black hat and black outfit, confident stance in a startup web development workspace with monitors and sticky notes."),
            ("iosha", "Iosha", "Keeps secrets and always brings unexpected allies.",
                "Shorter woman with pink accents, purple t-shirt, black and white striped pants, standing on a theater stage with curtains and a spotlight."),
            ("evelyn", "Evelyn", "Strategic thinker with a calm, analytical presence.",
                "Calm woman in a navy blazer holding a notebook, set in a quiet library corner with a warm desk lamp."),
            ("bruna", "Bruna", "Life of the party with a playlist for every twist.",
                "Energetic woman in a bright jacket and headphones, inside a music studio with speakers and LED panels."),
            ("duda", "Duda", "Always on time and always watching the room.",
                "Focused woman in a minimalist outfit with a smartwatch, standing near a transit hub schedule board."),
            ("val", "Val", "Quick to laugh, quicker to spot contradictions.",
                "Playful woman wearing a colorful scarf, inside a cozy cafe with an espresso bar."),
            ("gustavo", "Gustavo", "The storyteller who knows every rumor in town.",
                "Man in a denim jacket leaning near a bar corner with a glowing neon sign behind him."),
            ("gabriela", "Gabriela", "Bright energy with a talent for improvisation.",
                "Woman in a green dress, standing in a dance rehearsal room with mirrors and floor markings."),
            ("antonia", "Antonia", "Observant, stylish, and always three steps ahead.",
                "Stylish woman in a white blouse, posed in an art gallery with framed photos and spotlights."),
        ],
    },
    SectionSeed {
        id: "events",
        title: "Events",
        subtitle: "Where the party energy shifts the story.",
        symbol: "EVNT",
        accent: "from-[color:var(--sea)] to-[color:var(--sun)]",
        base_style: "Voxel diorama, wide interior corner scene, cinematic lighting, layered props, no main character, crisp blocks, cinematic haze, high detail.",
        card_type: "Event",
        cards: &[
            ("birthday", "Birthday Party", "A celebration packed with candles, cake, and rumors.",
                "Colorful balloons, cake table with candles, confetti midair, warm string lights."),
            ("wedding", "Wedding", "Formal, emotional, and full of hidden motives.",
                "White floral arch, elegant aisle, soft golden light, empty chairs waiting."),
            ("nye", "New Year's Eve", "Countdowns, fireworks, and a midnight twist.",
                "City skyline backdrop, fireworks outside the window, champagne table, glowing countdown clock."),
            ("carnival", "Carnival", "Masks, music, and a maze of alibis.",
                "Street parade scene with masks, feathers, vibrant banners, lanterns overhead."),
            ("housewarming", "Housewarming", "A cozy gathering with new faces and new secrets.",
                "Moving boxes by a sofa, welcome sign, snacks on a coffee table, soft lamp glow."),
            ("beach-bonfire", "Beach Bonfire", "Warm flames, cold drinks, and whispered deals.",
                "Fire pit by the sand, surfboards leaning nearby, night sky, embers floating."),
        ],
    },
    SectionSeed {
        id: "objects",
        title: "Objects",
        subtitle: "Props, clues, and party artifacts.",
        symbol: "OBJ",
        accent: "from-[color:var(--navy)] to-[color:var(--coral)]",
        base_style: "Voxel still life, centered object on a table, dramatic spotlight, clean background, crisp block geometry, realistic textures, high detail.",
        card_type: "Object",
        cards: &[
            ("board-game", "Board Game", "The perfect distraction hiding one more secret.",
                "Game box open with cards and dice scattered on a wooden table."),
            ("vape", "Vape", "A trail of sweet smoke and sharper questions.",
                "Sleek device with a soft smoke trail and subtle neon accents."),
            ("switch", "Nintendo Switch", "Controllers passed around as tension builds.",
                "Console with red and blue joycons, screen glowing on the tabletop."),
            ("dance-shoes", "Dance Shoes", "Glitter on the floor, footsteps in the dark.",
                "Glitter shoes on a dance floor with a tight spotlight circle."),
            ("confetti", "Confetti Cannon", "A burst of color with something hidden inside.",
                "Party cannon mid-pop with confetti exploding outward."),
            ("polaroid", "Polaroid Camera", "Instant photos that reveal more than expected.",
                "Vintage instant camera with printed photos fanned beside it."),
        ],
    },
    SectionSeed {
        id: "places",
        title: "Places",
        subtitle: "The locations that frame the Holy story.",
        symbol: "PLC",
        accent: "from-[color:var(--sun)] to-[color:var(--sea)]",
        base_style: "Voxel environment, wide-angle corner view, no characters, layered depth, soft atmospheric light, crisp block geometry, high detail.",
        card_type: "Place",
        cards: &[
            ("mark-house", "Mark's House", "The main gathering spot, full of familiar clues.",
                "Modern living room with a laptop on the couch, city night visible through the window."),
            ("centro", "Centro de Florianopolis", "Busy streets, bright lights, and endless alibis.",
                "Urban street corner with buses, street lamps, and storefront glow."),
            ("lagoa", "Lagoa da Conceicao", "Waterside hangout with a mix of locals and visitors.",
                "Lakeside deck with palm trees and calm water reflections."),
            ("parque", "Parque Botanico", "Shaded paths that hide quiet conversations.",
                "Green park path with benches, layered tree canopy, dappled light."),
            ("udesc", "UDESC", "Campus energy with after-hours secrets.",
                "Campus courtyard with stairs, banners, and late-night glow."),
            ("beira-mar", "Beira-Mar", "A waterfront stretch for fast getaways.",
                "Waterfront promenade with a bike lane and distant skyline."),
            ("lagoon-house", "Lakeside House", "An isolated retreat with a view of the water.",
                "Quiet house by the water with a small dock and misty air."),
        ],
    },
];

/// Builds a fresh copy of the starter deck.
pub fn starter_deck() -> Deck {
    Deck::new(SEEDS.iter().map(SectionSeed::build).collect())
}

impl SectionSeed {
    fn build(&self) -> Section {
        Section {
            id: self.id.into(),
            title: self.title.into(),
            subtitle: self.subtitle.into(),
            symbol: self.symbol.into(),
            accent: self.accent.into(),
            base_style: self.base_style.into(),
            cards: self
                .cards
                .iter()
                .map(|&(id, name, description, detail)| Card {
                    id: id.into(),
                    name: name.into(),
                    description: description.into(),
                    image: String::new(),
                    image_detail: detail.into(),
                    card_type: self.card_type.into(),
                    is_muted: false,
                })
                .collect(),
        }
    }
}
