//! Application state: the deck being edited, its settings and the queue.
//!
//! Every mutation is mirrored to storage right away, the way the editor
//! persists on each change.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use cardstudio_deck::{
    AiSettings, CardField, Deck, DeckError, Selection, build_share_url, deck_from_token,
    encode_share_token, image_prompt, resolve_import, serialize_deck, share_param, starter_deck,
    strip_share_param,
};
use cardstudio_generation::{GenerationQueue, QueueError, QueueEvent, QueueHandle, QueueSnapshot};
use cardstudio_imagegen::{ImageGenerator, ImageRef};
use cardstudio_storage::{PersistenceGateway, SaveOutcome, StorageError};

/// Where the deck shown at startup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckOrigin {
    SharedLink,
    Storage,
    Starter,
}

pub struct Studio {
    deck: Mutex<Deck>,
    selection: Selection,
    settings: AiSettings,
    /// Page address the studio was opened at; share links rewrite it.
    page_url: Option<String>,
    origin: DeckOrigin,
    gateway: PersistenceGateway,
    queue: GenerationQueue,
    events: mpsc::Receiver<QueueEvent>,
}

impl Studio {
    /// Loads the startup state.
    ///
    /// A valid `share` parameter in `page_url` wins over the stored deck
    /// and is written to storage at once; otherwise the stored deck is used,
    /// falling back to the starter deck.
    pub fn hydrate(
        gateway: PersistenceGateway,
        generator: Arc<dyn ImageGenerator>,
        page_url: Option<&str>,
    ) -> Self {
        let shared = page_url.and_then(share_param).and_then(|token| {
            deck_from_token(&token)
                .map_err(|e| warn!(error = %e, "ignoring invalid share link"))
                .ok()
        });

        let (deck, origin) = if let Some(deck) = shared {
            gateway.save_deck(&deck);
            (deck, DeckOrigin::SharedLink)
        } else if let Some(deck) = gateway.load_deck() {
            (deck, DeckOrigin::Storage)
        } else {
            (starter_deck(), DeckOrigin::Starter)
        };
        let settings = gateway.load_ai_settings().unwrap_or_default();
        debug!(?origin, cards = deck.total_cards(), "studio hydrated");

        let mut queue = GenerationQueue::new(generator);
        let events = queue
            .take_events()
            .unwrap_or_else(|| mpsc::channel(1).1);

        Self {
            selection: deck.first_selection(),
            deck: Mutex::new(deck),
            settings,
            page_url: page_url.map(str::to_string),
            origin,
            gateway,
            queue,
            events,
        }
    }

    pub fn origin(&self) -> DeckOrigin {
        self.origin
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    pub fn queue_handle(&self) -> QueueHandle {
        self.queue.handle()
    }

    /// Copy of the current deck.
    pub async fn deck(&self) -> Deck {
        self.deck.lock().await.clone()
    }

    /// Replaces the deck with an imported payload.
    ///
    /// On failure the current deck is left untouched.
    pub async fn import(&mut self, payload: &str) -> Result<SaveOutcome, DeckError> {
        let deck = resolve_import(payload)?;
        info!(sections = deck.sections.len(), cards = deck.total_cards(), "deck imported");
        self.selection = deck.first_selection();
        *self.deck.lock().await = deck;
        Ok(self.persist_deck().await)
    }

    /// Deck JSON for export.
    pub async fn export(&self) -> String {
        serialize_deck(&*self.deck.lock().await)
    }

    /// Builds a share link on `base_url` and makes it the current page.
    pub async fn share_url(&mut self, base_url: &str) -> String {
        let token = encode_share_token(&self.export().await);
        let url = build_share_url(base_url, &token);
        self.page_url = Some(url.clone());
        url
    }

    /// Image prompt of a card, as sent to the generator.
    pub async fn prompt(&self, section_id: &str, card_id: &str) -> Option<String> {
        let deck = self.deck.lock().await;
        let section = deck.section(section_id)?;
        Some(image_prompt(section, section.card(card_id)?))
    }

    /// Sets one text field of a card.
    pub async fn edit_card(
        &self,
        section_id: &str,
        card_id: &str,
        field: CardField,
        value: &str,
    ) -> bool {
        let changed = self
            .deck
            .lock()
            .await
            .update_card(section_id, card_id, field, value);
        if changed {
            self.persist_deck().await;
        }
        changed
    }

    /// Replaces a section's base style prompt.
    pub async fn set_section_style(&self, section_id: &str, style: &str) -> bool {
        let changed = self.deck.lock().await.set_section_style(section_id, style);
        if changed {
            self.persist_deck().await;
        }
        changed
    }

    /// Flips a card's muted flag, returning the new value.
    pub async fn toggle_muted(&self, section_id: &str, card_id: &str) -> Option<bool> {
        let muted = self.deck.lock().await.toggle_card_muted(section_id, card_id)?;
        self.persist_deck().await;
        Some(muted)
    }

    /// Changes the image settings and persists them.
    pub fn update_settings(&mut self, update: impl FnOnce(&mut AiSettings)) -> bool {
        update(&mut self.settings);
        self.gateway.save_ai_settings(&self.settings)
    }

    /// Runs the generation queue over one section or the whole deck.
    ///
    /// The deck is saved after every generated image and once more when the
    /// run ends. `on_event` sees each queue event as it happens.
    pub async fn generate(
        &mut self,
        section_id: Option<&str>,
        mut on_event: impl FnMut(&QueueEvent),
    ) -> Result<QueueSnapshot, QueueError> {
        let run = self.queue.run(&self.deck, section_id, &self.settings);
        tokio::pin!(run);
        let result = loop {
            tokio::select! {
                result = &mut run => break result,
                Some(event) = self.events.recv() => {
                    handle_event(&self.deck, &self.gateway, &event).await;
                    on_event(&event);
                }
            }
        };
        while let Ok(event) = self.events.try_recv() {
            handle_event(&self.deck, &self.gateway, &event).await;
            on_event(&event);
        }
        if result.is_ok() {
            self.persist_deck().await;
        }
        result
    }

    /// Generates (or regenerates) the artwork for one card.
    pub async fn generate_card(
        &self,
        section_id: &str,
        card_id: &str,
    ) -> Result<ImageRef, QueueError> {
        let image = self
            .queue
            .generate_card(&self.deck, section_id, card_id, &self.settings)
            .await?;
        self.persist_deck().await;
        Ok(image)
    }

    /// Restores the starter deck and default settings, stops generation,
    /// removes both stored snapshots and drops `share` from the page URL.
    pub async fn reset(&mut self) -> Result<(), StorageError> {
        self.queue.handle().reset();
        let fresh = starter_deck();
        self.selection = fresh.first_selection();
        *self.deck.lock().await = fresh;
        self.settings = AiSettings::default();
        self.origin = DeckOrigin::Starter;
        if let Some(url) = &self.page_url {
            self.page_url = Some(strip_share_param(url));
        }
        self.gateway.clear()?;
        info!("studio reset");
        Ok(())
    }

    async fn persist_deck(&self) -> SaveOutcome {
        let outcome = self.gateway.save_deck(&*self.deck.lock().await);
        if outcome != SaveOutcome::Full {
            debug!(?outcome, "deck saved in degraded form");
        }
        outcome
    }
}

async fn handle_event(deck: &Mutex<Deck>, gateway: &PersistenceGateway, event: &QueueEvent) {
    if let QueueEvent::CardCompleted { .. } = event {
        gateway.save_deck(&*deck.lock().await);
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use cardstudio_deck::{ImageModel, Section, parse_deck};
    use cardstudio_generation::QueueStatus;
    use cardstudio_imagegen::GenerationError;
    use cardstudio_storage::{AI_SETTINGS_KEY, DECK_KEY, MemoryStore};

    use super::*;

    struct EchoGenerator;

    impl ImageGenerator for EchoGenerator {
        fn generate<'a>(
            &'a self,
            prompt: &'a str,
            _settings: &'a AiSettings,
        ) -> Pin<Box<dyn Future<Output = Result<ImageRef, GenerationError>> + Send + 'a>>
        {
            Box::pin(async move {
                Ok(ImageRef {
                    mime_type: "image/webp".into(),
                    data: format!("{}", prompt.len()),
                })
            })
        }
    }

    fn studio(gateway: PersistenceGateway, page_url: Option<&str>) -> Studio {
        Studio::hydrate(gateway, Arc::new(EchoGenerator), page_url)
    }

    fn small_deck() -> Deck {
        Deck::new(vec![Section {
            id: "places".into(),
            title: "Places".into(),
            base_style: "Wide view.".into(),
            cards: vec![cardstudio_deck::Card {
                id: "pier".into(),
                name: "Pier".into(),
                image_detail: "A pier".into(),
                card_type: "Place".into(),
                ..Default::default()
            }],
            ..Default::default()
        }])
    }

    fn share_link(deck: &Deck) -> String {
        build_share_url(
            "https://cards.example/",
            &encode_share_token(&serialize_deck(deck)),
        )
    }

    fn stored_deck(studio: &Studio) -> Deck {
        parse_deck(&studio.gateway().store().get(DECK_KEY).unwrap().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn hydrates_starter_deck_when_storage_is_empty() {
        let studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        assert_eq!(studio.origin(), DeckOrigin::Starter);
        assert_eq!(studio.deck().await, starter_deck());
        assert_eq!(studio.selection().section_id, "characters");
        assert_eq!(studio.selection().card_id, "mark");
        assert_eq!(studio.settings(), &AiSettings::default());
    }

    #[tokio::test]
    async fn hydrates_from_storage() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        gateway.save_deck(&small_deck());
        gateway.save_ai_settings(&AiSettings {
            api_key: "k".into(),
            model: ImageModel::Pro3ImagePreview,
            ..Default::default()
        });

        let studio = studio(gateway, Some("https://cards.example/"));
        assert_eq!(studio.origin(), DeckOrigin::Storage);
        assert_eq!(studio.deck().await, small_deck());
        assert_eq!(studio.settings().model, ImageModel::Pro3ImagePreview);
    }

    #[tokio::test]
    async fn share_link_wins_and_is_stored() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        gateway.save_deck(&starter_deck());

        let studio = studio(gateway, Some(&share_link(&small_deck())));
        assert_eq!(studio.origin(), DeckOrigin::SharedLink);
        assert_eq!(studio.deck().await, small_deck());
        assert_eq!(stored_deck(&studio), small_deck());
    }

    #[tokio::test]
    async fn bad_share_link_falls_back_to_storage() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        gateway.save_deck(&small_deck());
        let studio = studio(gateway, Some("https://cards.example/?share=%%%"));
        assert_eq!(studio.origin(), DeckOrigin::Storage);
    }

    #[tokio::test]
    async fn import_replaces_and_persists() {
        let mut studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        let outcome = studio.import(&serialize_deck(&small_deck())).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Full);
        assert_eq!(studio.deck().await, small_deck());
        assert_eq!(studio.selection().card_id, "pier");
        assert_eq!(stored_deck(&studio), small_deck());

        let err = studio.import(r#"{"not":"a deck"}"#).await.unwrap_err();
        assert_eq!(err.to_string(), "Import failed. Use JSON or a share string.");
        assert_eq!(studio.deck().await, small_deck(), "deck unchanged");
    }

    #[tokio::test]
    async fn share_url_roundtrips_through_hydrate() {
        let mut studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        studio.import(&serialize_deck(&small_deck())).await.unwrap();

        let url = studio.share_url("https://cards.example/?lang=pt#top").await;
        assert!(url.starts_with("https://cards.example/?lang=pt&share="));
        assert_eq!(studio.page_url(), Some(url.as_str()));

        let other = Studio::hydrate(
            PersistenceGateway::new(MemoryStore::new()),
            Arc::new(EchoGenerator),
            Some(&url),
        );
        assert_eq!(other.deck().await, small_deck());
    }

    #[tokio::test]
    async fn edits_are_persisted() {
        let studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        assert!(studio.edit_card("events", "nye", CardField::Name, "Reveillon").await);
        assert!(studio.set_section_style("places", "Isometric.").await);
        assert_eq!(studio.toggle_muted("objects", "vape").await, Some(true));
        assert!(!studio.edit_card("events", "ghost", CardField::Name, "x").await);
        assert_eq!(studio.toggle_muted("objects", "ghost").await, None);

        let stored = stored_deck(&studio);
        assert_eq!(stored.card("events", "nye").unwrap().name, "Reveillon");
        assert_eq!(stored.section("places").unwrap().base_style, "Isometric.");
        assert!(stored.card("objects", "vape").unwrap().is_muted);
        assert_eq!(
            studio.prompt("places", "udesc").await.as_deref(),
            Some("Isometric. Campus courtyard with stairs, banners, and late-night glow.")
        );
    }

    #[tokio::test]
    async fn settings_are_persisted_on_change() {
        let mut studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        assert!(studio.update_settings(|s| s.api_key = "secret".into()));
        let raw = studio.gateway().store().get(AI_SETTINGS_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""apiKey":"secret""#));
    }

    #[tokio::test]
    async fn generate_writes_images_and_saves() {
        let mut studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        studio.update_settings(|s| s.api_key = "k".into());

        let mut completed = 0;
        let snapshot = studio
            .generate(Some("events"), |event| {
                if matches!(event, QueueEvent::CardCompleted { .. }) {
                    completed += 1;
                }
            })
            .await
            .unwrap();
        assert_eq!(snapshot.status, QueueStatus::Completed);
        assert_eq!(snapshot.scope, "Events");
        assert_eq!(snapshot.progress.total, 6);
        assert_eq!(completed, 6);

        let stored = stored_deck(&studio);
        let events = stored.section("events").unwrap();
        assert!(events.cards.iter().all(|c| c.image.starts_with("data:image/webp;base64,")));
        assert!(stored.section("places").unwrap().cards.iter().all(|c| c.image.is_empty()));
    }

    #[tokio::test]
    async fn generate_reports_and_stores_every_card_of_a_large_deck() {
        let mut studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        studio.update_settings(|s| s.api_key = "k".into());
        let crowd = Deck::new(vec![Section {
            id: "crowd".into(),
            title: "Crowd".into(),
            cards: (0..400)
                .map(|i| cardstudio_deck::Card {
                    id: format!("face-{i}"),
                    name: format!("Face {i}"),
                    image_detail: "A face".into(),
                    card_type: "Character".into(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }]);
        studio.import(&serialize_deck(&crowd)).await.unwrap();

        let mut progress = Vec::new();
        let mut completed = 0;
        let snapshot = studio
            .generate(None, |event| match event {
                QueueEvent::Progress(p) => progress.push(p.done),
                QueueEvent::CardCompleted { .. } => completed += 1,
                _ => {}
            })
            .await
            .unwrap();
        assert_eq!(snapshot.progress.done, 400);
        assert_eq!(progress, (1..=400).collect::<Vec<_>>());
        assert_eq!(completed, 400);

        let stored = stored_deck(&studio);
        assert!(stored.sections[0].cards.iter().all(|c| !c.image.is_empty()));
    }

    #[tokio::test]
    async fn generate_without_key_is_rejected() {
        let mut studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        let err = studio.generate(None, |_| {}).await.unwrap_err();
        assert!(matches!(err, QueueError::MissingApiKey));
    }

    #[tokio::test]
    async fn generate_card_overwrites_and_saves() {
        let mut studio = studio(PersistenceGateway::new(MemoryStore::new()), None);
        studio.update_settings(|s| s.api_key = "k".into());
        studio
            .edit_card("objects", "vape", CardField::Image, "https://example.com/v.png")
            .await;

        let image = studio.generate_card("objects", "vape").await.unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(
            stored_deck(&studio).card("objects", "vape").unwrap().image,
            image.to_data_url()
        );
    }

    #[tokio::test]
    async fn reset_restores_defaults_and_clears_storage() {
        let mut studio = studio(
            PersistenceGateway::new(MemoryStore::new()),
            Some(&share_link(&small_deck())),
        );
        studio.update_settings(|s| s.api_key = "k".into());
        studio.gateway().store().set("unrelated", "keep").unwrap();

        studio.reset().await.unwrap();
        assert_eq!(studio.deck().await, starter_deck());
        assert_eq!(studio.settings(), &AiSettings::default());
        assert_eq!(studio.page_url(), Some("https://cards.example/"));
        assert_eq!(studio.queue_handle().status(), QueueStatus::Idle);
        assert!(studio.gateway().store().get(DECK_KEY).unwrap().is_none());
        assert!(studio.gateway().store().get(AI_SETTINGS_KEY).unwrap().is_none());
        assert_eq!(
            studio.gateway().store().get("unrelated").unwrap().as_deref(),
            Some("keep")
        );
    }
}
