// Fortune draw: content pool construction and the face-folded random draw.
use bevy::prelude::*;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use serde::Deserialize;

use crate::plugins::die::DiceSettled;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ArticleRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    pub url: String,
    #[serde(default)]
    pub external: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LinkRecord {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

/// Read-only content collaborators.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FortuneContent {
    pub articles: Vec<ArticleRecord>,
    pub products: Vec<ProductRecord>,
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    Article {
        id: String,
        title: String,
        description: String,
        published_at: String,
        url: String,
        external: bool,
    },
    Product {
        id: String,
        title: String,
        description: String,
        tags: Vec<String>,
        status: Option<String>,
        links: Vec<LinkRecord>,
    },
    About {
        id: String,
    },
    Theme {
        id: String,
        theme_name: String,
    },
}

impl Card {
    pub fn id(&self) -> &str {
        match self {
            Card::Article { id, .. } | Card::Product { id, .. } | Card::About { id } | Card::Theme { id, .. } => id,
        }
    }

    /// One-line label for display.
    pub fn label(&self) -> String {
        match self {
            Card::Article { title, .. } => format!("Article: {title}"),
            Card::Product { title, .. } => format!("Product: {title}"),
            Card::About { .. } => "About me".to_string(),
            Card::Theme { theme_name, .. } => format!("Theme: {theme_name}"),
        }
    }
}

pub const ABOUT_ID: &str = "about";

/// Ordered, equally weighted draw pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FortunePool(Vec<Card>);

impl FortunePool {
    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.0.get(index)
    }
}

/// Articles, products, the single About entry, then one entry per theme.
pub fn build_pool(content: &FortuneContent) -> FortunePool {
    let mut cards = Vec::with_capacity(content.articles.len() + content.products.len() + 1 + content.themes.len());
    cards.extend(content.articles.iter().enumerate().map(|(i, a)| Card::Article {
        id: format!("article-{i}"),
        title: a.title.clone(),
        description: a.description.clone(),
        published_at: a.date.clone(),
        url: a.url.clone(),
        external: a.external.unwrap_or(false),
    }));
    cards.extend(content.products.iter().enumerate().map(|(i, p)| Card::Product {
        id: format!("product-{i}"),
        title: p.title.clone(),
        description: p.description.clone(),
        tags: p.tags.clone(),
        status: p.status.clone(),
        links: p.links.clone(),
    }));
    cards.push(Card::About { id: ABOUT_ID.to_string() });
    cards.extend(content.themes.iter().map(|t| Card::Theme { id: format!("theme-{t}"), theme_name: t.clone() }));
    FortunePool(cards)
}

/// Pool index for a face value and one 32-bit random draw. `None` for an empty pool.
pub fn draw_index(face: u32, random: u32, pool_len: usize) -> Option<usize> {
    if pool_len == 0 {
        return None;
    }
    let n = pool_len as u64;
    Some(((face as u64 + random as u64 % n) % n) as usize)
}

pub fn draw_with_entropy(face: u32, random: u32, pool: &FortunePool) -> Option<&Card> {
    draw_index(face, random, pool.len()).and_then(|i| pool.get(i))
}

pub fn draw(face: u32, pool: &FortunePool) -> Option<&Card> {
    if pool.is_empty() {
        return None;
    }
    draw_with_entropy(face, secure_random_u32(), pool)
}

/// OS entropy, falling back to the thread-local PRNG.
pub fn secure_random_u32() -> u32 {
    let mut buf = [0u8; 4];
    match OsRng.try_fill_bytes(&mut buf) {
        Ok(()) => u32::from_le_bytes(buf),
        Err(e) => {
            warn!("FORTUNE os entropy unavailable error={e}; using thread rng");
            rand::thread_rng().gen()
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct LastFortune {
    pub roll_id: u64,
    pub face: u8,
    pub card: Option<Card>,
}

#[derive(Event, Debug, Clone)]
pub struct FortuneDrawn {
    pub roll_id: u64,
    pub face: u8,
    pub card: Option<Card>,
}

/// A theme card was drawn; the presentation layer switches to `theme_name`.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ThemeChangeRequested {
    pub roll_id: u64,
    pub theme_name: String,
}

pub struct FortunePlugin;
impl Plugin for FortunePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FortuneContent>()
            .init_resource::<LastFortune>()
            .add_event::<DiceSettled>()
            .add_event::<FortuneDrawn>()
            .add_event::<ThemeChangeRequested>()
            .add_systems(Update, draw_on_settle);
    }
}

fn draw_on_settle(
    content: Res<FortuneContent>,
    mut last: ResMut<LastFortune>,
    mut ev_settled: EventReader<DiceSettled>,
    mut ev_drawn: EventWriter<FortuneDrawn>,
    mut ev_theme: EventWriter<ThemeChangeRequested>,
) {
    for ev in ev_settled.read() {
        let pool = build_pool(&content);
        let card = draw(ev.face as u32, &pool).cloned();
        match &card {
            Some(c) => info!("FORTUNE drawn roll={} face={} card={} pool={}", ev.roll_id, ev.face, c.id(), pool.len()),
            None => info!("FORTUNE empty roll={} face={}", ev.roll_id, ev.face),
        }
        if let Some(Card::Theme { theme_name, .. }) = &card {
            ev_theme.send(ThemeChangeRequested { roll_id: ev.roll_id, theme_name: theme_name.clone() });
        }
        *last = LastFortune { roll_id: ev.roll_id, face: ev.face, card: card.clone() };
        ev_drawn.send(FortuneDrawn { roll_id: ev.roll_id, face: ev.face, card });
    }
}
