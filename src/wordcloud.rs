//! Term weighting over news titles and word-cloud image rendering.

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result, anyhow};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Capabilities;

/// Single-character Chinese function words that never make a useful term.
static CHINESE_STOPWORDS: &[char] = &[
    '的', '是', '在', '了', '和', '有', '也', '為', '與', '等', '將', '及', '或', '但', '而',
    '對', '於', '以', '中', '到', '從', '被', '把', '讓', '使', '由', '向', '就', '都', '要',
    '會', '能', '可', '不', '沒', '很', '更', '最', '非', '再', '又', '還', '已', '曾', '正',
    '該', '此', '其', '這', '那', '些', '個', '位', '名',
];

static ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
    "it", "its", "of", "on", "or", "that", "the", "to", "was", "were", "will", "with", "after",
    "over", "new", "news", "says", "said",
];

/// A term and its frequency, with `weight` relative to the most frequent term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedTerm {
    pub term: String,
    pub count: usize,
    pub weight: f64,
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

/// Splits a title into candidate terms.
///
/// CJK runs become overlapping character bigrams, other alphanumeric runs
/// become lower-cased words. Stopwords and single characters are dropped.
pub fn tokenize(title: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut cjk_run: Vec<char> = Vec::new();
    let mut word = String::new();

    let flush_cjk = |run: &mut Vec<char>, terms: &mut Vec<String>| {
        for pair in run.windows(2) {
            if pair.iter().any(|c| CHINESE_STOPWORDS.contains(c)) {
                continue;
            }
            terms.push(pair.iter().collect());
        }
        run.clear();
    };
    let flush_word = |word: &mut String, terms: &mut Vec<String>| {
        let lower = word.to_lowercase();
        if lower.chars().count() > 1 && !ENGLISH_STOPWORDS.contains(&lower.as_str()) {
            terms.push(lower);
        }
        word.clear();
    };

    for c in title.chars() {
        if is_cjk(c) {
            flush_word(&mut word, &mut terms);
            cjk_run.push(c);
        } else if c.is_alphanumeric() {
            flush_cjk(&mut cjk_run, &mut terms);
            word.push(c);
        } else {
            flush_cjk(&mut cjk_run, &mut terms);
            flush_word(&mut word, &mut terms);
        }
    }
    flush_cjk(&mut cjk_run, &mut terms);
    flush_word(&mut word, &mut terms);

    terms
}

/// The `max_words` most frequent terms across `titles`.
///
/// Sorted by descending count, ties alphabetically.
pub fn top_terms<S: AsRef<str>>(titles: &[S], max_words: usize) -> Vec<WeightedTerm> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for title in titles {
        for term in tokenize(title.as_ref()) {
            *counts.entry(term).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_words);

    let max = ranked.first().map(|(_, n)| *n).unwrap_or(1) as f64;
    ranked
        .into_iter()
        .map(|(term, count)| WeightedTerm {
            weight: count as f64 / max,
            term,
            count,
        })
        .collect()
}

static PALETTE: &[[u8; 3]] = &[
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x17, 0xbe, 0xcf],
];

/// FNV-1a, so a term keeps its colour across requests.
fn term_colour(term: &str) -> Rgb<u8> {
    let mut hash: u64 = 0xcbf29ce484222325;
    for b in term.bytes() {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    Rgb(PALETTE[(hash % PALETTE.len() as u64) as usize])
}

/// Fonts with CJK coverage, tried in order when none is configured.
static FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\msjh.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
];

/// Returns `explicit` if it exists, otherwise the first installed candidate font.
pub fn find_font(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        warn!(path = %path.display(), "Configured word cloud font not found");
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Loads a TrueType/OpenType font (the first face of a collection).
pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read font {}", path.display()))?;
    FontVec::try_from_vec(bytes).map_err(|_| anyhow!("{} is not a usable font", path.display()))
}

/// Renders weighted terms into a PNG.
///
/// With a font, terms are drawn as text sized by weight. Without one the
/// image falls back to a mosaic of coloured tiles, one per term.
pub struct WordCloudRenderer {
    enabled: bool,
    font: Option<FontVec>,
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
}

impl WordCloudRenderer {
    const MIN_TILE: u32 = 10;
    const MAX_TILE: u32 = 140;
    const MIN_FONT: f32 = 10.0;
    const MAX_FONT: f32 = 110.0;
    const GAP: u32 = 4;

    pub fn new(capabilities: &Capabilities) -> Self {
        Self {
            enabled: capabilities.word_cloud,
            font: None,
            width: 1200,
            height: 600,
            max_words: 100,
        }
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    /// Looks up a font (see [`find_font`]) and uses it if it loads.
    pub fn with_installed_font(self, explicit: Option<&Path>) -> Self {
        if !self.enabled {
            return self;
        }
        let Some(path) = find_font(explicit) else {
            warn!("No CJK font found, word clouds will be drawn as tiles");
            return self;
        };
        match load_font(&path) {
            Ok(font) => {
                info!(path = %path.display(), "Word cloud font loaded");
                self.with_font(font)
            }
            Err(e) => {
                warn!(error = %e, "Word cloud font unusable, drawing tiles");
                self
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.enabled
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn draw(&self, terms: &[WeightedTerm]) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, Rgb([255, 255, 255]));
        match &self.font {
            Some(font) => self.draw_words(&mut img, font, terms),
            None => self.draw_tiles(&mut img, terms),
        }
        img
    }

    /// Shelf layout of the terms themselves, largest first. Terms wider than
    /// the canvas are skipped; layout stops once a shelf would overflow.
    fn draw_words(&self, img: &mut RgbImage, font: &FontVec, terms: &[WeightedTerm]) {
        let (mut x, mut y, mut shelf) = (Self::GAP, Self::GAP, 0u32);
        for term in terms {
            let px = Self::MIN_FONT
                + (Self::MAX_FONT - Self::MIN_FONT) * term.weight.clamp(0.0, 1.0) as f32;
            let scale = PxScale::from(px);
            let (w, h) = text_size(scale, font, &term.term);
            if w + 2 * Self::GAP > self.width {
                continue;
            }

            if x + w + Self::GAP > self.width {
                x = Self::GAP;
                y += shelf + Self::GAP;
                shelf = 0;
            }
            if y + h + Self::GAP > self.height {
                break;
            }

            draw_text_mut(
                img,
                term_colour(&term.term),
                x as i32,
                y as i32,
                scale,
                font,
                &term.term,
            );

            x += w + Self::GAP;
            shelf = shelf.max(h);
        }
    }

    /// Tile mosaic: tile area proportional to weight.
    fn draw_tiles(&self, img: &mut RgbImage, terms: &[WeightedTerm]) {
        let (mut x, mut y, mut shelf) = (Self::GAP, Self::GAP, 0u32);
        for term in terms {
            let span = f64::from(Self::MAX_TILE - Self::MIN_TILE);
            let side = Self::MIN_TILE + (span * term.weight.clamp(0.0, 1.0).sqrt()).round() as u32;

            if x + side + Self::GAP > self.width {
                x = Self::GAP;
                y += shelf + Self::GAP;
                shelf = 0;
            }
            if y + side + Self::GAP > self.height {
                break;
            }

            let colour = term_colour(&term.term);
            for py in y..y + side {
                for px in x..x + side {
                    img.put_pixel(px, py, colour);
                }
            }

            x += side + Self::GAP;
            shelf = shelf.max(side);
        }
    }

    /// Draws `terms` and writes the PNG to `path`.
    #[tracing::instrument(skip_all, fields(path = %path.display(), terms = terms.len(), glyphs = self.has_font()))]
    pub fn render(&self, terms: &[WeightedTerm], path: &Path) -> Result<()> {
        anyhow::ensure!(self.enabled, "word cloud rendering is disabled");
        anyhow::ensure!(!terms.is_empty(), "no terms to render");

        self.draw(terms)
            .save(path)
            .with_context(|| format!("failed to write word cloud to {}", path.display()))?;
        debug!("Word cloud written");
        Ok(())
    }
}
