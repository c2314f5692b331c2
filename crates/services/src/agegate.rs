//! # Age Gate Verifier
//!
//! Extracts a birth date from an identity document via the OCR collaborator
//! and decides signup eligibility. Every failure path (OCR error, no text,
//! no recognizable date) resolves to `Undetermined`, which callers must
//! treat as a hard stop (fail closed, never implicit eligibility).

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use domains::{AgeGateResult, TextRecognizer};

/// Minimum age for account creation.
pub const MINIMUM_AGE: u32 = 16;

/// Gregorian numeric dialect: YYYY-MM-DD or DD-MM-YYYY, `-` or `/`.
static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4}[-/]\d{2}[-/]\d{2}|\d{2}[-/]\d{2}[-/]\d{4})\b")
        .expect("numeric date pattern")
});

/// Era dialect: <Era><Year>年<Month>月<Day>日生, where the year may be the
/// first-year token 元.
static ERA_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(明治|大正|昭和|平成|令和)(元|\d{1,2})年(\d{1,2})月(\d{1,2})日生")
        .expect("era date pattern")
});

/// Era name → Gregorian year offset; gregorian = offset + year-within-era.
const ERA_OFFSETS: [(&str, i32); 5] = [
    ("明治", 1867),
    ("大正", 1911),
    ("昭和", 1925),
    ("平成", 1988),
    ("令和", 2018),
];

pub struct AgeGateVerifier {
    ocr: Arc<dyn TextRecognizer>,
}

impl AgeGateVerifier {
    pub fn new(ocr: Arc<dyn TextRecognizer>) -> Self {
        Self { ocr }
    }

    /// Verifies eligibility as of the current date. One OCR call per attempt.
    pub async fn verify(&self, image_url: &str) -> AgeGateResult {
        self.verify_as_of(image_url, Utc::now().date_naive()).await
    }

    /// Verification against an explicit "today", for deterministic tests.
    pub async fn verify_as_of(&self, image_url: &str, today: NaiveDate) -> AgeGateResult {
        let text = match self.ocr.detect_text(image_url).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("no text detected in document");
                return AgeGateResult::Undetermined;
            }
            Err(err) => {
                warn!(error = %err, "text recognition failed");
                return AgeGateResult::Undetermined;
            }
        };

        let Some(birth_date) = extract_birth_date(&text) else {
            debug!("no recognizable date in document text");
            return AgeGateResult::Undetermined;
        };
        debug!(%birth_date, "resolved birth date from document text");

        decide(birth_date, today)
    }
}

/// First-match extraction over the whole text blob.
///
/// The era dialect is tried first; its 日生 suffix anchors it to a birth
/// date. The numeric dialect is unanchored, so a document carrying several
/// dates (issue, expiry) can match the wrong one; known limitation,
/// preserved for parity with the deployed matching behavior.
pub fn extract_birth_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = ERA_DATE.captures(text) {
        let offset = ERA_OFFSETS
            .iter()
            .find(|(name, _)| *name == &caps[1])
            .map(|(_, offset)| *offset)?;
        let era_year: i32 = if &caps[2] == "元" { 1 } else { caps[2].parse().ok()? };
        let month: u32 = caps[3].parse().ok()?;
        let day: u32 = caps[4].parse().ok()?;
        return NaiveDate::from_ymd_opt(offset + era_year, month, day);
    }

    let caps = NUMERIC_DATE.captures(text)?;
    parse_numeric(&caps[1])
}

fn parse_numeric(raw: &str) -> Option<NaiveDate> {
    let normalized = raw.replace('/', "-");
    let format = if normalized.find('-') == Some(4) { "%Y-%m-%d" } else { "%d-%m-%Y" };
    NaiveDate::parse_from_str(&normalized, format).ok()
}

fn decide(birth_date: NaiveDate, today: NaiveDate) -> AgeGateResult {
    match today.years_since(birth_date) {
        Some(age) if age >= MINIMUM_AGE => AgeGateResult::Eligible { birth_date },
        Some(age) => AgeGateResult::Ineligible {
            reason: format!("age {age} is below the minimum of {MINIMUM_AGE}"),
        },
        // A birth date in the future: the document cannot be trusted.
        None => AgeGateResult::Undetermined,
    }
}
