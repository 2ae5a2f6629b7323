//! Plain-text rendering of session state for the terminal.

use std::fmt::Write;

use yazim_core::settings::Settings;
use yazim_core::types::{ErrorType, GrammarError, GrammarFeedback, TypingStats};
use yazim_session::{segments, Segment};
use yazim_workbench::WorkbenchSnapshot;

pub fn error_type_label(error_type: ErrorType) -> &'static str {
    match error_type {
        ErrorType::Spelling => "yazım",
        ErrorType::Punctuation => "noktalama",
    }
}

/// The submitted text with each usable error span wrapped as `[text](n)`,
/// where `n` is the error's position in the feedback list.
pub fn highlighted(text: &str, errors: &[GrammarError]) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in segments(text, errors) {
        match segment {
            Segment::Plain(plain) => out.push_str(plain),
            Segment::Flagged { text, error_index } => {
                let _ = write!(out, "[{}]({})", text, error_index + 1);
            }
        }
    }
    out
}

pub fn error_list(errors: &[GrammarError]) -> String {
    let mut out = String::new();
    for (i, error) in errors.iter().enumerate() {
        let _ = writeln!(
            out,
            "({}) {}: \"{}\" -> \"{}\". {}",
            i + 1,
            error_type_label(error.error_type),
            error.text,
            error.correction,
            error.explanation
        );
    }
    out
}

pub fn stats_line(stats: &TypingStats, score: Option<u8>) -> String {
    let mut line = format!(
        "Hız: {} kelime/dk | Süre: {:.2} sn | Kelime: {}",
        stats.wpm, stats.time_secs, stats.word_count
    );
    if let Some(score) = score {
        let _ = write!(line, " | Puan: {}/100", score);
    }
    line
}

/// Full analysis report: stats, highlighted text, error list, summary and
/// the corrected text as its own block.
pub fn feedback_report(
    submitted: &str,
    feedback: &GrammarFeedback,
    stats: Option<&TypingStats>,
) -> String {
    let mut out = String::new();
    match stats {
        Some(stats) => {
            let _ = writeln!(out, "{}", stats_line(stats, Some(feedback.score)));
        }
        None => {
            let _ = writeln!(out, "Puan: {}/100", feedback.score);
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", highlighted(submitted, &feedback.errors));
    let _ = writeln!(out);

    if feedback.errors.is_empty() {
        let _ = writeln!(out, "Hata bulunamadı.");
    } else {
        out.push_str(&error_list(&feedback.errors));
    }
    if !feedback.summary.trim().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Özet: {}", feedback.summary.trim());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Düzeltilmiş metin ---");
    let _ = writeln!(out, "{}", feedback.corrected_text);
    let _ = writeln!(out, "-------------------------");
    out
}

pub fn status_line(snapshot: &WorkbenchSnapshot) -> String {
    let mut line = format!(
        "[{} | {:.0} sn | dikte: {:?} | oto-düzeltme: {} | kalıcı dikte: {} | model: {}]",
        snapshot.status,
        snapshot.elapsed_secs,
        snapshot.dictation,
        on_off(snapshot.auto_correct),
        on_off(snapshot.persistent_dictation),
        snapshot.model_tier,
    );
    if !snapshot.busy.is_empty() {
        let busy: Vec<String> = snapshot.busy.iter().map(|op| op.to_string()).collect();
        let _ = write!(line, " bekleniyor: {}", busy.join(", "));
    }
    line
}

pub fn settings_report(settings: &Settings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Bağlam: {}",
        settings.context().unwrap_or("(boş)")
    );
    let _ = writeln!(out, "Model: {}", settings.model_tier);
    let _ = writeln!(
        out,
        "Dikte zaman aşımı: {} sn{}",
        settings.dictation_timeout_secs,
        if settings.dictation_timeout_secs == 0 {
            " (kapalı)"
        } else {
            ""
        }
    );
    let _ = writeln!(
        out,
        "Varsayılan oto-düzeltme: {}",
        on_off(settings.default_auto_correct)
    );
    let _ = writeln!(
        out,
        "Varsayılan kalıcı dikte: {}",
        on_off(settings.default_persistent_dictation)
    );
    let level = settings.enhancement_level;
    let _ = writeln!(
        out,
        "Prompt seviyesi: {}{}",
        level.value(),
        if level.is_auto() { " (otomatik)" } else { "" }
    );
    let _ = writeln!(
        out,
        "Rol/bağlam zorunlu: {}",
        on_off(settings.force_role_context)
    );
    if settings.documents.is_empty() {
        let _ = writeln!(out, "Dökümanlar: yok");
    } else {
        let _ = writeln!(out, "Dökümanlar:");
        for (i, doc) in settings.documents.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} ({} karakter)",
                i + 1,
                doc.name,
                doc.content.chars().count()
            );
        }
    }
    out
}

fn on_off(value: bool) -> &'static str {
    if value {
        "açık"
    } else {
        "kapalı"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yazim_core::types::GroundingDocument;

    fn error(start: usize, end: usize, text: &str, correction: &str) -> GrammarError {
        GrammarError {
            error_type: ErrorType::Spelling,
            text: text.to_string(),
            start_index: start,
            end_index: end,
            correction: correction.to_string(),
            explanation: "TDK yazımı.".to_string(),
        }
    }

    #[test]
    fn test_highlight_numbers_spans_by_feedback_order() {
        let errors = vec![error(9, 14, "dünya", "Dünya"), error(0, 7, "merhaba", "Merhaba")];
        assert_eq!(
            highlighted("merhaba, dünya", &errors),
            "[merhaba](2), [dünya](1)"
        );
    }

    #[test]
    fn test_highlight_skips_overlapping_span() {
        let errors = vec![error(0, 5, "ağaç", "x"), error(2, 4, "aç", "y")];
        assert_eq!(highlighted("ağaçlar", &errors), "[ağaçl](1)ar");
    }

    #[test]
    fn test_stats_line_with_and_without_score() {
        let stats = TypingStats {
            wpm: 42,
            time_secs: 12.5,
            word_count: 9,
        };
        assert_eq!(
            stats_line(&stats, None),
            "Hız: 42 kelime/dk | Süre: 12.50 sn | Kelime: 9"
        );
        assert!(stats_line(&stats, Some(87)).ends_with("| Puan: 87/100"));
    }

    #[test]
    fn test_feedback_report_prints_corrected_block() {
        let feedback = GrammarFeedback {
            score: 90,
            errors: vec![error(0, 7, "merhaba", "Merhaba")],
            summary: "Büyük harf eksik.".to_string(),
            corrected_text: "Merhaba dünya.".to_string(),
        };
        let report = feedback_report("merhaba dünya", &feedback, None);

        assert!(report.starts_with("Puan: 90/100"));
        assert!(report.contains("[merhaba](1) dünya"));
        assert!(report.contains("(1) yazım: \"merhaba\" -> \"Merhaba\". TDK yazımı."));
        assert!(report.contains("Özet: Büyük harf eksik."));
        assert!(report.contains("--- Düzeltilmiş metin ---\nMerhaba dünya.\n"));
    }

    #[test]
    fn test_feedback_report_without_errors() {
        let feedback = GrammarFeedback {
            score: 100,
            errors: Vec::new(),
            summary: String::new(),
            corrected_text: "Tamam.".to_string(),
        };
        let report = feedback_report("Tamam.", &feedback, None);
        assert!(report.contains("Hata bulunamadı."));
        assert!(!report.contains("Özet"));
    }

    #[test]
    fn test_settings_report_lists_documents() {
        let mut settings = Settings::default();
        settings.dictation_timeout_secs = 0;
        settings.documents.push(GroundingDocument {
            name: "kurallar.txt".to_string(),
            content: "şöyle".to_string(),
        });

        let report = settings_report(&settings);
        assert!(report.contains("Bağlam: (boş)"));
        assert!(report.contains("Dikte zaman aşımı: 0 sn (kapalı)"));
        assert!(report.contains("Prompt seviyesi: 0 (otomatik)"));
        assert!(report.contains("  1. kurallar.txt (5 karakter)"));
    }
}
