//! Benchmarks for the edit history and session hot paths.
//!
//! Manual typing replaces the whole buffer on every keystroke, so `input`
//! is measured against a long text. History pushes are bounded by discrete
//! operations, but a long session with many assisted edits is still worth
//! watching.

use chrono::{DateTime, Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion};

use yazim_session::{segments, EditHistory, Session};

/// Number of checkpoints pushed per iteration.
const CHECKPOINT_COUNT: usize = 500;

fn paragraph(index: usize) -> String {
    format!(
        "Türkçe yazım kurallarına göre bağlaçlar ayrı yazılır. Noktalama işaretleri \
         cümlenin anlamını belirler ve okuyucuya yol gösterir. Paragraf numarası: {}",
        index
    )
}

fn bench_history_push_undo(c: &mut Criterion) {
    let snapshots: Vec<String> = (0..CHECKPOINT_COUNT).map(paragraph).collect();

    c.bench_function("history_push_then_undo_all", |b| {
        b.iter(|| {
            let mut history = EditHistory::new();
            for snapshot in &snapshots {
                history.push(snapshot);
            }
            while history.undo().is_some() {}
            history.index()
        })
    });
}

fn bench_session_typing(c: &mut Criterion) {
    let text = (0..50).map(paragraph).collect::<Vec<_>>().join(" ");
    let start = DateTime::<Utc>::UNIX_EPOCH;

    c.bench_function("session_input_per_keystroke", |b| {
        b.iter(|| {
            let mut session = Session::new();
            for (i, (offset, _)) in text.char_indices().step_by(64).enumerate() {
                session.input(&text[..offset], start + Duration::milliseconds(i as i64));
            }
            session.buffer().len()
        })
    });
}

fn bench_highlight_segments(c: &mut Criterion) {
    use yazim_core::types::{ErrorType, GrammarError};

    let text = (0..20).map(paragraph).collect::<Vec<_>>().join(" ");
    let char_len = text.chars().count();
    let errors: Vec<GrammarError> = (0..char_len / 20)
        .rev()
        .map(|i| GrammarError {
            error_type: ErrorType::Punctuation,
            text: String::new(),
            start_index: i * 20,
            end_index: i * 20 + 5,
            correction: String::new(),
            explanation: String::new(),
        })
        .collect();

    c.bench_function("highlight_segments", |b| {
        b.iter(|| segments(&text, &errors).len())
    });
}

criterion_group!(
    benches,
    bench_history_push_undo,
    bench_session_typing,
    bench_highlight_segments
);
criterion_main!(benches);
