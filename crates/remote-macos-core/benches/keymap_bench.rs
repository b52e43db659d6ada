//! Criterion benchmarks for key name normalization and KeySym lookup.
//!
//! Every `send_keys` call normalizes its inputs and every replayed key is
//! translated to a KeySym, so these lookups sit on the per-event path.
//!
//! Run with:
//! ```bash
//! cargo bench --package remote-macos-core --bench keymap_bench
//! ```

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use remote_macos_core::input::plan;
use remote_macos_core::keymap::{
    normalize_combo_part, normalize_special_key, parse_combination, text_key, token_to_keysym,
};

// ── Representative inputs ─────────────────────────────────────────────────────

const BENCH_SPECIAL_KEYS: &[&str] = &[
    "Enter", "backspace", "Delete", "tab", "Escape", "spacebar", "Home", "End", "Page Up",
    "page-down", "Left", "Up", "Right", "Down", "F5", "caps lock",
];

const BENCH_COMBO_PARTS: &[&str] = &[
    "cmd", "Command", "ctrl", "Control", "shift", "option", "alt", "T", "f12", "Tab", "Fn",
];

const BENCH_TOKENS: &[&str] = &[
    "return", "bsp", "delete", "tab", "esc", "space", "home", "end", "pgup", "pgdn", "left",
    "up", "right", "down", "ctrl", "shift", "alt", "super", "f1", "f12", "a", "Z", "é", "€",
];

const BENCH_TEXT: &str = "The quick brown fox jumps over the lazy dog.\n";

// ── Benchmarks: normalization ─────────────────────────────────────────────────

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_normalize");

    group.bench_function("special_key_single", |b| {
        b.iter(|| normalize_special_key(black_box("Page Down")))
    });

    group.bench_function("special_key_batch_16", |b| {
        b.iter(|| {
            BENCH_SPECIAL_KEYS
                .iter()
                .map(|name| normalize_special_key(black_box(name)))
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("combo_part_batch_11", |b| {
        b.iter(|| {
            BENCH_COMBO_PARTS
                .iter()
                .map(|part| normalize_combo_part(black_box(part)))
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("parse_combination", |b| {
        b.iter(|| parse_combination(black_box("cmd + shift + option + T")))
    });

    group.bench_function("text_key_sentence", |b| {
        b.iter(|| black_box(BENCH_TEXT).chars().map(text_key).collect::<Vec<_>>())
    });

    group.finish();
}

// ── Benchmarks: KeySym translation ────────────────────────────────────────────

fn bench_keysym(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_keysym");

    group.bench_function("token_to_keysym_single", |b| {
        b.iter(|| token_to_keysym(black_box("return")))
    });

    group.bench_function("token_to_keysym_batch_24", |b| {
        b.iter(|| {
            BENCH_TOKENS
                .iter()
                .map(|token| token_to_keysym(black_box(token)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

// ── Benchmarks: planning ──────────────────────────────────────────────────────

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    group.bench_function("type_text_sentence", |b| {
        b.iter(|| plan::type_text(black_box(BENCH_TEXT), Duration::from_millis(10)))
    });

    group.bench_function("open_application", |b| {
        b.iter(|| plan::open_application(black_box("System Settings"), 400))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_keysym, bench_plan);
criterion_main!(benches);
