use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use transcript_viewer::layout::{layout_sequence, CharWidthMeasure, LayoutStyle};
use transcript_viewer::ui::surface::{draw_page, CommandRecorder};
use transcript_viewer::ui::theme::Palette;
use transcript_viewer::{Message, RawMessage, RawText, Transcript, ViewState};

fn make_messages(count: usize, base: &str) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let raw = RawMessage {
                from: Some(if i % 2 == 0 { "Alice" } else { "Me" }.into()),
                from_id: Some(if i % 2 == 0 { "user1" } else { "user42" }.into()),
                // A new day every 25 messages
                date: Some(format!("2024-01-{:02}T10:{:02}:00", 1 + (i / 25) % 28, i % 60)),
                text: RawText::Plain(base.repeat(1 + i % 4)),
                ..Default::default()
            };
            Message::normalize(&raw, Some("42"))
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let base = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor ";
    let canvas = LayoutStyle::canvas();
    let export = LayoutStyle::export();
    let palette = Palette::dark();

    for &count in &[20usize, 200usize] {
        let messages = make_messages(count, base);

        let mut group = c.benchmark_group(format!("layout_{}msg", count));
        group.throughput(Throughput::Elements(count as u64));

        group.bench_function(BenchmarkId::new("canvas", 800), |b| {
            b.iter(|| {
                layout_sequence(
                    black_box(&messages),
                    800.,
                    &canvas,
                    &mut CharWidthMeasure,
                )
            })
        });
        group.bench_function(BenchmarkId::new("export", 1200), |b| {
            b.iter(|| {
                layout_sequence(
                    black_box(&messages),
                    1200.,
                    &export,
                    &mut CharWidthMeasure,
                )
            })
        });

        let page = layout_sequence(&messages, 800., &canvas, &mut CharWidthMeasure);
        group.bench_function("record_commands", |b| {
            b.iter(|| {
                let mut recorder = CommandRecorder::new();
                draw_page(&mut recorder, black_box(&page), &palette, 0., f32::MAX)
            })
        });
        group.finish();
    }

    // Search over a large transcript, then re-layout of the last page
    let view = ViewState::new(20).load(Transcript::new("Bench", make_messages(5000, base)));
    c.bench_function("filter_and_layout_5000", |b| {
        b.iter(|| {
            let filtered = view.with_query(black_box("consectetur"));
            layout_sequence(filtered.page_messages(), 800., &canvas, &mut CharWidthMeasure)
        })
    });
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
