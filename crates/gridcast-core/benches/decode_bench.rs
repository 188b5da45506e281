//! Criterion benchmarks for the gridcast decoder and stream driver.
//!
//! Run with:
//! ```bash
//! cargo bench --package gridcast-core --bench decode_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridcast_core::protocol::{
    DrawAtCursor, DrawCharacter, DrawLine, MoveCursor, RenderText, ScreenSetup,
};
use gridcast_core::{encode_command, encode_stream, Command, CommandDecoder, CommandStream};

// ── Command fixtures ──────────────────────────────────────────────────────────

fn make_setup() -> Command {
    Command::ScreenSetup(ScreenSetup {
        width: 80,
        height: 25,
        color_mode: 2,
    })
}

fn make_draw_character() -> Command {
    Command::DrawCharacter(DrawCharacter {
        x: 40,
        y: 12,
        color_index: 1,
        glyph: b'#',
    })
}

fn make_draw_line() -> Command {
    Command::DrawLine(DrawLine {
        x1: 0,
        y1: 12,
        x2: 79,
        y2: 12,
        color_index: 1,
        glyph: b'-',
    })
}

fn make_render_text() -> Command {
    Command::RenderText(RenderText {
        x: 0,
        y: 0,
        color_index: 1,
        text: vec![b'x'; 80],
    })
}

/// A full-screen session: setup, one line and one text row per screen row,
/// some cursor work, then the terminator.
fn make_session() -> Vec<Command> {
    let mut commands = vec![make_setup()];
    for y in 0..25u8 {
        commands.push(Command::DrawLine(DrawLine {
            x1: 0,
            y1: y,
            x2: 79,
            y2: y,
            color_index: y,
            glyph: b'.',
        }));
        commands.push(Command::RenderText(RenderText {
            x: 2,
            y,
            color_index: 1,
            text: b"gridcast benchmark row".to_vec(),
        }));
        commands.push(Command::MoveCursor(MoveCursor { x: 79, y }));
        commands.push(Command::DrawAtCursor(DrawAtCursor {
            glyph: b'|',
            color_index: 2,
        }));
    }
    commands.push(Command::ClearScreen);
    commands.push(Command::Terminator);
    commands
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

/// Benchmarks decoding a single command of each payload shape.
fn bench_decode_command(c: &mut Criterion) {
    let commands: &[(&str, Command)] = &[
        ("ScreenSetup", make_setup()),
        ("DrawCharacter", make_draw_character()),
        ("DrawLine", make_draw_line()),
        ("RenderText(80)", make_render_text()),
        ("ClearScreen", Command::ClearScreen),
    ];

    let mut group = c.benchmark_group("decode_command");
    for (name, command) in commands {
        let bytes = encode_command(command).expect("encode must succeed for benchmark setup");
        group.bench_with_input(BenchmarkId::new("cmd", name), &bytes, |b, bytes| {
            b.iter(|| {
                CommandDecoder::new(black_box(bytes.as_slice()))
                    .next_command()
                    .expect("decode must succeed")
            })
        });
    }
    group.finish();
}

/// Benchmarks decoding and applying a full-screen session end to end.
fn bench_stream_session(c: &mut Criterion) {
    let bytes = encode_stream(&make_session()).expect("encode must succeed for benchmark setup");

    let mut group = c.benchmark_group("stream_session");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("80x25", |b| {
        b.iter(|| {
            let mut stream = CommandStream::new(black_box(bytes.as_slice()));
            stream.run().expect("session must terminate cleanly")
        })
    });
    group.finish();
}

criterion_group!(benches, bench_decode_command, bench_stream_session);
criterion_main!(benches);
