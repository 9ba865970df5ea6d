use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fbg::backends::Headless;
use fbg::core::text::{draw_text, draw_text_simple};
use fbg::core::BuiltinFont;
use fbg::{Canvas, Color, Font, Image, PixelBuffer, RenderContext, TextStyle};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn screen(components: usize) -> PixelBuffer {
    PixelBuffer::allocate(WIDTH, HEIGHT, components).unwrap()
}

/// Benchmark: filled_rect (row copy) against rect (per pixel), full screen
fn bench_rect_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("rect_fill");

    for comps in [3usize, 4] {
        let mut buf = screen(comps);

        group.bench_with_input(BenchmarkId::new("filled_rect", comps), &comps, |b, _| {
            let mut canvas = Canvas::new(&mut buf, Color::rgb(10, 20, 30));
            b.iter(|| canvas.filled_rect(black_box(0), black_box(0), WIDTH, HEIGHT))
        });

        group.bench_with_input(BenchmarkId::new("rect", comps), &comps, |b, _| {
            let mut canvas = Canvas::new(&mut buf, Color::BLACK);
            b.iter(|| canvas.rect(black_box(0), black_box(0), WIDTH, HEIGHT, Color::rgb(10, 20, 30)))
        });
    }

    group.finish();
}

/// Benchmark: alpha-blended rectangle
fn bench_rect_alpha(c: &mut Criterion) {
    let mut buf = screen(3);
    let mut canvas = Canvas::new(&mut buf, Color::BLACK);

    c.bench_function("rect_alpha_quarter_screen", |b| {
        b.iter(|| canvas.rect_alpha(black_box(80), black_box(60), 320, 240, Color::rgba(200, 100, 50, 128)))
    });
}

/// Benchmark: lines in every octant
fn bench_lines(c: &mut Criterion) {
    let mut buf = screen(3);
    let mut canvas = Canvas::new(&mut buf, Color::BLACK);
    let (cx, cy) = (WIDTH as i32 / 2, HEIGHT as i32 / 2);

    c.bench_function("line_star_64", |b| {
        b.iter(|| {
            for i in 0..64 {
                let angle = i as f32 / 64.0 * std::f32::consts::TAU;
                let x = cx + (angle.cos() * 200.0) as i32;
                let y = cy + (angle.sin() * 200.0) as i32;
                canvas.line(cx, cy, black_box(x), black_box(y), Color::WHITE);
            }
        })
    });
}

/// Benchmark: fades over the full screen
fn bench_fade(c: &mut Criterion) {
    let mut buf = screen(4);
    let mut canvas = Canvas::new(&mut buf, Color::BLACK);

    c.bench_function("fade_down_full_screen", |b| b.iter(|| canvas.fade_down(black_box(3))));
}

/// Benchmark: image blits, plain and scaled
fn bench_images(c: &mut Criterion) {
    let mut buf = screen(3);
    let img = Image::new(128, 128, 3).unwrap();
    let mut canvas = Canvas::new(&mut buf, Color::BLACK);

    c.bench_function("image_128", |b| {
        b.iter(|| canvas.image(black_box(&img), 100, 100).unwrap())
    });

    c.bench_function("image_scale_128_x2", |b| {
        b.iter(|| canvas.image_scale(black_box(&img), 100, 100, 2.0, 2.0).unwrap())
    });
}

/// Benchmark: one line of text through both renderers
fn bench_text(c: &mut Criterion) {
    let mut buf = screen(3);
    let font = Font::new(BuiltinFont::atlas(3).unwrap(), 8, 8, BuiltinFont::FIRST_CHAR).unwrap();
    let style = TextStyle {
        color: Color::WHITE,
        background: Color::rgba(0, 0, 64, 160),
        colorkey: 0,
    };
    let text = "The quick brown fox jumps over the lazy dog 0123456789";
    let mut canvas = Canvas::new(&mut buf, Color::BLACK);

    c.bench_function("text_atlas", |b| {
        b.iter(|| draw_text(&mut canvas, &font, black_box(text), 8, 8, &style))
    });

    c.bench_function("text_simple", |b| {
        b.iter(|| draw_text_simple(&mut canvas, black_box(text), 8, 24, Color::WHITE))
    });
}

/// Benchmark: swap-based flip cycle
fn bench_flip(c: &mut Criterion) {
    let mut ctx = RenderContext::new(WIDTH, HEIGHT, 3, true, Headless::new()).unwrap();

    c.bench_function("draw_flip_cycle", |b| {
        b.iter(|| {
            ctx.draw().unwrap();
            ctx.canvas().clear(0);
            ctx.flip().unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_rect_fill,
    bench_rect_alpha,
    bench_lines,
    bench_fade,
    bench_images,
    bench_text,
    bench_flip,
);

criterion_main!(benches);
