use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use softrast::bench::{FrameBuffer, Primitive, RasterBackend, ScanlineRasterizer};
use softrast::math::vec2::Vec2;
use softrast::math::vec4::Vec4;
use softrast::Texture;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn create_buffers() -> (Vec<u32>, Vec<f32>) {
    let size = (BUFFER_WIDTH * BUFFER_HEIGHT) as usize;
    (vec![0u32; size], vec![1.0f32; size])
}

fn solid_triangle(points: [(f32, f32); 3]) -> Primitive {
    Primitive::SolidTriangle {
        points: [
            Vec4::new(points[0].0, points[0].1, 0.0, 2.0),
            Vec4::new(points[1].0, points[1].1, 0.0, 2.0),
            Vec4::new(points[2].0, points[2].1, 0.0, 2.0),
        ],
        color: 0xFFFF0000,
    }
}

fn textured_triangle(points: [(f32, f32); 3]) -> Primitive {
    Primitive::TexturedTriangle {
        points: [
            Vec4::new(points[0].0, points[0].1, 0.0, 2.0),
            Vec4::new(points[1].0, points[1].1, 0.0, 3.0),
            Vec4::new(points[2].0, points[2].1, 0.0, 4.0),
        ],
        uvs: [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ],
    }
}

const SMALL: [(f32, f32); 3] = [(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)];
const MEDIUM: [(f32, f32); 3] = [(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)];
const LARGE: [(f32, f32); 3] = [(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)];

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    let rasterizer = ScanlineRasterizer::new();
    let texture = Texture::checkerboard(64, 8, 0xFFC0C0C0, 0xFF303030);

    for (name, points) in [("small", SMALL), ("medium", MEDIUM), ("large", LARGE)] {
        group.bench_with_input(
            BenchmarkId::new("solid", name),
            &solid_triangle(points),
            |b, primitive| {
                let (mut color, mut depth) = create_buffers();
                b.iter(|| {
                    depth.fill(1.0);
                    let mut fb =
                        FrameBuffer::new(&mut color, &mut depth, BUFFER_WIDTH, BUFFER_HEIGHT);
                    rasterizer.draw(black_box(primitive), &mut fb, None);
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("textured", name),
            &textured_triangle(points),
            |b, primitive| {
                let (mut color, mut depth) = create_buffers();
                b.iter(|| {
                    depth.fill(1.0);
                    let mut fb =
                        FrameBuffer::new(&mut color, &mut depth, BUFFER_WIDTH, BUFFER_HEIGHT);
                    rasterizer.draw(black_box(primitive), &mut fb, Some(&texture));
                });
            },
        );
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    let rasterizer = ScanlineRasterizer::new();

    // Generate a grid of small triangles
    let triangles: Vec<Primitive> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                solid_triangle([(x, y), (x + 35.0, y), (x + 17.5, y + 25.0)])
            })
        })
        .collect();

    group.bench_function("solid_400_triangles", |b| {
        let (mut color, mut depth) = create_buffers();
        b.iter(|| {
            depth.fill(1.0);
            let mut fb = FrameBuffer::new(&mut color, &mut depth, BUFFER_WIDTH, BUFFER_HEIGHT);
            for triangle in &triangles {
                rasterizer.draw(black_box(triangle), &mut fb, None);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_many_triangles);
criterion_main!(benches);
