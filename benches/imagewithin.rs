use criterion::{criterion_group, criterion_main, Criterion};
use imagewithin::lowlevel::{correlate, resize_u8_bilinear};
use imagewithin::{ImageView, RequestContext, RgbImage, SearchConfig, Searcher, Template};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn extract_patch(
    image: &[u8],
    img_width: usize,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = (y0 + y) * img_width;
        out.extend_from_slice(&image[row + x0..row + x0 + width]);
    }
    out
}

fn to_rgb(gray: &[u8], width: usize, height: usize) -> RgbImage {
    let data = gray.iter().flat_map(|&v| [v, v, v]).collect();
    RgbImage::new(data, width, height).unwrap()
}

fn bench_engine(c: &mut Criterion) {
    let img_width = 256;
    let img_height = 256;
    let image = make_image(img_width, img_height);
    let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();
    let template = Template::new(extract_patch(&image, img_width, 90, 60, 32, 32), 32, 32).unwrap();

    c.bench_function("ncc_surface_256_tpl32", |b| {
        b.iter(|| black_box(correlate(image_view, &template).unwrap()));
    });

    c.bench_function("resize_bilinear_256_x0_7", |b| {
        b.iter(|| black_box(resize_u8_bilinear(image_view, 0.7).unwrap()));
    });
}

fn bench_search(c: &mut Criterion) {
    let img_width = 192;
    let img_height = 144;
    let image = make_image(img_width, img_height);
    let base = to_rgb(&image, img_width, img_height);
    let searcher = Searcher::new(SearchConfig::default()).unwrap();
    let ctx = RequestContext::new("bench");

    let native = Template::new(extract_patch(&image, img_width, 40, 30, 24, 24), 24, 24).unwrap();
    c.bench_function("search_native_hit", |b| {
        b.iter(|| black_box(searcher.search(&base, &native, 0, &ctx).unwrap()));
    });

    // No native match, so the fallback pass runs.
    let unrelated: Vec<u8> = (0..24 * 24).map(|i| ((i * 97 + 31) % 251) as u8).collect();
    let unrelated = Template::new(unrelated, 24, 24).unwrap();
    c.bench_function("search_full_fallback", |b| {
        b.iter(|| black_box(searcher.search(&base, &unrelated, 0, &ctx).unwrap()));
    });
}

criterion_group!(benches, bench_engine, bench_search);
criterion_main!(benches);
