use expblur::Params;
use fimg::Image;
use umath::FF32;

fn image_bytes() -> Vec<u8> {
    // cheap deterministic noise with some structure
    (0..800u32 * 200 * 3)
        .map(|i| ((i % 2400) / 9 ^ (i / 2400) * 3) as u8)
        .collect()
}

fn bench_blur_image() {
    let mut image_bytes = image_bytes();
    expblur::blur::<3, _>(&mut Image::build(800, 200).buf(&mut *image_bytes), unsafe {
        FF32::new(15.0)
    })
    .unwrap();
    iai::black_box(image_bytes);
}

fn bench_blur_glyph() {
    let mut mask = image_bytes();
    expblur::blur_bytes(
        &mut mask,
        &expblur::Layout::packed(1200, 400, 1),
        &Params::glyph(4.0).passes(2),
    )
    .unwrap();
    iai::black_box(mask);
}

iai::main!(bench_blur_image, bench_blur_glyph);
