use prings::{
    CropRegion, Exporter, RingParams, Squareness, compose, crop_to_rect, crop_window,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn solid_photo(side: u32, rgb: [u8; 3]) -> image::RgbaImage {
    image::RgbaImage::from_pixel(side, side, image::Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

fn decode_png(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

#[test]
fn export_is_capped_at_800_and_never_upscaled() {
    let params = RingParams::default();

    let big = compose(&solid_photo(1000, [0, 0, 0]), &params, 1.0).unwrap();
    assert_eq!((big.width, big.height), (800, 800));
    assert_eq!(decode_png(&big.png).dimensions(), (800, 800));

    let small = compose(&solid_photo(500, [0, 0, 0]), &params, 1.0).unwrap();
    assert_eq!((small.width, small.height), (500, 500));
}

#[test]
fn export_scales_with_device_pixel_ratio() {
    let artifact = compose(&solid_photo(1000, [0, 0, 0]), &RingParams::default(), 2.0).unwrap();
    assert_eq!((artifact.width, artifact.height), (1600, 1600));
}

#[test]
fn crop_then_compose_end_to_end() {
    init_tracing();

    // 1200x1200 source, centered 800x800 crop (zoom 1.5), "TEST" ring in red.
    let photo = solid_photo(1200, [10, 120, 200]);

    let region = CropRegion {
        zoom: 1.5,
        ..Default::default()
    };
    let rect = crop_window(photo.width(), photo.height(), &region).unwrap();
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (200, 200, 800, 800));
    let square = crop_to_rect(&photo, rect, Squareness::Required).unwrap();

    let params = RingParams {
        text: "TEST".to_string(),
        ring_color: prings::Rgb::new(255, 0, 0),
        ..RingParams::default()
    };

    let mut exporter = Exporter::new();
    let artifact = exporter.export(&square, &params, 1.0).unwrap();
    assert_eq!(artifact.filename, "prings.png");

    let out = decode_png(&artifact.png);
    assert_eq!(out.dimensions(), (800, 800));

    // Interior (inside the ring hole) shows the photo.
    let center = out.get_pixel(400, 400);
    assert_eq!(&center.0[..3], &[10, 120, 200]);

    // The ring band at six o'clock sits before the gradient start, so it is
    // solid ring color. 320-space radius 133.75 scales by 2.5 here.
    let band = out.get_pixel(400, 400 + 334);
    assert!(band[0] > 200, "expected red-dominant ring band, got {band:?}");
    assert!(band[1] < 80 && band[2] < 80, "expected red-dominant ring band, got {band:?}");

    // Outside the gradient's far end the ring fades out and the photo shows
    // through: top of the ring carries much less ring color than the bottom.
    let faded = out.get_pixel(400, 400 - 334);
    assert!(faded[0] < band[0]);
}

#[test]
fn export_twice_is_bit_identical() {
    let photo = solid_photo(600, [40, 80, 160]);
    let params = RingParams {
        text: "TEST".to_string(),
        ..RingParams::default()
    };

    let a = compose(&photo, &params, 1.0).unwrap();
    let b = compose(&photo, &params, 1.0).unwrap();
    assert_eq!(a.png, b.png);
}

#[test]
fn non_square_photo_is_covered_not_stretched() {
    // 1000x500 photo, left half red, right half blue. Cover keeps the center
    // band, so both colors survive on the surface midline.
    let photo = image::RgbaImage::from_fn(1000, 500, |x, _| {
        if x < 500 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    let params = RingParams {
        text: String::new(),
        ..RingParams::default()
    };

    let artifact = compose(&photo, &params, 1.0).unwrap();
    assert_eq!((artifact.width, artifact.height), (500, 500));

    let out = decode_png(&artifact.png);
    let left = out.get_pixel(160, 250);
    let right = out.get_pixel(340, 250);
    assert!(left[0] > 200 && left[2] < 80, "left half should be red, got {left:?}");
    assert!(right[2] > 200 && right[0] < 80, "right half should be blue, got {right:?}");
}

#[test]
fn empty_text_still_exports() {
    let photo = solid_photo(400, [9, 9, 9]);
    let params = RingParams {
        text: String::new(),
        ..RingParams::default()
    };
    let artifact = compose(&photo, &params, 1.0).unwrap();
    assert_eq!((artifact.width, artifact.height), (400, 400));
}
