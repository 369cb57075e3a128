use image::{imageops, GrayImage, RgbaImage};

/// Bounding box of the non-zero mask pixels as `(min_x, min_y, max_x, max_y)`
/// inclusive, or `None` for an all-zero mask.
pub(crate) fn mask_bounds(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = mask.dimensions();
    let raw = mask.as_raw();

    let mut min_x = w;
    let mut min_y = h;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for y in 0..h {
        let row = y as usize * w as usize;
        for x in 0..w {
            if raw[row + x as usize] > 0 {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if min_x > max_x || min_y > max_y {
        None
    } else {
        Some((min_x, min_y, max_x, max_y))
    }
}

/// Blend `effect` over `surface` wherever the mask is set, weighted by the
/// mask coverage. Only the given inclusive bounding box is visited.
fn composite_masked(
    surface: &mut RgbaImage,
    effect: &RgbaImage,
    mask: &GrayImage,
    bounds: (u32, u32, u32, u32),
) {
    let (min_x, min_y, max_x, max_y) = bounds;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let m = mask.get_pixel(x, y)[0];
            if m == 0 {
                continue;
            }
            let t = m as f32 / 255.0;
            let src = effect.get_pixel(x, y);
            let dst = surface.get_pixel_mut(x, y);
            for c in 0..4 {
                dst[c] = (src[c] as f32 * t + dst[c] as f32 * (1.0 - t)).round() as u8;
            }
        }
    }
}

/// Masked gaussian blur: blur the snapshot of the surface-so-far and write
/// it back through the brushed mask.
///
/// Only the padded bounding box of the mask is blurred: the kernel needs
/// `3*sigma` of surrounding context to avoid edge artifacts, and blurring
/// the whole surface for a small brush stroke would dominate the frame.
pub(crate) fn apply_blur(
    surface: &mut RgbaImage,
    snapshot: &RgbaImage,
    mask: &GrayImage,
    radius: f32,
) {
    let bounds = match mask_bounds(mask) {
        Some(b) => b,
        None => return,
    };
    let sigma = radius.max(1.0);

    let (min_x, min_y, max_x, max_y) = bounds;
    let pad = (sigma * 3.0).ceil() as u32;
    let crop_x = min_x.saturating_sub(pad);
    let crop_y = min_y.saturating_sub(pad);
    let crop_w = (max_x + 1 + pad).min(snapshot.width()) - crop_x;
    let crop_h = (max_y + 1 + pad).min(snapshot.height()) - crop_y;

    let sub = imageops::crop_imm(snapshot, crop_x, crop_y, crop_w, crop_h).to_image();
    let blurred_sub = imageops::blur(&sub, sigma);

    // Paste the blurred crop back into a full-size buffer so the masked
    // composite can address it in surface coordinates.
    let mut effect = snapshot.clone();
    imageops::replace(&mut effect, &blurred_sub, crop_x as i64, crop_y as i64);

    composite_masked(surface, &effect, mask, bounds);
}

/// Masked pixelation: downscale the snapshot with nearest-neighbor sampling,
/// scale it back up the same way (no smoothing in either direction), and
/// write the result through the mask.
///
/// The scale factor is derived from intensity 0..=100:
/// `s = max(0.005, 0.2 - intensity/100 * 0.195)`; stronger intensity means
/// a smaller intermediate image and therefore larger blocks. The downscale
/// spans the full surface so block boundaries stay aligned across strokes.
pub(crate) fn apply_pixelate(
    surface: &mut RgbaImage,
    snapshot: &RgbaImage,
    mask: &GrayImage,
    intensity: f32,
) {
    let bounds = match mask_bounds(mask) {
        Some(b) => b,
        None => return,
    };

    let (w, h) = snapshot.dimensions();
    let scale = (0.2 - intensity / 100.0 * 0.195).max(0.005);
    let small_w = ((w as f32 * scale).ceil() as u32).max(1);
    let small_h = ((h as f32 * scale).ceil() as u32).max(1);

    let small = imageops::resize(snapshot, small_w, small_h, imageops::FilterType::Nearest);
    let effect = imageops::resize(&small, w, h, imageops::FilterType::Nearest);

    composite_masked(surface, &effect, mask, bounds);
}
