use image::RgbaImage;

/// Blit `src` into `canvas` with its top-left corner at (dx, dy).
///
/// Pixels falling outside the canvas are skipped; the layout step sizes the
/// canvas so this only happens on malformed placements.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        for xx in 0..sw {
            if dx + xx < cw && dy + yy < ch {
                canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
            }
        }
    }
}
