//! Mockup composition: fit the source into the screen slot and frame it.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::geometry::ScreenGeometry;

/// Compose `source` into the phone frame described by `geometry`.
///
/// The source is resized with Lanczos3 to fit the screen slot, pasted centered
/// on a transparent phone-sized canvas, and the template is alpha-composited
/// over the whole canvas. The template must be `phone_width x phone_height`;
/// the template provider guarantees this.
#[must_use]
pub fn compose(
    source: &DynamicImage,
    template: &RgbaImage,
    geometry: &ScreenGeometry,
) -> RgbaImage {
    debug_assert_eq!(
        template.dimensions(),
        (geometry.phone_width, geometry.phone_height)
    );

    let source = source.to_rgba8();
    let (new_width, new_height) = geometry.fit(source.width(), source.height());
    let resized = resize_premultiplied(&source, new_width, new_height);
    debug!(
        from_width = source.width(),
        from_height = source.height(),
        new_width,
        new_height,
        "resized source"
    );

    let mut canvas = RgbaImage::new(geometry.phone_width, geometry.phone_height);
    let (x, y) = geometry.center_offset(new_width, new_height);
    imageops::replace(&mut canvas, &resized, x, y);

    alpha_composite_in_place(&mut canvas, template);
    canvas
}

/// Lanczos3 resize on premultiplied alpha.
///
/// Resampling straight RGBA lets the colour of transparent pixels bleed into
/// visible edges; weighting by alpha first keeps edges their own colour.
fn resize_premultiplied(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut premultiplied = source.clone();
    for pixel in premultiplied.pixels_mut() {
        let alpha = u32::from(pixel[3]);
        for channel in &mut pixel.0[..3] {
            *channel = div_round(u32::from(*channel) * alpha, 255);
        }
    }

    let mut resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    for pixel in resized.pixels_mut() {
        let alpha = u32::from(pixel[3]);
        for channel in &mut pixel.0[..3] {
            *channel = match alpha {
                0 => 0,
                255 => *channel,
                _ => clamp_u8(u32::from(*channel) * 255 / alpha),
            };
        }
    }
    resized
}

/// Straight-alpha "over": `src` drawn on top of `dst`.
///
/// Opaque `src` replaces `dst` exactly and transparent `src` leaves it as is.
#[must_use]
pub fn over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    // Output alpha scaled by 255^2 to keep the intermediate exact.
    let dst_weight = da * (255 - sa);
    let out_a = sa * 255 + dst_weight;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * dst_weight;
        out[i] = div_round(c, out_a);
    }
    out[3] = div_round(out_a, 255);
    Rgba(out)
}

/// Composite `top` over `base`; both images must have the same dimensions.
pub fn alpha_composite_in_place(base: &mut RgbaImage, top: &RgbaImage) {
    for (dst, src) in base.pixels_mut().zip(top.pixels()) {
        *dst = over(*dst, *src);
    }
}

fn div_round(numerator: u32, denominator: u32) -> u8 {
    clamp_u8((numerator + denominator / 2) / denominator)
}

#[allow(clippy::cast_possible_truncation)]
fn clamp_u8(value: u32) -> u8 {
    value.min(255) as u8
}
