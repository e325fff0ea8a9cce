//! QR check-in codes
//!
//! Each guest gets an opaque token baked into a QR image. The image is
//! delivered over MMS as JPEG; the carrier gateway rejects PNG attachments,
//! so the QR is rendered onto a white background and re-encoded.

use crate::utils::{AppError, AppResult};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb, RgbImage};
use qrcode::{Color, QrCode};
use rand::Rng;

const TOKEN_PREFIX: &str = "WED_";
const TOKEN_LEN: usize = 12;
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Rendered QR image edge length in pixels
const IMAGE_SIZE: u32 = 400;
/// Quiet-zone width in modules
const MARGIN_MODULES: u32 = 2;
const JPEG_QUALITY: u8 = 90;

/// A fresh opaque check-in token
pub fn generate_qr_token() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect();
    format!("{TOKEN_PREFIX}{suffix}")
}

/// The public page a scanned code opens
pub fn landing_url(base_url: &str, token: &str) -> String {
    format!("{}/qr/{token}", base_url.trim_end_matches('/'))
}

/// Render a token's landing URL into a 400px JPEG suitable for MMS delivery
///
/// The QR payload is the full landing URL, so any phone camera opens the
/// seating page directly.
pub fn generate_qr_jpeg(base_url: &str, token: &str) -> AppResult<Vec<u8>> {
    let code = QrCode::new(landing_url(base_url, token).as_bytes())
        .map_err(|e| AppError::internal(format!("QR encode failed: {e}")))?;

    let modules = code.to_colors();
    let side = code.width() as u32;
    let total = side + MARGIN_MODULES * 2;
    let scale = (IMAGE_SIZE / total).max(1);
    let rendered = total * scale;
    let offset = IMAGE_SIZE.saturating_sub(rendered) / 2 + MARGIN_MODULES * scale;

    // flatten onto white: the JPEG has no alpha channel to lean on
    let mut canvas: RgbImage =
        ImageBuffer::from_pixel(IMAGE_SIZE, IMAGE_SIZE, Rgb([255u8, 255, 255]));
    for my in 0..side {
        for mx in 0..side {
            if modules[(my * side + mx) as usize] == Color::Dark {
                let x0 = offset + mx * scale;
                let y0 = offset + my * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (x, y) = (x0 + dx, y0 + dy);
                        if x < IMAGE_SIZE && y < IMAGE_SIZE {
                            canvas.put_pixel(x, y, Rgb([0, 0, 0]));
                        }
                    }
                }
            }
        }
    }

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    canvas
        .write_with_encoder(encoder)
        .map_err(|e| AppError::internal(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_prefix_and_twelve_alphanumerics() {
        let token = generate_qr_token();
        assert!(token.starts_with("WED_"));
        let suffix = &token["WED_".len()..];
        assert_eq!(suffix.len(), 12);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn tokens_are_unlikely_to_collide() {
        let a = generate_qr_token();
        let b = generate_qr_token();
        assert_ne!(a, b);
    }

    #[test]
    fn jpeg_output_has_jpeg_magic_bytes() {
        let bytes = generate_qr_jpeg("https://example.com", "WED_TESTTOKEN123").unwrap();
        assert!(bytes.len() > 2);
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn jpeg_round_trips_as_400px_image() {
        let bytes = generate_qr_jpeg("https://example.com", "WED_TESTTOKEN123").unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), 400);
        assert_eq!(img.height(), 400);
    }

    #[test]
    fn landing_url_joins_without_a_double_slash() {
        assert_eq!(
            landing_url("https://example.com/", "WED_ABC123DEF456"),
            "https://example.com/qr/WED_ABC123DEF456"
        );
    }

    /// Count modules whose sampled center pixel disagrees with the given
    /// code's matrix, using the renderer's own geometry
    fn sampled_mismatches(img: &image::GrayImage, code: &QrCode) -> usize {
        let modules = code.to_colors();
        let side = code.width() as u32;
        let total = side + MARGIN_MODULES * 2;
        let scale = (IMAGE_SIZE / total).max(1);
        let rendered = total * scale;
        let offset = IMAGE_SIZE.saturating_sub(rendered) / 2 + MARGIN_MODULES * scale;

        let mut mismatches = 0;
        for my in 0..side {
            for mx in 0..side {
                let x = offset + mx * scale + scale / 2;
                let y = offset + my * scale + scale / 2;
                if x >= IMAGE_SIZE || y >= IMAGE_SIZE {
                    mismatches += 1;
                    continue;
                }
                let dark = img.get_pixel(x, y)[0] < 128;
                if dark != (modules[(my * side + mx) as usize] == Color::Dark) {
                    mismatches += 1;
                }
            }
        }
        mismatches
    }

    #[test]
    fn qr_payload_is_the_landing_url_not_the_bare_token() {
        let base = "https://example.com";
        let token = "WED_TESTTOKEN123";
        let bytes = generate_qr_jpeg(base, token).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_luma8();

        let url_code = QrCode::new(landing_url(base, token).as_bytes()).unwrap();
        let token_code = QrCode::new(token.as_bytes()).unwrap();

        assert_eq!(sampled_mismatches(&img, &url_code), 0);
        assert!(sampled_mismatches(&img, &token_code) > 0);
    }
}
