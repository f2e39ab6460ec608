//! Raster image formats: frame-per-page decoding.

use crate::error::Result;
use crate::model::Page;
use image::RgbImage;
use std::io::Cursor;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;

/// Decode a single-frame image (JPEG, PNG) as a one-page document.
pub(crate) fn single_frame(bytes: &[u8]) -> Result<Vec<Page>> {
    let image = image::load_from_memory(bytes)?.to_rgb8();
    Ok(vec![Page::new(1, image)])
}

/// Decode every TIFF frame as one page, in frame order.
///
/// Frames with unsupported color layouts or corrupt data are skipped
/// with a warning, mirroring the per-page skip contract of the PDF
/// rasterizer; skipped frames still consume their page number.
pub(crate) fn tiff_frames(bytes: &[u8]) -> Result<Vec<Page>> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?;
    let mut pages = Vec::new();
    let mut number: u32 = 1;

    loop {
        match decode_frame(&mut decoder) {
            Ok(Some(image)) => pages.push(Page::new(number, image)),
            Ok(None) => log::warn!("Skipping TIFF frame {}: unsupported color layout", number),
            Err(e) => log::warn!("Skipping undecodable TIFF frame {}: {}", number, e),
        }

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
        number += 1;
    }

    Ok(pages)
}

/// Decode the decoder's current frame to RGB8, or `None` when the
/// frame's color layout has no lossless RGB8 conversion.
fn decode_frame(
    decoder: &mut Decoder<Cursor<&[u8]>>,
) -> std::result::Result<Option<RgbImage>, tiff::TiffError> {
    let (width, height) = decoder.dimensions()?;
    let color = decoder.colortype()?;
    let result = decoder.read_image()?;

    let data = match result {
        DecodingResult::U8(data) => data,
        _ => return Ok(None),
    };

    let rgb = match color {
        ColorType::RGB(8) => RgbImage::from_raw(width, height, data),
        ColorType::RGBA(8) => {
            let rgb: Vec<u8> = data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            RgbImage::from_raw(width, height, rgb)
        }
        ColorType::Gray(8) => {
            let rgb: Vec<u8> = data.iter().flat_map(|&g| [g, g, g]).collect();
            RgbImage::from_raw(width, height, rgb)
        }
        _ => None,
    };

    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{colortype, TiffEncoder};

    fn encode_tiff(frames: &[RgbImage]) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        let mut encoder = TiffEncoder::new(&mut bytes).unwrap();
        for frame in frames {
            encoder
                .write_image::<colortype::RGB8>(frame.width(), frame.height(), frame.as_raw())
                .unwrap();
        }
        drop(encoder);
        bytes.into_inner()
    }

    #[test]
    fn test_single_frame_jpeg() {
        let img = RgbImage::from_pixel(4, 4, image::Rgb([9, 9, 9]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();

        let pages = single_frame(&bytes).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].dimensions(), (4, 4));
    }

    #[test]
    fn test_tiff_multi_frame_in_order() {
        let frames = vec![
            RgbImage::from_pixel(6, 4, image::Rgb([10, 0, 0])),
            RgbImage::from_pixel(5, 3, image::Rgb([0, 20, 0])),
            RgbImage::from_pixel(4, 2, image::Rgb([0, 0, 30])),
        ];
        let bytes = encode_tiff(&frames);

        let pages = tiff_frames(&bytes).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].dimensions(), (6, 4));
        assert_eq!(pages[1].dimensions(), (5, 3));
        assert_eq!(pages[2].number, 3);
        assert_eq!(pages[2].image.get_pixel(0, 0), &image::Rgb([0, 0, 30]));
    }

    #[test]
    fn test_tiff_undecodable_frame_is_skipped_not_fatal() {
        // Three frames; the middle one uses a 16-bit layout this engine
        // does not convert. The document keeps its other two pages, and
        // the surviving pages keep their original numbers.
        let mut bytes = Cursor::new(Vec::new());
        let mut encoder = TiffEncoder::new(&mut bytes).unwrap();
        let rgb = RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]));
        encoder
            .write_image::<colortype::RGB8>(4, 4, rgb.as_raw())
            .unwrap();
        encoder
            .write_image::<colortype::Gray16>(4, 4, &[0u16; 16])
            .unwrap();
        encoder
            .write_image::<colortype::RGB8>(4, 4, rgb.as_raw())
            .unwrap();
        drop(encoder);

        let pages = tiff_frames(&bytes.into_inner()).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].number, 3);
    }

    #[test]
    fn test_tiff_invalid_container() {
        assert!(tiff_frames(&[0u8; 16]).is_err());
    }
}
