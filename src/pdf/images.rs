use anyhow::{Context, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageDecoder, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::io::{Cursor, Write};

/// An image ready to be placed on its own page as an Image XObject.
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
    /// Flate-compressed 8-bit alpha channel.
    alpha: Option<Vec<u8>>,
}

impl PageImage {
    /// Decode `bytes` as a JPEG or PNG. Returns `None` for any other format.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Option<Self>> {
        match image::guess_format(&bytes) {
            Ok(ImageFormat::Jpeg) => Self::from_jpeg(bytes).map(Some),
            Ok(ImageFormat::Png) => Self::from_png(&bytes).map(Some),
            _ => Ok(None),
        }
    }

    /// JPEG data is embedded as-is; only the header is read.
    fn from_jpeg(bytes: Vec<u8>) -> Result<Self> {
        let decoder = JpegDecoder::new(Cursor::new(&bytes)).context("Invalid JPEG image")?;
        let (width, height) = decoder.dimensions();
        let color_space = match decoder.color_type() {
            ColorType::L8 | ColorType::L16 => "DeviceGray",
            _ => "DeviceRGB",
        };

        Ok(PageImage {
            width,
            height,
            color_space,
            filter: "DCTDecode",
            data: bytes,
            alpha: None,
        })
    }

    /// PNG pixels are decoded to 8 bits per channel and Flate-compressed, with
    /// any alpha channel split off into a soft mask.
    fn from_png(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .context("Invalid PNG image")?;
        let (width, height) = img.dimensions();

        let (color_space, pixels, alpha) = match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_) => {
                ("DeviceGray", img.to_luma8().into_raw(), None)
            }
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
                let pixels = img.to_luma_alpha8();
                let gray = pixels.pixels().map(|p| p.0[0]).collect();
                let alpha = pixels.pixels().map(|p| p.0[1]).collect();
                ("DeviceGray", gray, Some(alpha))
            }
            _ if img.color().has_alpha() => {
                let pixels = img.to_rgba8();
                let rgb = pixels.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
                let alpha = pixels.pixels().map(|p| p.0[3]).collect();
                ("DeviceRGB", rgb, Some(alpha))
            }
            _ => ("DeviceRGB", img.to_rgb8().into_raw(), None),
        };

        Ok(PageImage {
            width,
            height,
            color_space,
            filter: "FlateDecode",
            data: deflate(&pixels)?,
            alpha: alpha.map(|a: Vec<u8>| deflate(&a)).transpose()?,
        })
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Build a document with one page per image, each page exactly the size of
/// its image (one pixel per point).
pub fn images_to_document(images: Vec<PageImage>) -> Result<Document> {
    if images.is_empty() {
        anyhow::bail!("No images to convert");
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(images.len());

    for image in images {
        let (width, height) = (i64::from(image.width), i64::from(image.height));

        let mut xobject = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => image.color_space,
            "BitsPerComponent" => 8,
            "Filter" => image.filter,
        };
        if let Some(alpha) = image.alpha {
            let mask_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                alpha,
            ));
            xobject.set("SMask", Object::Reference(mask_id));
        }
        let image_id = doc.add_object(Stream::new(xobject, image.data));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(doc)
}
