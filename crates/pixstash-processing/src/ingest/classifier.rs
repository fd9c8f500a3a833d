//! Format classification by file extension

use image::ImageFormat;

/// Raster formats the service knows how to decode and re-encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
}

impl SourceFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            SourceFormat::Jpeg => ImageFormat::Jpeg,
            SourceFormat::Png => ImageFormat::Png,
            SourceFormat::Gif => ImageFormat::Gif,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    /// Eligible for transcoding to the delivery format
    Convertible(SourceFormat),
    /// Stored verbatim
    Opaque,
}

/// Classify an extension. Case-insensitive; the leading dot is optional.
pub fn classify(extension: &str) -> FormatClass {
    let ext = extension.strip_prefix('.').unwrap_or(extension);
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => FormatClass::Convertible(SourceFormat::Jpeg),
        "png" => FormatClass::Convertible(SourceFormat::Png),
        "gif" => FormatClass::Convertible(SourceFormat::Gif),
        _ => FormatClass::Opaque,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convertible_extensions() {
        assert_eq!(classify(".jpg"), FormatClass::Convertible(SourceFormat::Jpeg));
        assert_eq!(classify("JPEG"), FormatClass::Convertible(SourceFormat::Jpeg));
        assert_eq!(classify(".PnG"), FormatClass::Convertible(SourceFormat::Png));
        assert_eq!(classify("gif"), FormatClass::Convertible(SourceFormat::Gif));
    }

    #[test]
    fn test_opaque_extensions() {
        for ext in ["", ".", ".pdf", ".webp", ".bmp", ".tiff", "png.", "..png"] {
            assert_eq!(classify(ext), FormatClass::Opaque, "{:?}", ext);
        }
    }
}
