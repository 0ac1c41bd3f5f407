//! Write a decode session to disk
//!
//! The listing goes to any text writer, one line per source line. Sprite and
//! icon images become indexed PNG files in the image folder; packed pictures
//! and raw memory banks go to the data folder.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::banks::{ImageBank, ImageBankKind, MemoryBankHeader};
use crate::config::OutputOptions;
use crate::detokenizer::SourceLine;
use crate::error::{DecodeError, Result};
use crate::pacpic::PackedPicture;
use crate::planar::IndexedRaster;
use crate::sink::DecodeSink;

impl From<png::EncodingError> for DecodeError {
    fn from(err: png::EncodingError) -> Self {
        DecodeError::Io(err.to_string())
    }
}

/// Encode a raster as an 8-bit indexed PNG with its own color table
pub fn write_png<W: Write>(raster: &IndexedRaster, out: W) -> Result<()> {
    let table: Vec<u8> = raster
        .color_table()
        .iter()
        .flat_map(|c| [c.r, c.g, c.b])
        .collect();

    let mut encoder = png::Encoder::new(out, raster.width() as u32, raster.height() as u32);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);
    encoder.set_palette(table);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(raster.pixels())?;
    Ok(())
}

/// Bank name reduced to characters that are safe in a file name
fn file_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

/// Sink that writes the listing to `listing` and banks to files
pub struct Exporter<W: Write> {
    listing: W,
    options: OutputOptions,
    sprites_written: usize,
    icons_written: usize,
    files: Vec<PathBuf>,
}

impl<W: Write> Exporter<W> {
    pub fn new(listing: W, options: OutputOptions) -> Self {
        Exporter {
            listing,
            options,
            sprites_written: 0,
            icons_written: 0,
            files: Vec::new(),
        }
    }

    /// Every file created so far, in creation order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn into_listing(self) -> W {
        self.listing
    }

    /// Flush the listing writer and hand it back
    pub fn finish(mut self) -> Result<W> {
        self.listing.flush()?;
        Ok(self.listing)
    }

    fn create(&mut self, folder: &Path, file_name: &str) -> Result<BufWriter<File>> {
        fs::create_dir_all(folder)?;
        let path = folder.join(file_name);
        debug!("writing {}", path.display());
        let file = File::create(&path)?;
        self.files.push(path);
        Ok(BufWriter::new(file))
    }

    fn write_image(&mut self, folder: &Path, file_name: &str, raster: &IndexedRaster) -> Result<()> {
        if raster.is_empty() {
            warn!(
                "skipping {}: image is {}x{}",
                file_name,
                raster.width(),
                raster.height()
            );
            return Ok(());
        }
        let mut out = self.create(folder, file_name)?;
        write_png(raster, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

impl<W: Write> DecodeSink for Exporter<W> {
    fn source_line(&mut self, line: &SourceLine) -> Result<()> {
        writeln!(self.listing, "{}", line.text)?;
        Ok(())
    }

    fn sprite_bank(&mut self, kind: ImageBankKind, bank: &ImageBank) -> Result<()> {
        let folder = self.options.image_folder.clone();
        for image in &bank.images {
            let file_name = match kind {
                ImageBankKind::Sprites => {
                    self.sprites_written += 1;
                    format!("Sprite_{:03}.png", self.sprites_written)
                }
                ImageBankKind::Icons => {
                    self.icons_written += 1;
                    format!("Icon_{:03}.png", self.icons_written)
                }
            };
            self.write_image(&folder, &file_name, &image.raster)?;
        }
        Ok(())
    }

    fn packed_picture(&mut self, header: &MemoryBankHeader, picture: &PackedPicture) -> Result<()> {
        let folder = self.options.data_folder.clone();
        let raster = picture.raster()?;
        self.write_image(&folder, &format!("PacPic_{:02}.png", header.number), &raster)
    }

    fn raw_bank(&mut self, header: &MemoryBankHeader, payload: &[u8]) -> Result<()> {
        let folder = self.options.data_folder.clone();
        let file_name = format!("Bank_{:02}_{}.bin", header.number, file_safe_name(&header.name()));
        let mut out = self.create(&folder, &file_name)?;
        out.write_all(payload)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planar::{self, Palette};

    #[test]
    fn test_file_safe_name() {
        assert_eq!(file_safe_name("Tracker "), "Tracker");
        assert_eq!(file_safe_name("Pac.Pic."), "Pac_Pic");
        assert_eq!(file_safe_name("My bank!"), "My_bank");
    }

    #[test]
    fn test_write_png_signature() {
        let raster = planar::decode(16, 2, 2, &[0xF0; 8], &Palette::default()).unwrap();
        let mut bytes = Vec::new();
        write_png(&raster, &mut bytes).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        // IHDR: width, height, bit depth 8, color type 3 (indexed)
        assert_eq!(&bytes[16..20], &16u32.to_be_bytes());
        assert_eq!(&bytes[20..24], &2u32.to_be_bytes());
        assert_eq!(bytes[24], 8);
        assert_eq!(bytes[25], 3);
    }

    #[test]
    fn test_listing_written_per_line() {
        let mut exporter = Exporter::new(Vec::new(), OutputOptions::default());
        for text in ["Print 1", " Return"] {
            let line = SourceLine {
                text: text.to_string(),
                indent: 0,
                declared_words: 1,
                opcodes: Vec::new(),
            };
            exporter.source_line(&line).unwrap();
        }
        assert_eq!(exporter.into_listing(), b"Print 1\n Return\n".to_vec());
    }

    /// Accepts writes but fails every flush, like a closed pipe
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_finish_reports_flush_failure() {
        let exporter = Exporter::new(BrokenPipe, OutputOptions::default());
        let err = exporter.finish().err().unwrap();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
        assert!(err.to_string().contains("pipe closed"), "{}", err);

        let exporter = Exporter::new(Vec::new(), OutputOptions::default());
        assert!(exporter.finish().unwrap().is_empty());
    }
}
