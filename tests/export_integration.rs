use std::fs;
use std::path::PathBuf;

use amosdecode::test_utils::{image_bank, memory_bank, packed_picture, ContainerBuilder, TestImage};
use amosdecode::{decode, Config, DecodeOptions, Exporter, OutputOptions};
use test_log::test;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("amosdecode-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn image(width_words: u16, height: u16) -> TestImage {
    TestImage {
        width_words,
        height,
        depth: 2,
        hotspot: (1, 1),
        data: vec![0x5A; 2 * width_words as usize * height as usize * 2],
    }
}

#[test]
fn test_export_writes_listing_and_files() {
    let dir = scratch_dir("export");
    let options = OutputOptions {
        source_only: false,
        image_folder: dir.join("images"),
        data_folder: dir.join("data"),
    };
    let palette = [0x0Fu8; 64];
    let bytes = ContainerBuilder::new()
        .line(1, |l| l.token(0x0476).decimal(42))
        .banks(5)
        .raw_tail(&image_bank(b"AmSp", &[image(1, 4), image(2, 2)], &palette))
        .raw_tail(&image_bank(b"AmSp", &[image(1, 1)], &palette))
        .raw_tail(&image_bank(b"AmIc", &[image(1, 0), image(1, 2)], &palette))
        .raw_tail(&memory_bank(6, true, 0, b"Pac.Pic.", &packed_picture(64, 64, 2, &palette, &[0; 8])))
        .raw_tail(&memory_bank(9, true, 0, b"Samples ", b"RIFF"))
        .build();

    let mut exporter = Exporter::new(Vec::new(), options);
    let summary = decode(&bytes[..], DecodeOptions::default(), false, &mut exporter).unwrap();
    assert_eq!(summary.banks, 5);

    let names: Vec<String> = exporter
        .files()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    // Sprite numbering continues across banks; the zero-height icon is skipped
    assert_eq!(
        names,
        vec![
            "Sprite_001.png",
            "Sprite_002.png",
            "Sprite_003.png",
            "Icon_002.png",
            "PacPic_06.png",
            "Bank_09_Samples.bin",
        ]
    );

    let listing = String::from_utf8(exporter.into_listing()).unwrap();
    assert_eq!(listing, "Print 42\n");

    let sprite = fs::read(dir.join("images").join("Sprite_002.png")).unwrap();
    assert_eq!(&sprite[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(&sprite[16..20], &32u32.to_be_bytes());
    assert!(dir.join("data").join("PacPic_06.png").exists());
    assert_eq!(fs::read(dir.join("data").join("Bank_09_Samples.bin")).unwrap(), b"RIFF");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_config_file_drives_export() {
    let dir = scratch_dir("config");
    fs::create_dir_all(&dir).unwrap();
    let config_path = dir.join("amosdecode.toml");
    fs::write(
        &config_path,
        format!(
            "[decoder]\nunknown_opcode = \"permissive\"\n\n[output]\nsource_only = true\nimage_folder = {:?}\n",
            dir.join("img").display().to_string()
        ),
    )
    .unwrap();
    let config = Config::load(&config_path).unwrap();
    assert!(config.output.source_only);

    let bytes = ContainerBuilder::new()
        .line(1, |l| l.token(0x7FF0))
        .raw_tail(b"ignored")
        .build();
    let mut exporter = Exporter::new(Vec::new(), config.output.clone());
    decode(&bytes[..], config.decoder, config.output.source_only, &mut exporter).unwrap();
    assert!(exporter.files().is_empty());
    assert_eq!(exporter.into_listing(), b" 0x7ff0\n".to_vec());
    assert!(!dir.join("img").exists());

    let _ = fs::remove_dir_all(&dir);
}
