use amosdecode::{decode, Config, Exporter, FallbackStyle, FloatMode};
use log::{debug, info};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

fn print_usage(program: &str) {
    println!("amosdecode - lists AMOS BASIC source files and extracts their banks");
    println!();
    println!("Usage: {} [options] <file.AMOS>", program);
    println!();
    println!("Options:");
    println!("  -v, --verbose         print file details and debug logging");
    println!("  --sourceonly          only print the listing, skip the banks");
    println!("  --imagefolder PATH    where sprite and icon PNG files go (default: .)");
    println!("  --datafolder PATH     where packed pictures and raw banks go (default: .)");
    println!("  --config PATH         TOML file with decoder and output settings");
    println!("  --ieee-float          read float literals as IEEE-754 instead of AMOS format");
    println!("  --permissive          render unknown opcodes as ' 0x..' instead of '[0x..]'");
    println!("  -h, --help            show this help");
    println!();
    println!("Examples:");
    println!("  {} game.AMOS > game.txt", program);
    println!("  {} -v --imagefolder sprites --datafolder banks game.AMOS", program);
}

struct Args {
    verbose: bool,
    source_only: bool,
    image_folder: Option<PathBuf>,
    data_folder: Option<PathBuf>,
    config: Option<PathBuf>,
    ieee_float: bool,
    permissive: bool,
    help: bool,
    file: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        verbose: false,
        source_only: false,
        image_folder: None,
        data_folder: None,
        config: None,
        ieee_float: false,
        permissive: false,
        help: false,
        file: None,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .map(PathBuf::from)
                .ok_or_else(|| format!("{} needs a path", name))
        };
        match arg.as_str() {
            "-v" | "--verbose" => parsed.verbose = true,
            "--sourceonly" => parsed.source_only = true,
            "--imagefolder" => parsed.image_folder = Some(value(arg)?),
            "--datafolder" => parsed.data_folder = Some(value(arg)?),
            "--config" => parsed.config = Some(value(arg)?),
            "--ieee-float" => parsed.ieee_float = true,
            "--permissive" => parsed.permissive = true,
            "-h" | "--help" => parsed.help = true,
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other)),
            other => {
                if parsed.file.is_some() {
                    return Err(format!("Only one input file is supported, got {}", other));
                }
                parsed.file = Some(PathBuf::from(other));
            }
        }
    }
    Ok(parsed)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("amosdecode");

    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage(program);
            std::process::exit(1);
        }
    };

    // -v raises the default filter, RUST_LOG still wins
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let path = match (&args.file, args.help) {
        (Some(path), false) => path.clone(),
        _ => {
            print_usage(program);
            return;
        }
    };

    let mut config = match &args.config {
        Some(config_path) => match Config::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if args.ieee_float {
        config.decoder.float_mode = FloatMode::Ieee;
    }
    if args.permissive {
        config.decoder.unknown_opcode = FallbackStyle::Permissive;
    }
    if args.source_only {
        config.output.source_only = true;
    }
    if let Some(folder) = args.image_folder {
        config.output.image_folder = folder;
    }
    if let Some(folder) = args.data_folder {
        config.output.data_folder = folder;
    }
    debug!("{:?}", config);

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            match e.kind() {
                io::ErrorKind::NotFound => {
                    eprintln!("Error: File not found: {}", path.display())
                }
                io::ErrorKind::PermissionDenied => {
                    eprintln!("Error: Permission denied reading {}", path.display())
                }
                _ => eprintln!("Error: Cannot open '{}': {}", path.display(), e),
            }
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut exporter = Exporter::new(stdout.lock(), config.output.clone());
    let result = decode(
        BufReader::new(file),
        config.decoder,
        config.output.source_only,
        &mut exporter,
    );
    let written = exporter.files().len();
    let flushed = exporter.finish();

    match result.and_then(|summary| flushed.map(|_| summary)) {
        Ok(summary) => {
            if args.verbose {
                eprintln!("{}", summary.header);
                eprintln!("{}", summary);
            }
            info!("{} files written", written);
        }
        Err(e) => {
            eprintln!("Error: {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
