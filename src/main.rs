//! tldat CLI - unpack TLDAT game-asset archives.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use tldat::{ArchiveHeader, Blob, EncryptionContext, HeaderMode, NameDictionary};

/// tldat - TLDAT game-asset archive unpacker
#[derive(Parser)]
#[command(name = "tldat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract all files from an archive
    Unpack {
        /// Path to FILEHEADER.TOFHDB
        header: PathBuf,

        /// Path to TLFILE.TLDAT
        blob: PathBuf,

        /// Folder to unpack files into
        output: PathBuf,

        /// Path to a name dictionary file
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// Path to FILEHEADER.TOFHDA (encrypted key material)
        #[arg(long)]
        encrypted: Option<PathBuf>,

        /// Archive uses 32-bit fields (Xillia, Zestiria)
        #[arg(long)]
        bit32: bool,

        /// Archive is big-endian
        #[arg(long = "big-endian")]
        big_endian: bool,
    },

    /// Recover file names and dump them as a dictionary
    DumpNames {
        /// Path to FILEHEADER.TOFHDB
        header: PathBuf,

        /// Path to TLFILE.TLDAT
        blob: PathBuf,

        /// Path to FILEHEADER.TOFHDA (encrypted key material)
        #[arg(long)]
        encrypted: Option<PathBuf>,

        /// Archive uses 32-bit fields (Xillia, Zestiria)
        #[arg(long)]
        bit32: bool,

        /// Archive is big-endian
        #[arg(long = "big-endian")]
        big_endian: bool,

        /// Write the dictionary here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the entries of an archive header
    List {
        /// Path to FILEHEADER.TOFHDB
        header: PathBuf,

        /// Path to FILEHEADER.TOFHDA (encrypted key material)
        #[arg(long)]
        encrypted: Option<PathBuf>,

        /// Archive uses 32-bit fields (Xillia, Zestiria)
        #[arg(long)]
        bit32: bool,

        /// Archive is big-endian
        #[arg(long = "big-endian")]
        big_endian: bool,

        /// Show offsets, lengths and flags
        #[arg(short, long)]
        detailed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Unpack {
            header,
            blob,
            output,
            dictionary,
            encrypted,
            bit32,
            big_endian,
        } => cmd_unpack(
            &header,
            &blob,
            &output,
            dictionary.as_deref(),
            encrypted.as_deref(),
            HeaderMode::from_flags(bit32, big_endian),
        ),
        Commands::DumpNames {
            header,
            blob,
            encrypted,
            bit32,
            big_endian,
            output,
        } => cmd_dump_names(
            &header,
            &blob,
            encrypted.as_deref(),
            HeaderMode::from_flags(bit32, big_endian),
            output.as_deref(),
        ),
        Commands::List {
            header,
            encrypted,
            bit32,
            big_endian,
            detailed,
        } => cmd_list(
            &header,
            encrypted.as_deref(),
            HeaderMode::from_flags(bit32, big_endian),
            detailed,
        ),
    }
}

/// Read the header file, decrypting it first when key material is supplied.
fn load_header(
    header_path: &Path,
    encrypted_path: Option<&Path>,
    mode: HeaderMode,
) -> Result<(ArchiveHeader, Option<EncryptionContext>)> {
    let mut buffer = fs::read(header_path).context("Failed to read header file")?;

    let ctx = match encrypted_path {
        Some(path) => {
            let companion = fs::read(path).context("Failed to read encrypted header file")?;
            let ctx = EncryptionContext::new(companion).context("Failed to decode key material")?;
            tldat::decrypt(&mut buffer, ctx.header_key());
            Some(ctx)
        }
        None => None,
    };

    let header = ArchiveHeader::parse(&buffer, mode).context("Failed to parse archive header")?;
    Ok((header, ctx))
}

fn cmd_unpack(
    header_path: &Path,
    blob_path: &Path,
    output: &Path,
    dictionary: Option<&Path>,
    encrypted: Option<&Path>,
    mode: HeaderMode,
) -> Result<()> {
    let start = Instant::now();
    let (header, ctx) = load_header(header_path, encrypted, mode)?;
    let blob = Blob::open(blob_path).context("Failed to open blob file")?;

    println!("Loaded {} entries in {:?}", header.len(), start.elapsed());

    let mut names = NameDictionary::new();
    if let Some(path) = dictionary {
        let added = names
            .load_from_file(path)
            .context("Failed to read name dictionary")?;
        println!("Seeded {added} names from dictionary");
    }

    // Sequential pre-pass; the dictionary is read-only once extraction starts.
    tldat::recover_names(&header, &blob, ctx.as_ref(), &mut names);
    println!("Dictionary holds {} names after recovery", names.len());

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(header.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let report = tldat::extract_all(&header, &blob, ctx.as_ref(), &names, output, || pb.inc(1));
    pb.finish_with_message("Done");

    println!(
        "Extracted {} entries in {:?} ({} failed)",
        report.extracted,
        start.elapsed(),
        report.failures.len()
    );

    for failure in &report.failures {
        eprintln!(
            "Failed entry {} ({:016x}.{}): {}",
            failure.index, failure.name_hash, failure.extension, failure.error
        );
    }

    Ok(())
}

fn cmd_dump_names(
    header_path: &Path,
    blob_path: &Path,
    encrypted: Option<&Path>,
    mode: HeaderMode,
    output: Option<&Path>,
) -> Result<()> {
    let (header, ctx) = load_header(header_path, encrypted, mode)?;
    let blob = Blob::open(blob_path).context("Failed to open blob file")?;

    let mut names = NameDictionary::new();
    tldat::recover_names(&header, &blob, ctx.as_ref(), &mut names);

    match output {
        Some(path) => {
            let mut file = fs::File::create(path).context("Failed to create output file")?;
            names.write(&mut file)?;
            file.flush()?;
            eprintln!("Wrote {} names to {}", names.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            names.write(&mut stdout.lock())?;
        }
    }

    Ok(())
}

fn cmd_list(
    header_path: &Path,
    encrypted: Option<&Path>,
    mode: HeaderMode,
    detailed: bool,
) -> Result<()> {
    let (header, _) = load_header(header_path, encrypted, mode)?;

    for entry in header.entries() {
        if detailed {
            println!(
                "{:>6} {:016x} {:>12} {:>12} {} {}",
                entry.index,
                entry.name_hash,
                entry.offset,
                entry.length,
                if entry.is_compressed { "C" } else { " " },
                entry.extension
            );
        } else {
            println!("{:016x}.{}", entry.name_hash, entry.extension);
        }
    }

    println!("\nTotal: {} entries", header.len());

    Ok(())
}
