//! A CLI tool for building a DICOM file
//! out of a data set in DICOM JSON.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Parser;
use dicom_dict_core::{tags, Attribute, AttributeMap, VR};
use dicom_dict_object::DicomDict;
use snafu::{Report, ResultExt, Whatever};
use tracing::{debug, error, info, Level};

/// Build a DICOM file from a DICOM JSON data set
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// Path to the DICOM JSON data set
    file: PathBuf,

    /// Path to a DICOM JSON document with the file meta group
    #[arg(short = 'm', long = "meta")]
    meta: Option<PathBuf>,

    /// Path to the output DICOM file
    /// (default is to replace input extension with `.dcm`)
    #[arg(short = 'o', long = "out")]
    output: Option<PathBuf>,

    /// Transfer syntax UID of the data set
    /// (overrides the one in the file meta group)
    #[arg(short = 't', long = "transfer-syntax")]
    transfer_syntax: Option<String>,

    /// Print more information about the attributes written
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    let app = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if app.verbose { Level::DEBUG } else { Level::INFO })
            .finish(),
    )
    .whatever_context("Could not set up global logging subscriber")
    .unwrap_or_else(|e: Whatever| {
        eprintln!("[ERROR] {}", Report::from_error(e));
    });

    run(app).unwrap_or_else(|e| {
        error!("{}", Report::from_error(e));
        std::process::exit(-2);
    });
}

fn run(app: App) -> Result<(), Whatever> {
    let App {
        file,
        meta,
        output,
        transfer_syntax,
        verbose: _,
    } = app;

    let output = output.unwrap_or_else(|| {
        let mut path = file.clone();
        path.set_extension("dcm");
        path
    });

    let mut meta = match meta {
        Some(path) => read_json(&path)?,
        None => AttributeMap::new(),
    };
    let data_set = read_json(&file)?;
    let data_set = split_meta(data_set, &mut meta);

    if let Some(uid) = transfer_syntax {
        meta.insert(tags::TRANSFER_SYNTAX_UID, Attribute::new(VR::UI, [uid]));
    }

    let mut dict = DicomDict::new(meta);
    for (tag, attribute) in data_set {
        debug!("{} {}", tag, attribute.vr);
        dict.upsert_attribute(tag, attribute);
    }

    dict.write_to_file(&output)
        .whatever_context("Could not write DICOM file")?;
    info!(
        "Wrote {} attributes to {}",
        dict.dict().len(),
        output.display()
    );
    Ok(())
}

fn read_json(path: &Path) -> Result<AttributeMap, Whatever> {
    let file = File::open(path)
        .with_whatever_context(|_| format!("Could not open {}", path.display()))?;
    dicom_dict_json::from_reader(BufReader::new(file))
        .with_whatever_context(|_| format!("Could not read DICOM JSON from {}", path.display()))
}

/// Move the file meta group attributes found in a data set
/// over to the file meta group, returning the remaining attributes.
///
/// Attributes already in `meta` take precedence.
/// The group length is left out, as it is recalculated on write.
fn split_meta(data_set: AttributeMap, meta: &mut AttributeMap) -> AttributeMap {
    let (group, rest): (AttributeMap, AttributeMap) = data_set
        .into_iter()
        .partition(|(tag, _)| tag.group() == 0x0002);

    for (tag, attribute) in group {
        if tag == tags::FILE_META_INFORMATION_GROUP_LENGTH {
            continue;
        }
        meta.entry(tag).or_insert(attribute);
    }
    rest
}
