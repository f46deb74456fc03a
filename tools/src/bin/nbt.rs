//! Perform operations on nbt files: print them as sNBT or JSON, address
//! parts of them with paths, and write or merge sNBT into them.

use std::error::Error;

use clap::{App, Arg, ArgMatches};

use lodenbt::file::{Compression, NbtFile};
use lodenbt::{Endian, Value};
use lodesnbt::path::Path;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn main() {
    env_logger::init();

    let matches = App::new("nbt")
        .about("Perform operations on nbt files.")
        .arg(
            Arg::with_name("read")
                .short("r")
                .help("read nbt data from a file"),
        )
        .arg(
            Arg::with_name("snbt")
                .short("s")
                .conflicts_with("read")
                .help("read snbt from a file"),
        )
        .arg(
            Arg::with_name("write")
                .short("w")
                .value_name("nbt")
                .takes_value(true)
                .help("write nbt to a file"),
        )
        .arg(
            Arg::with_name("merge")
                .short("m")
                .value_name("nbt")
                .takes_value(true)
                .conflicts_with("write")
                .help("merge nbt into a file"),
        )
        .arg(
            Arg::with_name("plain")
                .long("plain")
                .help("don't use gzip compression"),
        )
        .arg(
            Arg::with_name("little")
                .long("little")
                .help("use little-endian format"),
        )
        .arg(
            Arg::with_name("compact")
                .long("compact")
                .help("output compact snbt"),
        )
        .arg(
            Arg::with_name("pretty")
                .long("pretty")
                .help("output indented snbt"),
        )
        .arg(
            Arg::with_name("unpack")
                .long("unpack")
                .help("output interpreted nbt"),
        )
        .arg(Arg::with_name("json").long("json").help("output nbt as json"))
        .arg(
            Arg::with_name("path")
                .long("path")
                .value_name("path")
                .takes_value(true)
                .help("output all the matching tags"),
        )
        .arg(
            Arg::with_name("find")
                .long("find")
                .value_name("path")
                .takes_value(true)
                .help("recursively find the first matching tag"),
        )
        .arg(
            Arg::with_name("file")
                .value_name("file")
                .required(true)
                .help("the target file"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("nbt: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &ArgMatches) -> Result<()> {
    let compression = if args.is_present("plain") {
        Some(Compression::None)
    } else {
        None
    };
    let order = if args.is_present("little") {
        Some(Endian::Little)
    } else {
        None
    };
    let file = args.value_of("file").unwrap();

    if args.is_present("read") || args.is_present("snbt") {
        let tags = read(
            file,
            args.is_present("snbt"),
            compression,
            order,
            args.value_of("path"),
            args.value_of("find"),
        )?;
        for tag in tags {
            if let Some(target) = args.value_of("write") {
                write(&tag, target, compression, order)?;
            } else if let Some(target) = args.value_of("merge") {
                merge(&tag, target, compression, order)?;
            } else {
                display(&tag, args)?;
            }
        }
    } else if let Some(literal) = args.value_of("write") {
        write(&lodesnbt::from_str(literal)?, file, compression, order)?;
    } else if let Some(literal) = args.value_of("merge") {
        merge(&lodesnbt::from_str(literal)?, file, compression, order)?;
    } else {
        return Err("one of the following arguments is required: -r -s -w -m".into());
    }

    Ok(())
}

/// Load the target and narrow it down to the selected tags.
fn read(
    file: &str,
    snbt: bool,
    compression: Option<Compression>,
    order: Option<Endian>,
    path: Option<&str>,
    find: Option<&str>,
) -> Result<Vec<Value>> {
    let root = if snbt {
        let text = std::fs::read_to_string(file)?;
        lodesnbt::from_str(&text)?
    } else {
        Value::Compound(NbtFile::load_with(file, compression, order)?.into_root())
    };

    let tags = match path {
        Some(expr) => Path::parse(expr)?.get_all(&root),
        None => vec![root],
    };

    Ok(match find {
        Some(expr) => {
            let finder = Path::parse(expr)?;
            tags.iter().filter_map(|tag| finder.find(tag)).collect()
        }
        None => tags,
    })
}

fn display(tag: &Value, args: &ArgMatches) -> Result<()> {
    let pretty = args.is_present("pretty");

    if args.is_present("unpack") {
        if pretty {
            println!("{:#?}", tag);
        } else {
            println!("{:?}", tag);
        }
    } else if args.is_present("json") {
        let json = if pretty {
            serde_json::to_string_pretty(tag)?
        } else {
            serde_json::to_string(tag)?
        };
        println!("{}", json);
    } else if pretty {
        println!("{}", lodesnbt::to_string_pretty(tag, "    "));
    } else if args.is_present("compact") {
        println!("{}", lodesnbt::to_string_compact(tag));
    } else {
        println!("{}", lodesnbt::to_string(tag));
    }

    Ok(())
}

fn write(
    tag: &Value,
    target: &str,
    compression: Option<Compression>,
    order: Option<Endian>,
) -> Result<()> {
    let root = match tag.as_compound() {
        Some(compound) => compound.clone(),
        None => return Err("the root nbt tag must be a compound tag".into()),
    };

    let mut file = NbtFile::new(root);
    // Writing has nothing to sniff: compress unless asked not to.
    file.set_compression(compression.unwrap_or(Compression::Gzip));
    file.set_order(order.unwrap_or(Endian::Big));
    file.save_as(target)?;
    Ok(())
}

fn merge(
    tag: &Value,
    target: &str,
    compression: Option<Compression>,
    order: Option<Endian>,
) -> Result<()> {
    let patch = match tag.as_compound() {
        Some(compound) => compound,
        None => return Err("the root nbt tag must be a compound tag".into()),
    };

    let mut file = NbtFile::load_with(target, compression, order)?;
    file.root_mut().merge(patch);
    file.save()?;
    Ok(())
}
