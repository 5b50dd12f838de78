//! Fixup encoding inspector.
//!
//! Prints the adjusted encoding of a fixup kind and raw value, plus the four
//! little-endian bytes the applier would OR into a zeroed fragment. Handy for
//! checking the encoding table against an assembler listing.

use clap::Parser;
use tricore_codegen::tricore::fixup::{adjust_fixup_value, apply_fixup, Fixup, FixupKind};

#[derive(Parser)]
#[command(name = "fixupenc", about = "Inspect TriCore fixup encodings")]
struct Args {
    /// Fixup kind: "hi16" or "lo16".
    kind: String,

    /// Raw fixup value, decimal or 0x-prefixed hex.
    value: String,

    /// Byte offset of the fixup within the printed fragment.
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

fn parse_value(s: &str) -> Result<u32, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let kind = match args.kind.as_str() {
        "hi16" => FixupKind::MovHi16Pcrel,
        "lo16" => FixupKind::MovLo16Pcrel,
        other => {
            eprintln!("unknown fixup kind '{other}', expected hi16 or lo16");
            std::process::exit(1);
        }
    };
    let value = parse_value(&args.value)?;

    let encoded = adjust_fixup_value(kind, value);
    println!("{}", kind.info().name);
    println!("value:   {value:#010x}");
    println!("encoded: {encoded:#010x}");

    let mut fixup = Fixup::new(kind, args.offset);
    fixup.value = value;
    let mut fragment = vec![0u8; args.offset as usize + 4];
    apply_fixup(&fixup, &mut fragment);
    let bytes: Vec<String> = fragment[args.offset as usize..]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    println!("bytes:   {}", bytes.join(" "));

    Ok(())
}
