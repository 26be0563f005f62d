// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Prints a listing of every instruction word in a Chip-8 program

use gumdrop::*;
use log::warn;
use owo_colors::OwoColorize;
use pipit::{Dis, Disassembler, Result, PROGRAM_ADDR};
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Load address, in hex (default 200)", parse(try_from_str = "parse_hex"))]
    pub loadaddr: Option<u16>,
    #[options(help = "Start disassembling at byte offset...")]
    pub offset: usize,
    #[options(help = "Print without color")]
    pub plain: bool,
}

fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

/// Renders one line per 2-byte word, starting `offset` bytes into `contents`
fn listing(contents: &[u8], loadaddr: usize, offset: usize, dis: &Dis) -> Vec<String> {
    let Some(contents) = contents.get(offset..) else {
        warn!("offset {offset} is past the end of the program");
        return vec![];
    };
    contents
        .chunks_exact(2)
        .enumerate()
        .map(|(index, word)| {
            let word = u16::from_be_bytes([word[0], word[1]]);
            format!(
                "{:03x}: {} {:04x}",
                loadaddr + offset + 2 * index,
                dis.once(word),
                word.bright_black(),
            )
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    if contents.len() % 2 != 0 {
        warn!("program has an odd length; the trailing byte is not shown");
    }
    let dis = if options.plain {
        Dis::plain()
    } else {
        Dis::default()
    };
    let loadaddr = options.loadaddr.map_or(PROGRAM_ADDR, usize::from);
    for line in listing(&contents, loadaddr, options.offset, &dis) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_addresses() {
        let lines = listing(b"\x00\xe0\x12\x00\xff", 0x200, 0, &Dis::plain());
        assert_eq!(2, lines.len());
        assert!(lines[0].starts_with("200: "));
        assert!(lines[0].contains("CLS"));
        assert!(lines[1].starts_with("202: "));
    }
    #[test]
    fn listing_offset() {
        let lines = listing(b"\x00\xe0\x12\x00", 0x300, 2, &Dis::plain());
        assert_eq!(1, lines.len());
        assert!(lines[0].starts_with("302: "));
    }
    #[test]
    fn listing_offset_past_end() {
        assert!(listing(b"\x00\xe0", 0x200, 8, &Dis::plain()).is_empty());
    }
    #[test]
    fn loadaddr() {
        let options = Arguments::parse_args_default(&["rom.ch8"]).expect("should parse");
        assert_eq!(None, options.loadaddr);
        let options =
            Arguments::parse_args_default(&["-l", "300", "rom.ch8"]).expect("should parse");
        assert_eq!(Some(0x300), options.loadaddr);
    }
}
