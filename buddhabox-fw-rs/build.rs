//! Puts `memory.x` on the linker search path and stages the four loop clips
//! into `OUT_DIR` for `include_bytes!`.
//!
//! Clips are read from `assets/clip0.raw` .. `assets/clip3.raw`. A missing
//! clip is replaced by a single silent sample (0x00, signed-centred) and a
//! cargo warning, so the firmware still builds without the recordings.

use std::env;
use std::fs;
use std::path::PathBuf;

const CLIP_COUNT: usize = 4;

fn main() {
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());

    fs::write(out.join("memory.x"), include_bytes!("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    for index in 0..CLIP_COUNT {
        let name = format!("clip{index}.raw");
        let source = PathBuf::from("assets").join(&name);
        println!("cargo:rerun-if-changed={}", source.display());

        let bytes = match fs::read(&source) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            _ => {
                println!(
                    "cargo:warning={} missing or empty; using a silent placeholder",
                    source.display()
                );
                vec![0x00]
            }
        };
        fs::write(out.join(&name), bytes).unwrap();
    }

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
