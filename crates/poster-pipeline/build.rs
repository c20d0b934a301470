use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Display gamma used by the linear color pipeline.
const DISPLAY_GAMMA: f64 = 2.2;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("gamma_lut.rs");
    let mut file = File::create(&dest_path).unwrap();

    // One entry per 8-bit code value: (v / 255)^2.2
    writeln!(file, "/// Lookup table for gamma-encoded 8-bit to linear conversion").unwrap();
    writeln!(file, "/// Index: encoded byte value, Value: linear value in 0.0..=1.0").unwrap();
    writeln!(file, "pub static DECODE_GAMMA: [f32; 256] = [").unwrap();
    for i in 0..256 {
        let encoded = i as f64 / 255.0;
        let linear = encoded.powf(DISPLAY_GAMMA);
        if i > 0 && i % 8 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, "    {:.9e},", linear as f32).unwrap();
    }
    writeln!(file, "\n];").unwrap();

    println!("cargo::rerun-if-changed=build.rs");
}
