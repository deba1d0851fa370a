use std::fs;
use std::path::PathBuf;

fn example_path(fname: &str) -> PathBuf {
    // The test is executed under the crate root directory.
    let mut path = std::env::current_dir().unwrap();
    path.push("tests");
    path.push("packet_examples");
    path.push(fname);
    path
}

/// Load a packet stored as one line of hex text.
pub fn file_to_packet(fname: &str) -> Vec<u8> {
    let content = fs::read_to_string(example_path(fname)).unwrap();
    let content = content.trim();
    assert!(content.len() % 2 == 0, "odd number of hex digits in {}", fname);

    (0..content.len())
        .step_by(2)
        .map(|idx| u8::from_str_radix(&content[idx..idx + 2], 16).unwrap())
        .collect()
}
