use std::path::PathBuf;

use rotalog::{Level, logger_config};

fn main() {
    let dir = PathBuf::from("/tmp/rotalog_example_rotation");
    let _ = std::fs::remove_dir_all(&dir);

    let logger = logger_config()
        .with_folder(&dir)
        .with_file_name_base("app")
        .with_max_files(3)
        .with_max_file_size_kb(1)
        .with_level(Level::Info)
        .with_stdout(true)
        .init_global()
        .unwrap();

    for i in 0..200 {
        log::info!("Log message number {i}");
    }
    logger.error(
        "Giving up",
        &std::io::Error::other("example failure"),
    );

    let files: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .flatten()
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            if name.starts_with("app") && name.ends_with(".log") {
                Some(name)
            } else {
                None
            }
        })
        .collect();

    println!("\n--- Rotation Summary ---");
    println!("Log directory: {}", dir.display());
    println!("Managed files (newest first): {:?}", logger.log_files());
    println!("Files on disk (max_files=3): {}", files.len());
    for f in &files {
        println!("  {f}");
    }
    assert!(files.len() <= 3, "retention should keep at most 3 files");
}
