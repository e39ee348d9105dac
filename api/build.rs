use std::{env, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Vendored protoc.
    env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let protos: Vec<PathBuf> = ["amount", "campaign", "donation", "health", "organization"]
        .iter()
        .map(|name| PathBuf::from(format!("proto/crowdfund/{}.proto", name)))
        .collect();

    tonic_build::configure()
        .file_descriptor_set_path(out_dir.join("crowdfund_descriptor.bin"))
        .compile(
            &protos,
            &[PathBuf::from("proto"), protoc_bin_vendored::include_path()?],
        )?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
