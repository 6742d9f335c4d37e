//! Compiles the plugin protocol definitions.
//!
//! The generated module is pulled in by `src/generated.rs` through
//! `tonic::include_proto!`. `protoc` comes from `protoc-bin-vendored` so the
//! build does not depend on a system installation.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/provider.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/provider.proto");

    Ok(())
}
