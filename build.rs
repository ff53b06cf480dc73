//! Compiles the mailing list protobuf definitions.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fall back to the vendored protoc when the host has none installed.
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }
    println!("cargo:rerun-if-changed=proto/mailinglist.proto");
    tonic_build::compile_protos("proto/mailinglist.proto")?;
    Ok(())
}
