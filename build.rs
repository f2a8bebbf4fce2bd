fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/actionrunner.proto");

    // Fall back to the bundled protoc when none is configured.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            // SAFETY: build scripts are single-threaded.
            unsafe { std::env::set_var("PROTOC", protoc) };
        }
    }

    tonic_build::compile_protos("proto/actionrunner.proto")?;
    Ok(())
}
