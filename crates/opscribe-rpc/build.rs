use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    std::env::set_var("PROTOC", protoc);

    // Well-known types (Any) come from the vendored protoc include dir.
    let include = protoc_bin_vendored::include_path()?;

    tonic_prost_build::configure()
        .build_client(true)
        .build_server(false)
        .compile_protos(
            &[
                Path::new("proto/google/cloud/speech/v1beta1/cloud_speech.proto"),
                Path::new("proto/google/longrunning/operations.proto"),
            ],
            &[Path::new("proto"), include.as_path()],
        )?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
