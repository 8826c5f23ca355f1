fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protos = &["proto/favservice/v1/favorite.proto"];

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(protos, &["proto"])?;

    for proto in protos {
        println!("cargo:rerun-if-changed={proto}");
    }

    Ok(())
}
