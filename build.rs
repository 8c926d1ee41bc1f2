fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=STRIPS_AP_SSID");
    println!("cargo:rerun-if-env-changed=STRIPS_AP_PASSWORD");

    if std::env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("xtensa") {
        println!("cargo:rustc-link-arg=-Tlinkall.x");
    }

    let version = format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().format("%Y%m%d%H%M")
    );
    println!("cargo:rustc-env=BUILD_VERSION={version}");
}
