fn main() {
    println!("cargo:rerun-if-env-changed=GEOENTRY_CONFIG_JSON");

    // Only the ESP-IDF build needs the toolchain environment; host test
    // builds run with `--no-default-features` and skip embuild entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
