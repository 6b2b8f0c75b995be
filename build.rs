fn main() {
    // ESP-IDF environment is only needed when building for the device.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
