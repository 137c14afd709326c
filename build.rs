fn main() {
    // ESP-IDF link arguments; host builds skip them.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
