fn main() {
    // Host-target builds (tests, fuzzing) don't need the ESP-IDF sysenv.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
